use axum::extract::FromRef;

use crate::catalog::Catalog;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalog = Arc<Catalog>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog: GuardedCatalog,
    pub version: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, catalog: Catalog) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog: Arc::new(catalog),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl FromRef<ServerState> for GuardedCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
