//! Tunes Catalog Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod catalog_store;
pub mod config;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog::{Catalog, CatalogError};
pub use catalog_store::{MemoryRowStore, RowStore, SqliteRowStore};
pub use server::{run_server, RequestsLoggingLevel};
