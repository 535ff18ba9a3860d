use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Prefix of the hyperlinks added to entities, without trailing slash.
    pub public_base_url: String,
}

