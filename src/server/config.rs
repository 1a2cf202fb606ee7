use super::RequestsLoggingLevel;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Directory holding `songs.json`, `featured.json` and `tags.json`.
    pub data_dir: PathBuf,
    /// Token the home page session is checked against. With no token
    /// configured the home page cannot be opened at all.
    pub preview_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8000,
            data_dir: PathBuf::from("data"),
            preview_token: None,
        }
    }
}
