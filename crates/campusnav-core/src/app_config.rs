use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings for the server and CLI.
///
/// The map configuration and location list themselves live in XML documents
/// at `config_path` and `locations_path`.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub config_path: PathBuf,
    pub locations_path: PathBuf,
    pub directions_base_url: String,
    pub maps_api_key: Option<String>,
    pub directions_timeout_secs: u64,
    pub directions_max_retries: u32,
    pub directions_backoff_base_ms: u64,
    pub rate_limit_per_minute: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("config_path", &self.config_path)
            .field("locations_path", &self.locations_path)
            .field("directions_base_url", &self.directions_base_url)
            .field(
                "maps_api_key",
                &self.maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("directions_timeout_secs", &self.directions_timeout_secs)
            .field("directions_max_retries", &self.directions_max_retries)
            .field(
                "directions_backoff_base_ms",
                &self.directions_backoff_base_ms,
            )
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
