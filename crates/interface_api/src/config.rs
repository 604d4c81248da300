//! API configuration

use serde::Deserialize;

use domain_claims::EngineSettings;

/// Backing store for disputes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store; state is lost on restart
    #[default]
    Memory,
    /// PostgreSQL at `database_url`
    Postgres,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL, used by the postgres backend
    pub database_url: String,
    /// Log level
    pub log_level: String,
    pub store_backend: StoreBackend,
    /// Seconds between background overdue sweeps; 0 disables the sweeper
    pub sweep_interval_secs: u64,
    /// Escalation and deadline policies
    pub engine: EngineSettings,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/disputes".to_string(),
            log_level: "info".to_string(),
            store_backend: StoreBackend::Memory,
            sweep_interval_secs: 3600,
            engine: EngineSettings::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    ///
    /// Nested engine settings use a double underscore, e.g.
    /// `API_ENGINE__ESCALATION__MAX_ATTEMPTS=4`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("API")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.engine.escalation.max_attempts, 3);
    }

    #[test]
    fn test_backend_names() {
        let backend: StoreBackend = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(backend, StoreBackend::Postgres);
    }
}
