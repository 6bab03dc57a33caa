//! Configuration management
//!
//! Values come from the process environment (after loading `.env`), falling
//! back to the defaults below.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

pub const DEFAULT_SERVER_PORT: u16 = 8000;

pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/flightnode";

pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;

pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Ten minutes
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// The volunteer web client in local development
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:9000";

/// Runtime configuration for the API server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// PostgreSQL pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Config {
    /// Load `.env`, then overlay environment variables on the defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();
        let config = Config {
            server: ServerConfig {
                host: env_string("FLIGHTNODE_HOST", defaults.server.host),
                port: env_parsed("FLIGHTNODE_PORT", defaults.server.port),
                shutdown_timeout_secs: env_parsed(
                    "FLIGHTNODE_SHUTDOWN_TIMEOUT",
                    defaults.server.shutdown_timeout_secs,
                ),
            },
            database: DatabaseConfig {
                url: env_string("DATABASE_URL", defaults.database.url),
                max_connections: env_parsed(
                    "DATABASE_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                ),
                min_connections: env_parsed(
                    "DATABASE_MIN_CONNECTIONS",
                    defaults.database.min_connections,
                ),
                connect_timeout_secs: env_parsed(
                    "DATABASE_CONNECT_TIMEOUT",
                    defaults.database.connect_timeout_secs,
                ),
                idle_timeout_secs: env_parsed(
                    "DATABASE_IDLE_TIMEOUT",
                    defaults.database.idle_timeout_secs,
                ),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .map(|raw| split_origins(&raw))
                    .unwrap_or(defaults.cors.allowed_origins),
                allow_credentials: env_parsed(
                    "CORS_ALLOW_CREDENTIALS",
                    defaults.cors.allow_credentials,
                ),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "Database min_connections ({}) cannot be greater than max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured; any origin will be accepted");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
        }
    }
}

fn env_string(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Unset or unparseable values fall back to `default`
fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparseable configuration value");
            default
        }),
        Err(_) => default,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "FLIGHTNODE_HOST",
        "FLIGHTNODE_PORT",
        "DATABASE_MAX_CONNECTIONS",
        "CORS_ALLOWED_ORIGINS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.server.port, DEFAULT_SERVER_PORT);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_reads_environment() {
        clear_env();
        std::env::set_var("FLIGHTNODE_HOST", "0.0.0.0");
        std::env::set_var("FLIGHTNODE_PORT", "8080");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test");

        let config = Config::load().unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cors.allowed_origins, vec!["http://a.test", "http://b.test"]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unparseable_values_fall_back_to_defaults() {
        clear_env();
        std::env::set_var("FLIGHTNODE_PORT", "not-a-port");

        let config = Config::load().unwrap();
        assert_eq!(config.server.port, DEFAULT_SERVER_PORT);

        clear_env();
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_min_above_max() {
        let mut config = Config::default();
        config.database.min_connections = 20;
        config.database.max_connections = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_split_origins_skips_blanks() {
        assert_eq!(
            split_origins("http://a.test, ,http://b.test,"),
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn test_validate_rejects_empty_database_url() {
        let mut config = Config::default();
        config.database.url = String::new();
        assert!(config.validate().is_err());
    }
}
