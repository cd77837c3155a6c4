//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub gateway: ServerConfig,
    pub storage: StorageBackend,
    pub presence: PresenceBackend,
    pub database: Option<DatabaseConfig>,
    pub redis: Option<RedisConfig>,
    pub social: SocialConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Where users and the friend graph are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

/// Where presence records, the guest counter and the relay bus live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PresenceBackend {
    #[default]
    Memory,
    Redis,
}

/// Server configuration (for both API and Gateway)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Friend graph and relay tuning
#[derive(Debug, Clone, Deserialize)]
pub struct SocialConfig {
    /// Attempts per directional friend write before the error is surfaced
    #[serde(default = "default_friend_write_retries")]
    pub friend_write_retries: u32,
    /// Base backoff between friend write attempts, doubled each retry
    #[serde(default = "default_friend_write_backoff_ms")]
    pub friend_write_backoff_ms: u64,
    /// Per-connection queue capacity in the relay
    #[serde(default = "default_relay_buffer_size")]
    pub relay_buffer_size: usize,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            friend_write_retries: default_friend_write_retries(),
            friend_write_backoff_ms: default_friend_write_backoff_ms(),
            relay_buffer_size: default_relay_buffer_size(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "weview".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    8080
}

fn default_gateway_port() -> u16 {
    8081
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_friend_write_retries() -> u32 {
    3
}

fn default_friend_write_backoff_ms() -> u64 {
    50
}

fn default_relay_buffer_size() -> usize {
    64
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a selected backend is missing its connection URL
    /// or a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Same as [`AppConfig::from_env`]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("STORAGE_BACKEND") {
            None => StorageBackend::default(),
            Some(s) => match s.to_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "postgres" => StorageBackend::Postgres,
                _ => return Err(ConfigError::InvalidValue("STORAGE_BACKEND", s)),
            },
        };

        let presence = match lookup("PRESENCE_BACKEND") {
            None => PresenceBackend::default(),
            Some(s) => match s.to_lowercase().as_str() {
                "memory" => PresenceBackend::Memory,
                "redis" => PresenceBackend::Redis,
                _ => return Err(ConfigError::InvalidValue("PRESENCE_BACKEND", s)),
            },
        };

        let database = match lookup("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            }),
            None if storage == StorageBackend::Postgres => {
                return Err(ConfigError::MissingVar("DATABASE_URL"));
            }
            None => None,
        };

        let redis = match lookup("REDIS_URL") {
            Some(url) => Some(RedisConfig {
                url,
                max_connections: parse_or(&lookup, "REDIS_MAX_CONNECTIONS", default_redis_max_connections)?,
            }),
            None if presence == PresenceBackend::Redis => {
                return Err(ConfigError::MissingVar("REDIS_URL"));
            }
            None => None,
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: parse_or(&lookup, "API_PORT", default_api_port)?,
            },
            gateway: ServerConfig {
                host: lookup("GATEWAY_HOST").unwrap_or_else(default_host),
                port: parse_or(&lookup, "GATEWAY_PORT", default_gateway_port)?,
            },
            storage,
            presence,
            database,
            redis,
            social: SocialConfig {
                friend_write_retries: parse_or(&lookup, "FRIEND_WRITE_RETRIES", default_friend_write_retries)?,
                friend_write_backoff_ms: parse_or(
                    &lookup,
                    "FRIEND_WRITE_BACKOFF_MS",
                    default_friend_write_backoff_ms,
                )?,
                relay_buffer_size: parse_or(&lookup, "RELAY_BUFFER_SIZE", default_relay_buffer_size)?,
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }

    /// Self-contained configuration with in-memory stores, used by tests and local runs
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            api: ServerConfig {
                host: default_host(),
                port: 0,
            },
            gateway: ServerConfig {
                host: default_host(),
                port: 0,
            },
            storage: StorageBackend::Memory,
            presence: PresenceBackend::Memory,
            database: None,
            redis: None,
            social: SocialConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_defaults_from_empty_env() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.app.name, "weview");
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.gateway.port, 8081);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.presence, PresenceBackend::Memory);
        assert!(config.database.is_none());
        assert!(config.redis.is_none());
        assert_eq!(config.social.friend_write_retries, 3);
        assert_eq!(config.social.relay_buffer_size, 64);
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let result = AppConfig::from_lookup(lookup_from(&[("STORAGE_BACKEND", "postgres")]));
        assert!(matches!(result, Err(ConfigError::MissingVar("DATABASE_URL"))));
    }

    #[test]
    fn test_redis_requires_url() {
        let result = AppConfig::from_lookup(lookup_from(&[("PRESENCE_BACKEND", "redis")]));
        assert!(matches!(result, Err(ConfigError::MissingVar("REDIS_URL"))));
    }

    #[test]
    fn test_full_env() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "production"),
            ("STORAGE_BACKEND", "postgres"),
            ("PRESENCE_BACKEND", "redis"),
            ("DATABASE_URL", "postgres://localhost/weview"),
            ("REDIS_URL", "redis://localhost"),
            ("FRIEND_WRITE_RETRIES", "5"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
        ]))
        .unwrap();

        assert!(config.app.env.is_production());
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.presence, PresenceBackend::Redis);
        assert_eq!(config.database.unwrap().max_connections, 20);
        assert_eq!(config.redis.unwrap().max_connections, 10);
        assert_eq!(config.social.friend_write_retries, 5);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_invalid_values() {
        let result = AppConfig::from_lookup(lookup_from(&[("API_PORT", "not-a-port")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue("API_PORT", _))));

        let result = AppConfig::from_lookup(lookup_from(&[("STORAGE_BACKEND", "sqlite")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue("STORAGE_BACKEND", _))
        ));
    }

    #[test]
    fn test_in_memory() {
        let config = AppConfig::in_memory();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.presence, PresenceBackend::Memory);
        assert_eq!(config.api.port, 0);
    }
}
