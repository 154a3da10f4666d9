//! Layered application configuration: per-environment defaults with
//! env-var overrides, loaded once into a process-wide singleton.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
    pub default_page_size: i64,
    pub max_page_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// Signing secret for bearer tokens. Env-only (`JWT_SECRET`); an empty
    /// value disables token issuance and verification.
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let mut config = Self::defaults(environment);
        config.apply_overrides();
        config
    }

    fn apply_overrides(&mut self) {
        override_var("DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);
        override_var("DATABASE_CONNECTION_TIMEOUT", &mut self.database.connection_timeout);
        override_var("DATABASE_ENABLE_QUERY_LOGGING", &mut self.database.enable_query_logging);

        override_var("API_ENABLE_REQUEST_LOGGING", &mut self.api.enable_request_logging);
        override_var("API_MAX_REQUEST_SIZE_BYTES", &mut self.api.max_request_size_bytes);
        override_var("API_DEFAULT_PAGE_SIZE", &mut self.api.default_page_size);
        override_var("API_MAX_PAGE_SIZE", &mut self.api.max_page_size);

        override_var("SECURITY_ENABLE_CORS", &mut self.security.enable_cors);
        override_var("JWT_SECRET", &mut self.security.jwt_secret);
        override_var("SECURITY_JWT_EXPIRY_HOURS", &mut self.security.jwt_expiry_hours);

        if let Ok(origins) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins =
                origins.split(',').map(|s| s.trim().to_string()).collect();
        }
    }

    fn defaults(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                environment,
                database: DatabaseConfig {
                    max_connections: 10,
                    connection_timeout: 30,
                    enable_query_logging: true,
                },
                api: ApiConfig {
                    enable_request_logging: true,
                    max_request_size_bytes: 10 * 1024 * 1024,
                    default_page_size: 10,
                    max_page_size: 100,
                },
                security: SecurityConfig {
                    enable_cors: true,
                    cors_origins: vec![
                        "http://localhost:3000".to_string(),
                        "http://localhost:5173".to_string(),
                    ],
                    jwt_secret: String::new(),
                    jwt_expiry_hours: 24 * 7,
                },
            },
            Environment::Staging => Self {
                environment,
                database: DatabaseConfig {
                    max_connections: 20,
                    connection_timeout: 10,
                    enable_query_logging: true,
                },
                api: ApiConfig {
                    enable_request_logging: true,
                    max_request_size_bytes: 5 * 1024 * 1024,
                    default_page_size: 10,
                    max_page_size: 50,
                },
                security: SecurityConfig {
                    enable_cors: true,
                    cors_origins: vec!["https://staging.itinero.app".to_string()],
                    jwt_secret: String::new(),
                    jwt_expiry_hours: 24,
                },
            },
            Environment::Production => Self {
                environment,
                database: DatabaseConfig {
                    max_connections: 50,
                    connection_timeout: 5,
                    enable_query_logging: false,
                },
                api: ApiConfig {
                    enable_request_logging: false,
                    max_request_size_bytes: 2 * 1024 * 1024,
                    default_page_size: 10,
                    max_page_size: 50,
                },
                security: SecurityConfig {
                    enable_cors: true,
                    cors_origins: vec!["https://itinero.app".to_string()],
                    jwt_secret: String::new(),
                    jwt_expiry_hours: 4,
                },
            },
        }
    }
}

/// Overwrite `slot` when the variable is set and parses; a malformed
/// value keeps the profile default.
fn override_var<T: FromStr>(key: &str, slot: &mut T) {
    if let Some(value) = env::var(key).ok().and_then(|v| v.parse().ok()) {
        *slot = value;
    }
}

static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// The process-wide configuration, resolved on first access.
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::defaults(Environment::Development);
        assert_eq!(config.api.default_page_size, 10);
        assert_eq!(config.api.max_page_size, 100);
        assert!(config.api.enable_request_logging);
        assert!(config.security.jwt_secret.is_empty());
    }

    #[test]
    fn production_defaults_are_tighter() {
        let config = AppConfig::defaults(Environment::Production);
        assert_eq!(config.api.max_page_size, 50);
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.security.jwt_expiry_hours, 4);
    }
}
