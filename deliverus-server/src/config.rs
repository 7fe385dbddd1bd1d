//! Server configuration

use crate::error::BoxError;

/// Fallback JWT secret, accepted only in development
const DEV_JWT_SECRET: &str = "dev-JWT_SECRET-not-for-production-0123456789";

/// Minimum JWT secret length outside development
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// PostgreSQL connection URL; `None` selects the in-memory store (development only)
    pub database_url: Option<String>,
    /// Pool size for the PostgreSQL store
    pub database_max_connections: u32,
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token lifetime (minutes)
    pub jwt_expiration_minutes: i64,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    /// Log level filter (e.g. "info", "deliverus_server=debug")
    pub log_level: String,
    /// JSON log lines instead of pretty output
    pub log_json: bool,
    /// Directory for daily-rolling log files
    pub log_dir: Option<String>,
}

impl Config {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Require a secret env var: must be set and long enough in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                DEV_JWT_SECRET.to_string()
            }
        };
        if val.len() < MIN_JWT_SECRET_LEN && environment != "development" {
            return Err(
                format!("{name} must be at least {MIN_JWT_SECRET_LEN} characters long").into(),
            );
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if database_url.is_none() && environment != "development" {
            return Err(format!("DATABASE_URL must be set in {environment} environment").into());
        }

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_url,
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 24h
            jwt_issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "deliverus".into()),
            jwt_audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "deliverus-clients".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// Development defaults without reading the environment (tests, local tooling)
    pub fn development() -> Self {
        Self {
            environment: "development".into(),
            http_port: 8080,
            database_url: None,
            database_max_connections: 10,
            jwt_secret: DEV_JWT_SECRET.into(),
            jwt_expiration_minutes: 1440,
            jwt_issuer: "deliverus".into(),
            jwt_audience: "deliverus-clients".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_secret_accepted_in_development() {
        let secret = Config::require_secret("DELIVERUS_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(secret, DEV_JWT_SECRET);
    }

    #[test]
    fn test_missing_secret_rejected_in_production() {
        assert!(Config::require_secret("DELIVERUS_TEST_UNSET_SECRET", "production").is_err());
    }

    #[test]
    fn test_development_defaults() {
        let config = Config::development();
        assert!(config.is_development());
        assert!(config.database_url.is_none());
        assert!(config.jwt_secret.len() >= MIN_JWT_SECRET_LEN);
    }
}
