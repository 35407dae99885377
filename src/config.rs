//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

/// Minimum signing secret length outside development
const MIN_JWT_SECRET_LEN: usize = 32;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// HMAC secret for signing tokens
    pub jwt_secret: String,

    pub jwt_issuer: String,

    pub jwt_audience: String,

    /// Allowed browser origin; permissive CORS when unset
    pub cors_allowed_origin: Option<String>,

    /// Administrator seeded at startup when both are set
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingEnv("JWT_SECRET"))?;

        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "minibank".to_string());

        let jwt_audience =
            env::var("JWT_AUDIENCE").unwrap_or_else(|_| "minibank-clients".to_string());

        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let bootstrap_admin = match (
            env::var("BOOTSTRAP_ADMIN_EMAIL").ok(),
            env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingEnv("BOOTSTRAP_ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::MissingEnv("BOOTSTRAP_ADMIN_EMAIL")),
        };

        let config = Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            cors_allowed_origin,
            bootstrap_admin,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field rules
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue("JWT_SECRET"));
        }
        if self.is_production() && self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::InvalidValue("JWT_SECRET"));
        }
        if self.is_production() && self.cors_allowed_origin.is_none() {
            return Err(ConfigError::MissingEnv("CORS_ALLOWED_ORIGIN"));
        }
        Ok(())
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: &str, secret: &str) -> Config {
        Config {
            database_url: "postgres://localhost/minibank".to_string(),
            database_max_connections: 10,
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: environment.to_string(),
            jwt_secret: secret.to_string(),
            jwt_issuer: "minibank".to_string(),
            jwt_audience: "minibank-clients".to_string(),
            cors_allowed_origin: None,
            bootstrap_admin: None,
        }
    }

    #[test]
    fn test_short_secret_allowed_in_development() {
        assert!(config("development", "dev").validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected_in_production() {
        let mut cfg = config("production", "short");
        cfg.cors_allowed_origin = Some("https://bank.example.com".to_string());
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue("JWT_SECRET"))
        ));
    }

    #[test]
    fn test_production_requires_cors_origin() {
        let cfg = config("production", &"x".repeat(MIN_JWT_SECRET_LEN));
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MissingEnv("CORS_ALLOWED_ORIGIN"))
        ));
    }

    #[test]
    fn test_bootstrap_password_not_logged() {
        let admin = BootstrapAdmin {
            email: "root@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(!format!("{:?}", admin).contains("hunter22"));
    }
}
