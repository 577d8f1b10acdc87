/// Configuration management for accountd
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub version: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub account_db: PathBuf,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Process-wide salt mixed into every password hash
    pub password_salt: String,
    pub jwt_secret: String,
    pub jwt_algorithm: String,
    /// Session token lifetime in seconds
    pub session_ttl_secs: i64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid port number".to_string()))?;
        let version = env::var("SERVICE_VERSION").unwrap_or_else(|_| "0.1.0".to_string());

        let data_directory: PathBuf = env::var("DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let account_db = env::var("ACCOUNT_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("accounts.sqlite"));

        let password_salt = env::var("PASSWORD_SALT")
            .map_err(|_| ApiError::Validation("Password salt required".to_string()))?;
        let jwt_secret = env::var("JWT_SECRET_KEY")
            .map_err(|_| ApiError::Validation("JWT secret required".to_string()))?;
        let jwt_algorithm = env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);

        // Parse CORS origins from comma-separated list
        let allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<String>>();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(AppConfig {
            service: ServiceConfig {
                host,
                port,
                version,
            },
            storage: StorageConfig {
                data_directory,
                account_db,
            },
            auth: AuthConfig {
                password_salt,
                jwt_secret,
                jwt_algorithm,
                session_ttl_secs,
            },
            cors: CorsConfig { allow_origins },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.host.is_empty() {
            return Err(ApiError::Validation("Host cannot be empty".to_string()));
        }

        if self.auth.password_salt.is_empty() {
            return Err(ApiError::Validation(
                "Password salt cannot be empty".to_string(),
            ));
        }

        if self.auth.jwt_secret.len() < 32 {
            return Err(ApiError::Validation(
                "JWT secret must be at least 32 characters".to_string(),
            ));
        }

        if self.auth.jwt_algorithm.parse::<jsonwebtoken::Algorithm>().is_err() {
            return Err(ApiError::Validation(format!(
                "Unknown JWT algorithm: {}",
                self.auth.jwt_algorithm
            )));
        }

        Ok(())
    }
}
