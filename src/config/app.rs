use anyhow::{bail, Result};
use std::env;

/// Which repository implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(StorageBackend::Postgres),
            "memory" => Some(StorageBackend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
    pub client_url: String,
    pub storage_backend: StorageBackend,
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            jwt_secret: "your-secret-key-change-in-production".to_string(),
            jwt_expires_in_hours: 168,
            client_url: "http://localhost:3000".to_string(),
            storage_backend: StorageBackend::Postgres,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(defaults.port);
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);
        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        let jwt_secret = env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret);
        let jwt_expires_in_hours = env::var("JWT_EXPIRES_IN_HOURS")
            .ok()
            .and_then(|hours| hours.parse().ok())
            .unwrap_or(defaults.jwt_expires_in_hours);
        let client_url = env::var("CLIENT_URL").unwrap_or(defaults.client_url);
        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => match StorageBackend::from_str(&raw) {
                Some(backend) => backend,
                None => bail!("Unknown STORAGE_BACKEND '{}', expected 'postgres' or 'memory'", raw),
            },
            Err(_) => defaults.storage_backend,
        };
        let bcrypt_cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|cost| cost.parse().ok())
            .unwrap_or(defaults.bcrypt_cost);

        Ok(AppConfig {
            host,
            port,
            environment,
            log_level,
            log_format,
            jwt_secret,
            jwt_expires_in_hours,
            client_url,
            storage_backend,
            bcrypt_cost,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
