// Environment-driven configuration

pub mod app;
pub mod database;

pub use app::{AppConfig, LogFormat, StorageBackend};
pub use database::{run_migrations, DatabaseConfig};
