use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable that overrides the CORS allow-list with a single
/// front-end origin.
pub const FRONT_URL_ENV: &str = "FRONT_URL";

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub log_level: String,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// `sqlite://...`, `postgres://...` or `memory://`.
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub images_dir: PathBuf,
    /// Upper bound for a single uploaded image, in bytes.
    pub max_image_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let front_url = std::env::var(FRONT_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| vec![url]);

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9000)?
            .set_default("server.log_level", "info")?
            .set_default("server.cors.allow_origins", vec!["http://localhost:3000"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://db/mercari.sqlite3?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("storage.images_dir", "./images")?
            .set_default("storage.max_image_size", 32 * 1024 * 1024)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., LISTING__DATABASE__URL)
            .add_source(
                Environment::with_prefix("LISTING")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .set_override_option("server.cors.allow_origins", front_url)?
            .build()?;

        s.try_deserialize()
    }
}
