use crate::storage::StorageConfig;
use anyhow::Error;
use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    #[clap(long, default_value = "academy-cms.toml")]
    pub conf: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http_addr: String,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
    pub database_url: String,
    /// Base URL prepended to stored object paths when building public asset
    /// links, e.g. "http://localhost:8080" (uploads are served under
    /// "/uploads" when local storage is used).
    pub public_base_url: String,
    #[serde(default)]
    pub storage: StorageConfig,
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    pub session_secret: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            log_level: None,
            log_file: None,
            database_url: "sqlite://academy.sqlite3?mode=rwc".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            storage: StorageConfig::default(),
            admin: None,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Config, Error> {
        let config_str = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }
}
