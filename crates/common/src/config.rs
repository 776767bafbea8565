//! Application configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Media storage configuration.
    #[serde(default)]
    pub media: MediaConfig,
    /// Demo data seeding.
    #[serde(default)]
    pub seed: SeedConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Media storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Directory uploaded files are written to.
    #[serde(default = "default_media_dir")]
    pub dir: PathBuf,
    /// Root that attachment paths are reported under.
    ///
    /// Defaults to the last component of [`MediaConfig::dir`].
    #[serde(default)]
    pub public_root: Option<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            dir: default_media_dir(),
            public_root: None,
        }
    }
}

impl MediaConfig {
    /// The media-serving root, e.g. `media` for `static/media`.
    #[must_use]
    pub fn public_root(&self) -> String {
        self.public_root.clone().unwrap_or_else(|| {
            self.dir
                .file_name()
                .map_or_else(|| "media".to_string(), |n| n.to_string_lossy().into_owned())
        })
    }
}

/// Demo data seeding configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// Seed demo users, follow edges and posts when the database is empty.
    #[serde(default)]
    pub demo_data: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    1
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("static/media")
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `WARBLER_ENV`)
    /// 4. Environment variables with `WARBLER_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("WARBLER_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("WARBLER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("WARBLER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
