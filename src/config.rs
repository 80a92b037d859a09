use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SiteError};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub csv_path: PathBuf,
    pub blog_dir: PathBuf,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub database_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_dir: "logs".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("data/data.csv"),
            blog_dir: PathBuf::from("posts"),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("instance/users.db"),
        }
    }
}

impl Config {
    /// Load the config file if present, then apply environment overrides.
    /// The flag is `false` when the file was absent and defaults were used.
    pub fn load(config_path: &Path) -> Result<(Self, bool)> {
        let from_file = config_path.exists();
        let config = if from_file {
            let config_content = fs::read_to_string(config_path).map_err(|e| {
                SiteError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            Self::from_toml(&config_content)?
        } else {
            Config::default()
        };

        Ok((config.with_env_overrides(|key| env::var(key).ok())?, from_file))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `PROJECTIONS_*` overrides looked up through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PROJECTIONS_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| SiteError::Config(format!("PROJECTIONS_PORT is not a port: {port}")))?;
        }
        if let Some(host) = lookup("PROJECTIONS_HOST") {
            self.server.host = host;
        }
        if let Some(path) = lookup("PROJECTIONS_CSV_PATH") {
            self.data.csv_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("PROJECTIONS_BLOG_DIR") {
            self.data.blog_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("PROJECTIONS_DATABASE_PATH") {
            self.auth.database_path = PathBuf::from(path);
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
