//! Configuration management for aloe-support

pub mod schema;

pub use schema::Config;

use crate::error::{AloeError, AloeResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File name of the project-local config
pub const LOCAL_CONFIG_NAME: &str = ".aloe-support.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aloe-support")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if not exists
    pub async fn load(&self) -> AloeResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> AloeResult<Config> {
        let value = read_table(path).await?;
        value.try_into().map_err(|e: toml::de::Error| AloeError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load the global config with an optional local config merged on top.
    ///
    /// Keys in the local file override the global ones table by table.
    pub async fn load_merged(&self, local: Option<&Path>) -> AloeResult<Config> {
        let mut merged = if self.config_path.exists() {
            read_table(&self.config_path).await?
        } else {
            debug!("Config file not found, using defaults");
            toml::Value::Table(toml::map::Map::new())
        };

        let source = match local {
            Some(path) => {
                debug!("Merging local config: {}", path.display());
                merge_values(&mut merged, read_table(path).await?);
                path
            }
            None => self.config_path.as_path(),
        };

        merged.try_into().map_err(|e: toml::de::Error| AloeError::ConfigInvalid {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Walk up from `start` looking for a project-local config file
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> AloeResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            AloeError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> AloeResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AloeError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_table(path: &Path) -> AloeResult<toml::Value> {
    let content = fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AloeError::ConfigNotFound(path.to_path_buf())
        } else {
            AloeError::io(format!("reading config from {}", path.display()), e)
        }
    })?;

    content
        .parse::<toml::Value>()
        .map_err(|e| AloeError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
