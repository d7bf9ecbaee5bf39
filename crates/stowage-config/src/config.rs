use std::{
    fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use serde::{Deserialize, Serialize};
use stowage_utils::{
    fs::atomic_write,
    path::{resolve_path, xdg_config_home, xdg_data_home},
};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Application's configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Directory holding the bundle store (index, blobs and lock file).
    /// Default: $XDG_DATA_HOME/stowage/bundles
    pub store_path: Option<String>,

    /// Whether diagnostic output is colored.
    /// Default: true
    pub colors: Option<bool>,
}

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("STOWAGE_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("stowage").join("config.toml"),
    })
});

fn config_path() -> PathBuf {
    match CONFIG_PATH.read() {
        Ok(path) => path.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Points subsequent loads and saves at `path`.
pub fn set_config_path(path: PathBuf) {
    match CONFIG_PATH.write() {
        Ok(mut guard) => *guard = path,
        Err(poisoned) => *poisoned.into_inner() = path,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn default_config() -> Self {
        let store_path = xdg_data_home().join("stowage").join("bundles");

        Self {
            store_path: Some(store_path.to_string_lossy().into_owned()),
            colors: Some(true),
        }
    }

    /// Loads the configuration file, falling back to defaults when it does not exist.
    pub fn new() -> Result<Self> {
        let config_path = config_path();

        let mut config = match fs::read_to_string(&config_path) {
            Ok(content) => {
                debug!(path = %config_path.display(), "loaded configuration");
                toml::from_str(&content)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %config_path.display(), "no configuration file, using defaults");
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve();

        Ok(config)
    }

    /// Fills unset fields with their defaults.
    pub fn resolve(&mut self) {
        let defaults = Self::default_config();
        if self.store_path.is_none() {
            self.store_path = defaults.store_path;
        }
        self.colors.get_or_insert(true);
    }

    /// Resolved store directory. `$STOWAGE_STORE` takes precedence over the file.
    pub fn get_store_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("STOWAGE_STORE") {
            return Ok(resolve_path(&env_path)?);
        }
        match &self.store_path {
            Some(store_path) => Ok(resolve_path(store_path)?),
            None => Ok(xdg_data_home().join("stowage").join("bundles")),
        }
    }

    pub fn colors(&self) -> bool {
        self.colors.unwrap_or(true)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Writes the default configuration to the configuration path.
///
/// Refuses to overwrite an existing file.
pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let def_config = Config::default_config();
    atomic_write(&config_path, def_config.to_toml()?.as_bytes())?;

    info!(
        "Default configuration file generated at: {}",
        config_path.display()
    );
    Ok(config_path)
}
