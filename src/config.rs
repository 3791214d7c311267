//! Configuration manager for roster.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crypto::{CryptoError, PasswordManager};
use crate::validation::{Rules, Validator};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
    /// Tables used to validate users.
    #[serde(default)]
    pub rules: Rules,
    /// Related to Argon2 configuration.
    #[serde(skip_serializing)]
    pub argon2: Option<Argon2>,
}

/// Argon2 configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Argon2 {
    /// Memory used while hashing.
    pub memory_cost: u32,
    /// Iterations of hash.
    pub iterations: u32,
    /// Parallelism degree.
    pub parallelism: u32,
    /// Output hash length.
    pub hash_length: usize,
}

impl Default for Argon2 {
    fn default() -> Self {
        Self {
            memory_cost: 1024 * 64, // 64 MiB.
            iterations: 4,
            parallelism: 2,
            hash_length: 32,
        }
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Version of the crate which loaded the configuration.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Configuration = serde_yaml::from_str(yaml)?;
        config.version = VERSION.to_owned();
        Ok(config)
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location.
    ///
    /// A missing file falls back to defaults, a malformed one is an error.
    pub fn read(self) -> Result<Arc<Self>, ConfigError> {
        let file_path = if self.path.is_file() {
            self.path.clone()
        } else {
            Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        match File::open(&file_path) {
            Ok(file) => {
                let mut config: Configuration = serde_yaml::from_reader(file)?;
                config.version = VERSION.to_owned();
                config.path = file_path;

                tracing::debug!(
                    path = %config.path.display(),
                    reserved = config.rules.reserved_usernames.len(),
                    theme_slots = config.rules.theme_slots.len(),
                    "configuration loaded"
                );
                Ok(Arc::new(config))
            },
            Err(err) => Ok(Arc::new(self.error(&file_path, err))),
        }
    }

    /// Return a default configuration as fallback.
    fn error(&self, path: &Path, err: std::io::Error) -> Self {
        tracing::error!(
            error = %err,
            kind = ?err.kind(),
            path = %path.display(),
            "cannot open configuration, using defaults"
        );
        Self {
            version: VERSION.to_owned(),
            ..Default::default()
        }
    }

    /// Create a [`Validator`] from configured rules.
    pub fn validator(&self) -> Validator {
        Validator::new(self.rules.clone())
    }

    /// Create a [`PasswordManager`] from Argon2 configuration.
    pub fn password_manager(&self) -> Result<PasswordManager, CryptoError> {
        PasswordManager::new(self.argon2.clone())
    }
}
