//! Application identity and store configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Suffix appended to the package name to form the namespace name.
pub const NAMESPACE_SUFFIX: &str = "-prefs";

/// Directory under `data_dir` holding master keys when none is configured.
const DEFAULT_KEY_STORE_DIR: &str = ".keystore";

/// Identity and storage location of the host application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppContext {
    /// Application identity, e.g. `com.example.notes`.
    pub package_name: String,
    /// Directory private to the application where namespaces live.
    pub data_dir: PathBuf,
    /// Where master keys are kept (defaults to `data_dir/.keystore`).
    #[serde(default)]
    pub key_store_dir: Option<PathBuf>,
}

impl AppContext {
    pub fn new(package_name: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            package_name: package_name.into(),
            data_dir: data_dir.into(),
            key_store_dir: None,
        }
    }

    /// Keep master keys in `dir` instead of the default location.
    pub fn with_key_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.key_store_dir = Some(dir.into());
        self
    }

    /// Name of this application's namespace.
    pub fn namespace_name(&self) -> String {
        format!("{}{}", self.package_name, NAMESPACE_SUFFIX)
    }

    /// Directory holding this application's namespace.
    pub fn namespace_path(&self) -> PathBuf {
        self.data_dir.join(self.namespace_name())
    }

    /// Directory holding master keys.
    pub fn key_store_dir(&self) -> PathBuf {
        self.key_store_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_KEY_STORE_DIR))
    }
}

/// Store configuration loaded from a TOML file.
///
/// ```toml
/// encrypted = true
///
/// [app]
/// package_name = "com.example.notes"
/// data_dir = "/var/lib/notes"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Application identity and paths.
    pub app: AppContext,
    /// Whether the namespace is encrypted at rest.
    #[serde(default)]
    pub encrypted: bool,
}

impl StoreConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        if config.app.package_name.trim().is_empty() {
            return Err(ConfigError::Invalid("app.package_name is empty".to_string()));
        }
        Ok(config)
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
