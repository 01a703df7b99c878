//! Configuration module for tagnarrow
//!
//! Manages named stores, the default store, output settings and the session
//! snapshot location. Configuration is stored as TOML in the user's config
//! directory; `TAGNARROW_*` environment variables override file values.

mod setup;

pub use setup::first_time_setup;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides (`TAGNARROW_QUIET=true`)
pub const ENV_PREFIX: &str = "TAGNARROW";

/// Keys accepted by [`AppConfig::get_value`] and [`AppConfig::set_value`]
pub const SETTABLE_KEYS: &[&str] = &["quiet", "default_database", "session_file"];

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Map of store names to their filesystem paths
    #[serde(default)]
    pub databases: HashMap<String, PathBuf>,

    /// The store to use when none is specified
    #[serde(default)]
    pub default_database: Option<String>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Where the selection snapshot lives
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl AppConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("tagnarrow").join("config.toml"))
    }

    /// Base directory for stores and the session snapshot
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system data directory cannot be determined.
    pub fn data_dir() -> Result<PathBuf, ConfigError> {
        dirs::data_local_dir()
            .map(|dir| dir.join("tagnarrow"))
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing a default file if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::default().save_to(path)?;
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(env.try_parsing(true))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path` as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the configuration
    /// cannot be serialized, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        tracing::debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Register a store under `name`; the first store becomes the default
    pub fn add_database(&mut self, name: String, path: PathBuf) {
        if self.databases.is_empty() {
            self.default_database = Some(name.clone());
        }
        self.databases.insert(name, path);
    }

    /// Unregister a store, clearing the default if it pointed there
    pub fn remove_database(&mut self, name: &str) -> Option<PathBuf> {
        let removed = self.databases.remove(name);
        if removed.is_some() && self.default_database.as_deref() == Some(name) {
            self.default_database = None;
        }
        removed
    }

    /// Get a store path by name
    #[must_use]
    pub fn get_database(&self, name: &str) -> Option<&PathBuf> {
        self.databases.get(name)
    }

    /// All store names, sorted
    #[must_use]
    pub fn list_databases(&self) -> Vec<&String> {
        let mut names: Vec<_> = self.databases.keys().collect();
        names.sort();
        names
    }

    /// Set the default store
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no store has that name.
    pub fn set_default_database(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.databases.contains_key(name) {
            return Err(ConfigError::Message(format!(
                "Database '{name}' does not exist in configuration"
            )));
        }
        self.default_database = Some(name.to_string());
        Ok(())
    }

    /// Get the default store name
    #[must_use]
    pub const fn get_default_database(&self) -> Option<&String> {
        self.default_database.as_ref()
    }

    /// Resolve the store to open: `requested` if given, else the default
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no name is available or the name is unknown.
    pub fn resolve_database(&self, requested: Option<&str>) -> Result<&PathBuf, ConfigError> {
        let name = requested
            .or(self.default_database.as_deref())
            .ok_or_else(|| {
                ConfigError::Message(
                    "No default database set. Use 'tagnarrow db add <name> <path>' to create one, or specify --db <name>."
                        .to_string(),
                )
            })?;
        self.get_database(name)
            .ok_or_else(|| ConfigError::Message(format!("Database '{name}' not found in configuration")))
    }

    /// Snapshot file location, falling back to the data directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no path is configured and the data directory is unknown.
    pub fn session_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.session_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("session.json")),
        }
    }

    /// Read one scalar setting as text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key.
    pub fn get_value(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "quiet" => Ok(self.quiet.to_string()),
            "default_database" => Ok(self.default_database.clone().unwrap_or_default()),
            "session_file" => Ok(self
                .session_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Update one scalar setting from text; an empty value unsets optional keys
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key, an unparsable value, or a
    /// default store that is not configured.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "quiet" => {
                self.quiet = value.parse::<bool>().map_err(|_| {
                    ConfigError::Message(format!("Invalid value for quiet: '{value}'. Use 'true' or 'false'"))
                })?;
            }
            "default_database" if value.is_empty() => self.default_database = None,
            "default_database" => self.set_default_database(value)?,
            "session_file" if value.is_empty() => self.session_file = None,
            "session_file" => self.session_file = Some(PathBuf::from(value)),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Load configuration, running first-time setup if config doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        if Self::config_path()?.exists() {
            Self::load()
        } else {
            first_time_setup()
        }
    }
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::Message(format!(
        "Unknown configuration key: '{key}'. Available keys: {}",
        SETTABLE_KEYS.join(", ")
    ))
}
