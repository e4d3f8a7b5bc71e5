//! Data source configuration.
//!
//! Settings are persisted to a per-user JSON file. Environment variables
//! override any stored values. Anything left unset is derived from the
//! driver registry using the configured JDBC URL.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::engine::{DatabaseDriver, EngineError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Cannot determine database driver class for url: {url:?}")]
    DriverNotDetermined { url: Option<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    /// JDBC URL of the database.
    pub url: Option<String>,
    /// Explicit vendor, bypassing URL detection.
    pub driver: Option<DatabaseDriver>,
    pub driver_class_name: Option<String>,
    pub xa_data_source_class_name: Option<String>,
    pub validation_query: Option<String>,
}

fn env_string_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `<platform config dir>/dbdriver/datasource.json`, if the platform has one.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dbdriver").join("datasource.json"))
}

impl DataSourceConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Loads the per-user file, then applies `DBDRIVER_*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) => Self::load_with(&path, env_string_opt),
            None => {
                let mut config = Self::default();
                config.apply_overrides(env_string_opt)?;
                Ok(config)
            }
        }
    }

    /// Reads `path` (defaults if missing or unparsable), then applies
    /// overrides from `lookup`.
    pub fn load_with<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match Self::load_from(path) {
            Ok(config) => config,
            Err(ConfigError::Read(_)) => Self::default(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unparsable config");
                Self::default()
            }
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// Overrides fields from `lookup`, keyed by `DBDRIVER_*` variable names.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("DBDRIVER_URL") {
            self.url = Some(value);
        }
        if let Some(value) = lookup("DBDRIVER_DRIVER") {
            self.driver = Some(value.parse()?);
        }
        if let Some(value) = lookup("DBDRIVER_DRIVER_CLASS_NAME") {
            self.driver_class_name = Some(value);
        }
        if let Some(value) = lookup("DBDRIVER_XA_DATA_SOURCE_CLASS_NAME") {
            self.xa_data_source_class_name = Some(value);
        }
        if let Some(value) = lookup("DBDRIVER_VALIDATION_QUERY") {
            self.validation_query = Some(value);
        }
        Ok(())
    }

    /// The explicit `driver` if set, otherwise whatever the URL denotes.
    pub fn determine_driver(&self) -> Result<DatabaseDriver, ConfigError> {
        if let Some(driver) = self.driver {
            return Ok(driver);
        }
        Ok(DatabaseDriver::from_jdbc_url(self.url.as_deref())?)
    }

    #[instrument(skip(self), fields(explicit = self.driver_class_name.is_some()))]
    pub fn determine_driver_class_name(&self) -> Result<String, ConfigError> {
        if let Some(class_name) = &self.driver_class_name {
            return Ok(class_name.clone());
        }
        let driver = self.determine_driver()?;
        match driver.driver_class_name() {
            Some(class_name) => {
                debug!(%driver, class_name, "derived driver class from registry");
                Ok(class_name.to_string())
            }
            None => Err(ConfigError::DriverNotDetermined {
                url: self.url.clone(),
            }),
        }
    }

    pub fn determine_xa_data_source_class_name(&self) -> Result<Option<String>, ConfigError> {
        if let Some(class_name) = &self.xa_data_source_class_name {
            return Ok(Some(class_name.clone()));
        }
        let driver = self.determine_driver()?;
        Ok(driver.xa_data_source_class_name().map(str::to_string))
    }

    pub fn determine_validation_query(&self) -> Result<Option<String>, ConfigError> {
        if let Some(query) = &self.validation_query {
            return Ok(Some(query.clone()));
        }
        let driver = self.determine_driver()?;
        Ok(driver.validation_query().map(str::to_string))
    }
}
