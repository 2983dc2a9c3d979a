//! Configuration management for the schedule tool
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schedule.toml)
//! - Environment variables (SCHEDULE__*)
//!
//! ## Example config file (schedule.toml):
//! ```toml
//! [store]
//! path = "output/versions.json"
//!
//! [catalog]
//! path = "data/sessions.json"
//!
//! [validation]
//! store_invalid = false
//!
//! [[layout.slots]]
//! name = "slot_1"
//! label = "08:30am - 09:15am"
//! # ... the layout table needs all 8 rooms and 7 slots when overridden
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::venue::VenueLayout;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Version store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Session catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Rooms and slots
    #[serde(default)]
    pub layout: VenueLayout,
}

/// Version store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the versions file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the session catalog JSON
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

/// Validation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Allow saving a schedule that failed validation
    #[serde(default)]
    pub store_invalid: bool,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("output/versions.json")
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/sessions.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

impl ScheduleConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, with an optional required file on top
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schedule.toml",
            ".schedule.toml",
            "config/schedule.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("org", "conference", "schedule") {
            let xdg_config = config_dir.config_dir().join("schedule.toml");
            if xdg_config.exists() {
                debug!(path = %xdg_config.display(), "using user config");
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEDULE__STORE__PATH=... overrides [store] path
        builder = builder.add_source(
            Environment::with_prefix("SCHEDULE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config
            .layout
            .check()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Store path, resolved against the working directory
    pub fn store_path(&self) -> PathBuf {
        resolve(&self.store.path)
    }

    /// Catalog path, resolved against the working directory
    pub fn catalog_path(&self) -> PathBuf {
        resolve(&self.catalog.path)
    }
}

fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    }
}
