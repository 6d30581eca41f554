//! Resolver settings.
//!
//! Built-in defaults overlaid by an optional `resvar.toml` file. Paths in
//! the file are taken as-is; relative paths resolve against the process
//! working directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_THRESHOLD;

/// Descriptor file name under the resource root
pub const DEFAULT_DESCRIPTOR_FILE: &str = "res.toml";

/// Device profile file name under the resource root
pub const DEFAULT_DEVICE_PROFILE_FILE: &str = "device.toml";

/// Resolver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root directory variant paths are composed under
    #[serde(default = "default_resource_root")]
    pub resource_root: PathBuf,

    /// Descriptor path (default: `<resource_root>/res.toml`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<PathBuf>,

    /// Cache entry threshold before eviction
    #[serde(default = "default_cache_threshold")]
    pub cache_threshold: usize,

    /// Device profile path (default: `<resource_root>/device.toml`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_profile: Option<PathBuf>,
}

fn default_resource_root() -> PathBuf {
    PathBuf::from("res")
}

fn default_cache_threshold() -> usize {
    DEFAULT_THRESHOLD
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resource_root: default_resource_root(),
            descriptor: None,
            cache_threshold: default_cache_threshold(),
            device_profile: None,
        }
    }
}

/// Errors that can occur when loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Settings file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl Settings {
    /// Load settings from a specific path.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse settings from TOML string.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), SettingsError> {
        // Eviction drops threshold / 2 entries, so anything below 2 could
        // never make room
        if self.cache_threshold < 2 {
            return Err(SettingsError::InvalidValue {
                field: "cache_threshold".to_string(),
                reason: format!("must be at least 2, got {}", self.cache_threshold),
            });
        }

        Ok(())
    }

    /// Effective descriptor path.
    pub fn descriptor_path(&self) -> PathBuf {
        self.descriptor
            .clone()
            .unwrap_or_else(|| self.resource_root.join(DEFAULT_DESCRIPTOR_FILE))
    }

    /// Effective device profile path.
    pub fn device_profile_path(&self) -> PathBuf {
        self.device_profile
            .clone()
            .unwrap_or_else(|| self.resource_root.join(DEFAULT_DEVICE_PROFILE_FILE))
    }
}
