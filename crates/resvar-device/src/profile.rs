//! Device profile files.
//!
//! A profile is a TOML rendition of [`DeviceContext`], used by the CLI and
//! by deployments that pin device facts instead of querying platform
//! services.

use std::path::{Path, PathBuf};

use crate::context::{DeviceContext, DeviceError, DeviceProbe};

/// Errors that can occur when loading a device profile
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Failed to read device profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Device profile not found: {0}")]
    NotFound(PathBuf),
}

/// Load a device profile from a specific path.
pub fn load_profile(path: &Path) -> Result<DeviceContext, ProfileError> {
    if !path.exists() {
        return Err(ProfileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    parse_profile(&content)
}

/// Parse a device profile from TOML string.
pub fn parse_profile(content: &str) -> Result<DeviceContext, ProfileError> {
    Ok(toml::from_str(content)?)
}

/// Probe that re-reads a profile file on every query.
///
/// Language changes land on disk first (the settings service rewrites the
/// profile), so re-reading the file is how this probe observes them.
#[derive(Debug, Clone)]
pub struct FileProbe {
    path: PathBuf,
}

impl FileProbe {
    /// Create a probe for the profile at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The profile path this probe reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeviceProbe for FileProbe {
    fn probe(&self) -> Result<DeviceContext, DeviceError> {
        load_profile(&self.path).map_err(|e| match e {
            ProfileError::Io(io) => DeviceError::Io(io),
            other => DeviceError::Unavailable(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile() {
        let content = r#"
            screen_dpi = 233
            screen_width = 720
            screen_large = false
            screen_bpp = 32
            platform_version = "2.3"
            language = "en"
        "#;

        let context = parse_profile(content).unwrap();
        assert_eq!(context.screen_dpi, 233);
        assert_eq!(context.screen_width, 720);
        assert!(!context.screen_large);
        assert_eq!(context.platform_version, "2.3");
        assert_eq!(context.language, "en");
    }

    #[test]
    fn test_missing_field_rejected() {
        let content = r#"
            screen_dpi = 233
        "#;

        assert!(matches!(
            parse_profile(content),
            Err(ProfileError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_profile(Path::new("/nonexistent/device.toml"));
        assert!(matches!(result, Err(ProfileError::NotFound(_))));
    }
}
