//! Resource descriptor parsing and validation.
//!
//! Parses the package descriptor file (conventionally `res.toml` under the
//! resource root). Each group declares a resource class, a default folder,
//! and its variant nodes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{ResourceGroup, ResourceType};

/// Parsed resource descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Descriptor {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Resource groups in declaration order
    #[serde(default, rename = "group")]
    pub groups: Vec<ResourceGroup>,
}

fn default_schema_version() -> u32 {
    1
}

/// Errors that can occur when loading or validating a descriptor
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("Failed to read descriptor file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Descriptor file not found: {0}")]
    NotFound(PathBuf),

    #[error("Duplicate group for resource type '{0}'")]
    DuplicateGroup(ResourceType),

    #[error("Group '{group}': missing required field '{field}'")]
    MissingField { group: ResourceType, field: String },

    #[error("Group '{group}': invalid value for '{field}': {reason}")]
    InvalidValue {
        group: ResourceType,
        field: String,
        reason: String,
    },
}

impl Descriptor {
    /// Load a descriptor from a specific path.
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        if !path.exists() {
            return Err(DescriptorError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a descriptor from TOML string.
    pub fn parse(content: &str) -> Result<Self, DescriptorError> {
        let descriptor: Descriptor = toml::from_str(content)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Validate the descriptor.
    fn validate(&self) -> Result<(), DescriptorError> {
        // One group per resource type
        let mut seen_types = HashSet::new();
        for group in &self.groups {
            if !seen_types.insert(group.resource_type) {
                return Err(DescriptorError::DuplicateGroup(group.resource_type));
            }
        }

        for group in &self.groups {
            group_validate(group)?;
        }

        Ok(())
    }
}

fn group_validate(group: &ResourceGroup) -> Result<(), DescriptorError> {
    if group.default_folder.is_empty() {
        return Err(DescriptorError::MissingField {
            group: group.resource_type,
            field: "default_folder".to_string(),
        });
    }

    for (i, node) in group.nodes.iter().enumerate() {
        if node.folder.is_empty() {
            return Err(DescriptorError::MissingField {
                group: group.resource_type,
                field: format!("node[{}].folder", i),
            });
        }

        if let Some(range) = node.attributes.screen_dpi_range {
            if !range.is_well_formed() {
                return Err(DescriptorError::InvalidValue {
                    group: group.resource_type,
                    field: format!("node[{}].screen_dpi_range", i),
                    reason: format!("bounds are inverted ({} > {})", range.from, range.to),
                });
            }
        }

        if let Some(range) = node.attributes.screen_width_range {
            if !range.is_well_formed() {
                return Err(DescriptorError::InvalidValue {
                    group: group.resource_type,
                    field: format!("node[{}].screen_width_range", i),
                    reason: format!("bounds are inverted ({} > {})", range.from, range.to),
                });
            }
        }

        if let Some(ref lang) = node.attributes.language {
            if lang.is_empty() {
                return Err(DescriptorError::InvalidValue {
                    group: group.resource_type,
                    field: format!("node[{}].language", i),
                    reason: "language tag cannot be empty".to_string(),
                });
            }
        }

        if let Some(ref version) = node.attributes.platform_version {
            if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit() || c == '.') {
                return Err(DescriptorError::InvalidValue {
                    group: group.resource_type,
                    field: format!("node[{}].platform_version", i),
                    reason: format!("'{}' is not a dotted numeric version", version),
                });
            }
        }
    }

    Ok(())
}
