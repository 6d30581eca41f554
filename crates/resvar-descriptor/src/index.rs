//! Variant index: the read-only group table the resolver queries.
//!
//! Built once from a descriptor file and never mutated afterwards, so it
//! can be shared across threads without locking.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::model::{ResourceGroup, ResourceType};
use crate::parse::{Descriptor, DescriptorError};

/// Immutable variant index for one package.
#[derive(Debug, Clone)]
pub struct VariantIndex {
    groups: Vec<ResourceGroup>,
    digest: String,
}

impl VariantIndex {
    /// Load the index from a descriptor file.
    ///
    /// Reads the raw bytes once, records their SHA-256 digest for
    /// provenance, then parses and validates the descriptor.
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        if !path.exists() {
            return Err(DescriptorError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let content = String::from_utf8(bytes).map_err(|e| {
            DescriptorError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("descriptor is not valid UTF-8: {}", e),
            ))
        })?;

        let descriptor = Descriptor::parse(&content)?;
        Ok(Self {
            groups: descriptor.groups,
            digest,
        })
    }

    /// Build an index from an already-parsed descriptor.
    ///
    /// The digest is computed over the descriptor's canonical TOML
    /// serialization, so indexes built in memory still carry provenance.
    pub fn from_descriptor(descriptor: Descriptor) -> Self {
        let serialized = toml::to_string(&descriptor).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(serialized.as_bytes());
        let digest = hex::encode(hasher.finalize());

        Self {
            groups: descriptor.groups,
            digest,
        }
    }

    /// Find the group for a resource type.
    ///
    /// Absence is a normal outcome (the package simply ships no variants
    /// of that class), so this returns `Option` rather than an error.
    pub fn find_group(&self, resource_type: ResourceType) -> Option<&ResourceGroup> {
        self.groups.iter().find(|g| g.resource_type == resource_type)
    }

    /// All groups in declaration order.
    pub fn groups(&self) -> &[ResourceGroup] {
        &self.groups
    }

    /// SHA-256 digest of the descriptor this index was built from.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the index has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> VariantIndex {
        let descriptor = Descriptor::parse(
            r#"
            [[group]]
            type = "image"
            default_folder = "img/default"

            [[group.node]]
            folder = "img/hdpi"
            screen_dpi = 300

            [[group]]
            type = "layout"
            default_folder = "layout/default"
        "#,
        )
        .unwrap();
        VariantIndex::from_descriptor(descriptor)
    }

    #[test]
    fn test_find_group() {
        let index = sample_index();

        let image = index.find_group(ResourceType::Image).unwrap();
        assert_eq!(image.default_folder, "img/default");
        assert_eq!(image.nodes.len(), 1);

        assert!(index.find_group(ResourceType::Layout).is_some());
        assert!(index.find_group(ResourceType::Sound).is_none());
    }

    #[test]
    fn test_digest_present() {
        let index = sample_index();
        assert_eq!(index.digest().len(), 64);
    }

    #[test]
    fn test_digest_stable_for_same_content() {
        let a = sample_index();
        let b = sample_index();
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn test_len() {
        let index = sample_index();
        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = VariantIndex::load(Path::new("/nonexistent/res.toml"));
        assert!(matches!(result, Err(DescriptorError::NotFound(_))));
    }
}
