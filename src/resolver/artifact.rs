//! Resolution artifact (resolution.json).
//!
//! A serializable record of one resolution decision, carrying enough
//! provenance (device snapshot, descriptor digest) to reproduce it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use resvar_descriptor::ResourceType;
use resvar_device::DeviceContext;

use super::{ExplainDecision, ResolveError, Resolver, validate_id};

/// Schema version for resolution.json
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "resvar/resolution@1";

/// Record of one resolution decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionArtifact {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When the resolution was performed
    pub created_at: DateTime<Utc>,

    /// Requested resource type
    pub resource_type: ResourceType,

    /// Requested resource id
    pub resource_id: String,

    /// Winning path
    pub resolved_path: PathBuf,

    /// Folder the winning path lives in
    pub folder: String,

    /// Winning node's score (zero when the default folder was used)
    pub score: u64,

    /// Number of nodes that qualified
    pub candidate_count: u32,

    /// Whether the default folder served the request
    pub used_fallback: bool,

    /// Device snapshot the decision was made against
    pub device: DeviceContext,

    /// SHA-256 digest of the descriptor
    pub descriptor_digest: String,
}

impl ResolutionArtifact {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write to file atomically (write-then-rename).
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        let parent = path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "No parent directory")
        })?;

        let temp_path = parent.join(format!(".{}.tmp", uuid::Uuid::new_v4()));
        std::fs::write(&temp_path, &json)?;
        std::fs::rename(&temp_path, path)?;

        Ok(())
    }
}

impl Resolver {
    /// Resolve and build the full decision record.
    ///
    /// Always recomputes (a cached path carries no score or candidate
    /// information), then writes the result through to the cache like a
    /// plain resolve.
    pub fn resolve_with_artifact(
        &self,
        resource_type: ResourceType,
        id: &str,
    ) -> Result<ResolutionArtifact, ResolveError> {
        validate_id(id)?;

        let (device, evaluation) = self.evaluate_request(resource_type, id)?;

        let (resolved_path, folder, score, used_fallback) = match &evaluation.decision {
            ExplainDecision::Selected {
                folder,
                path,
                score,
            } => (path.clone(), folder.clone(), *score, false),
            ExplainDecision::Fallback { folder, path } => (path.clone(), folder.clone(), 0, true),
            ExplainDecision::NoMatch => {
                return Err(ResolveError::NoMatch {
                    resource_type,
                    id: id.to_string(),
                })
            }
        };

        self.cache.put(resource_type, id, resolved_path.clone());

        Ok(ResolutionArtifact {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            resource_type,
            resource_id: id.to_string(),
            resolved_path,
            folder,
            score,
            candidate_count: evaluation.candidate_count,
            used_fallback,
            device,
            descriptor_digest: self.index().digest().to_string(),
        })
    }
}
