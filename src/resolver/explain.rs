//! Per-node explanation of a resolution decision.
//!
//! `explain` runs the same evaluation as `resolve` against the live device
//! snapshot, but always recomputes (the cache is not consulted) and
//! reports every node's verdict rather than just the winner.

use serde::Serialize;
use std::path::PathBuf;

use resvar_descriptor::{AttributeKind, ResourceType};
use resvar_device::DeviceContext;

use super::{ResolveError, Resolver, validate_id};

/// Verdict for a single node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeEvaluation {
    /// Variant folder the node binds
    pub folder: String,

    /// Whether `root/folder/id` exists on disk
    pub file_exists: bool,

    /// Whether the node is a candidate (file present and all conditions hold)
    pub matched: bool,

    /// First condition the device failed, when the file was present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_condition: Option<AttributeKind>,

    /// Additive attribute score (zero for non-candidates)
    pub score: u64,
}

/// Final decision of an evaluation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExplainDecision {
    /// A node won on score
    Selected {
        folder: String,
        path: PathBuf,
        score: u64,
    },

    /// No node qualified; the default folder had the file
    Fallback { folder: String, path: PathBuf },

    /// Neither a node nor the default folder can serve the id
    NoMatch,
}

/// Full evaluation trace for one `(type, id)` request.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainReport {
    /// Requested resource type
    pub resource_type: ResourceType,

    /// Requested resource id
    pub resource_id: String,

    /// Device snapshot the conditions were evaluated against
    pub device: DeviceContext,

    /// Per-node verdicts in descriptor order
    pub nodes: Vec<NodeEvaluation>,

    /// Number of nodes that qualified
    pub candidate_count: u32,

    /// Final decision
    pub decision: ExplainDecision,
}

impl ExplainReport {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Resolver {
    /// Evaluate every node for `(resource_type, id)` and report the trace.
    pub fn explain(
        &self,
        resource_type: ResourceType,
        id: &str,
    ) -> Result<ExplainReport, ResolveError> {
        validate_id(id)?;

        let (device, evaluation) = self.evaluate_request(resource_type, id)?;

        Ok(ExplainReport {
            resource_type,
            resource_id: id.to_string(),
            device,
            nodes: evaluation.nodes,
            candidate_count: evaluation.candidate_count,
            decision: evaluation.decision,
        })
    }
}
