//! Resource variant resolution.
//!
//! Resolution algorithm:
//! 1. Validate the requested id (empty or root-escaping ids are rejected)
//! 2. Consult the result cache
//! 3. Look up the group for the resource type
//! 4. Walk the group's nodes in declaration order: a node is a candidate
//!    when its file exists on disk AND every attribute condition holds
//! 5. The highest-scoring candidate wins; ties go to the earliest node
//! 6. With no candidates, fall back to the group's default folder
//! 7. Write the resolved path through to the cache

use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use resvar_descriptor::{DescriptorError, ResourceGroup, ResourceType, VariantIndex};
use resvar_device::{DeviceContext, DeviceError, DeviceProbe};

use crate::cache::{CacheConfig, ResultCache};

pub mod artifact;
pub mod explain;
pub mod score;

pub use artifact::ResolutionArtifact;
pub use explain::{ExplainDecision, ExplainReport, NodeEvaluation};

/// Resolution errors
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The requested id was empty
    #[error("Resource id cannot be empty")]
    EmptyId,

    /// The requested id would escape the resource root
    #[error("Resource id escapes the resource root: '{0}'")]
    IdEscapesRoot(String),

    /// The descriptor has no group for the requested type
    #[error("No group for resource type '{0}' in descriptor")]
    GroupNotFound(ResourceType),

    /// No node file and no default-folder file exists for the id
    #[error("No variant of '{id}' found for type '{resource_type}'")]
    NoMatch {
        resource_type: ResourceType,
        id: String,
    },

    /// Filesystem error during existence checks
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Process-lifetime resolution counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolverStats {
    /// Resolves served from the cache
    pub cache_hits: u64,

    /// Resolves that had to recompute
    pub cache_misses: u64,

    /// Group lookups against the variant index
    pub index_lookups: u64,
}

#[derive(Debug, Default)]
struct StatsCounters {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    index_lookups: AtomicU64,
}

/// Outcome of evaluating a group's nodes for one id.
#[derive(Debug)]
pub(crate) struct Evaluation {
    pub(crate) nodes: Vec<NodeEvaluation>,
    pub(crate) candidate_count: u32,
    pub(crate) decision: ExplainDecision,
}

impl Evaluation {
    fn resolved_path(&self) -> Option<&PathBuf> {
        match &self.decision {
            ExplainDecision::Selected { path, .. } | ExplainDecision::Fallback { path, .. } => {
                Some(path)
            }
            ExplainDecision::NoMatch => None,
        }
    }
}

/// Resolves `(type, id)` requests to the best-matching variant path.
///
/// Holds the immutable variant index, the result cache, and a device
/// snapshot captured once at construction. Intended to live in an `Arc`
/// so the language-change closure can be handed to an external settings
/// watcher.
pub struct Resolver {
    index: VariantIndex,
    root: PathBuf,
    cache: ResultCache,
    device: Mutex<DeviceContext>,
    probe: Box<dyn DeviceProbe>,
    stats: StatsCounters,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("root", &self.root)
            .field("groups", &self.index.len())
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Create a resolver over an already-loaded index.
    ///
    /// Probes the device once; only the language tag is re-read later.
    pub fn new(
        index: VariantIndex,
        root: impl Into<PathBuf>,
        probe: Box<dyn DeviceProbe>,
    ) -> Result<Self, ResolveError> {
        Self::with_cache_config(index, root, probe, CacheConfig::default())
    }

    /// Create a resolver with an explicit cache configuration.
    pub fn with_cache_config(
        index: VariantIndex,
        root: impl Into<PathBuf>,
        probe: Box<dyn DeviceProbe>,
        cache: CacheConfig,
    ) -> Result<Self, ResolveError> {
        let device = probe.probe()?;
        Ok(Self {
            index,
            root: root.into(),
            cache: ResultCache::new(cache),
            device: Mutex::new(device),
            probe,
            stats: StatsCounters::default(),
        })
    }

    /// Load the descriptor at `descriptor_path` and create a resolver.
    pub fn open(
        descriptor_path: &Path,
        root: impl Into<PathBuf>,
        probe: Box<dyn DeviceProbe>,
    ) -> Result<Self, ResolveError> {
        let index = VariantIndex::load(descriptor_path)?;
        Self::new(index, root, probe)
    }

    /// Resolve a resource id to the best-matching variant path.
    pub fn resolve(&self, resource_type: ResourceType, id: &str) -> Result<PathBuf, ResolveError> {
        validate_id(id)?;

        if let Some(path) = self.cache.get(resource_type, id) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(path);
        }
        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);

        let (_, evaluation) = self.evaluate_request(resource_type, id)?;
        let path = evaluation
            .resolved_path()
            .cloned()
            .ok_or_else(|| ResolveError::NoMatch {
                resource_type,
                id: id.to_string(),
            })?;

        self.cache.put(resource_type, id, path.clone());
        Ok(path)
    }

    /// Re-read the language tag and drop every cached result.
    ///
    /// Wired to the embedder's settings watcher; the resolver never polls
    /// for language changes itself.
    pub fn notify_language_changed(&self) -> Result<(), ResolveError> {
        let language = self.probe.probe_language()?;
        {
            let mut device = self.device.lock().unwrap_or_else(|e| e.into_inner());
            device.language = language;
        }
        self.cache.invalidate_all();
        Ok(())
    }

    /// Callback registration point for an external settings watcher.
    ///
    /// The returned closure forwards to [`Resolver::notify_language_changed`]
    /// and reports probe failures back to the watcher.
    pub fn language_listener(
        resolver: Arc<Resolver>,
    ) -> impl Fn() -> Result<(), ResolveError> + Send + Sync {
        move || resolver.notify_language_changed()
    }

    /// Snapshot of the resolution counters.
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            cache_hits: self.stats.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.stats.cache_misses.load(Ordering::Relaxed),
            index_lookups: self.stats.index_lookups.load(Ordering::Relaxed),
        }
    }

    /// Current device snapshot.
    pub fn device(&self) -> DeviceContext {
        self.device.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The variant index this resolver queries.
    pub fn index(&self) -> &VariantIndex {
        &self.index
    }

    /// The resource root variant paths are composed under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of entries currently cached.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Look up the group and evaluate every node for `id`.
    ///
    /// Shared by `resolve`, `explain`, and artifact building; counts one
    /// index lookup.
    pub(crate) fn evaluate_request(
        &self,
        resource_type: ResourceType,
        id: &str,
    ) -> Result<(DeviceContext, Evaluation), ResolveError> {
        self.stats.index_lookups.fetch_add(1, Ordering::Relaxed);

        let group = self
            .index
            .find_group(resource_type)
            .ok_or(ResolveError::GroupNotFound(resource_type))?;

        let device = self.device();
        let evaluation = self.evaluate_group(group, id, &device)?;
        Ok((device, evaluation))
    }

    fn evaluate_group(
        &self,
        group: &ResourceGroup,
        id: &str,
        device: &DeviceContext,
    ) -> Result<Evaluation, ResolveError> {
        let mut nodes = Vec::with_capacity(group.nodes.len());
        let mut best: Option<(usize, u64)> = None;
        let mut candidate_count = 0u32;

        for (i, node) in group.nodes.iter().enumerate() {
            let path = self.root.join(&node.folder).join(id);
            let file_exists = file_exists(&path)?;

            // Existence gates attribute evaluation: an absent file can
            // never be chosen, whatever its conditions say.
            let failed_condition = if file_exists {
                score::first_failed_condition(&node.attributes, device)
            } else {
                None
            };

            let matched = file_exists && failed_condition.is_none();
            let node_score = if matched {
                score::node_score(&node.attributes)
            } else {
                0
            };

            if matched {
                candidate_count += 1;
                // Strictly-greater comparison keeps the earliest node on ties
                let improves = match best {
                    Some((_, best_score)) => node_score > best_score,
                    None => true,
                };
                if improves {
                    best = Some((i, node_score));
                }
            }

            nodes.push(NodeEvaluation {
                folder: node.folder.clone(),
                file_exists,
                matched,
                failed_condition,
                score: node_score,
            });
        }

        let decision = if let Some((i, winning_score)) = best {
            let folder = group.nodes[i].folder.clone();
            let path = self.root.join(&folder).join(id);
            ExplainDecision::Selected {
                folder,
                path,
                score: winning_score,
            }
        } else {
            let fallback = self.root.join(&group.default_folder).join(id);
            if file_exists(&fallback)? {
                ExplainDecision::Fallback {
                    folder: group.default_folder.clone(),
                    path: fallback,
                }
            } else {
                ExplainDecision::NoMatch
            }
        };

        Ok(Evaluation {
            nodes,
            candidate_count,
            decision,
        })
    }
}

/// Reject ids that are empty or would compose a path outside the root.
pub(crate) fn validate_id(id: &str) -> Result<(), ResolveError> {
    if id.is_empty() {
        return Err(ResolveError::EmptyId);
    }

    let path = Path::new(id);
    if path.is_absolute() {
        return Err(ResolveError::IdEscapesRoot(id.to_string()));
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Err(ResolveError::IdEscapesRoot(id.to_string())),
        }
    }

    Ok(())
}

/// Existence check that distinguishes "absent" from filesystem failure.
fn file_exists(path: &Path) -> Result<bool, std::io::Error> {
    match std::fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id_empty() {
        assert!(matches!(validate_id(""), Err(ResolveError::EmptyId)));
    }

    #[test]
    fn test_validate_id_plain() {
        assert!(validate_id("icon.png").is_ok());
        assert!(validate_id("icons/home.png").is_ok());
    }

    #[test]
    fn test_validate_id_escaping() {
        assert!(matches!(
            validate_id("../secrets.txt"),
            Err(ResolveError::IdEscapesRoot(_))
        ));
        assert!(matches!(
            validate_id("icons/../../etc/passwd"),
            Err(ResolveError::IdEscapesRoot(_))
        ));
        assert!(matches!(
            validate_id("/etc/passwd"),
            Err(ResolveError::IdEscapesRoot(_))
        ));
    }

    #[test]
    fn test_file_exists_missing_is_ok_false() {
        assert!(!file_exists(Path::new("/nonexistent/file.png")).unwrap());
    }
}
