//! Result cache for resolved variant paths.
//!
//! Memoizes `(type, id) -> path` with a per-entry hit count. When the entry
//! count reaches the configured threshold, the coldest half of the entries
//! is marked and dropped before the next insert, which bounds memory
//! without maintaining recency metadata on every hit.
//!
//! The cache is thread-safe via a single `std::sync::Mutex`; lookups also
//! mutate hit counts, so there is nothing to gain from a reader/writer
//! split.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use resvar_descriptor::ResourceType;

/// Default entry threshold before eviction kicks in.
pub const DEFAULT_THRESHOLD: usize = 50;

/// Configuration for [`ResultCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries held at once
    pub threshold: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

type CacheKey = (ResourceType, String);

#[derive(Debug, Clone)]
struct CacheEntry {
    path: PathBuf,
    hit_count: u64,
    marked_for_eviction: bool,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
}

/// Bounded memo of resolved paths.
#[derive(Debug)]
pub struct ResultCache {
    state: Mutex<CacheState>,
    config: CacheConfig,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl ResultCache {
    /// Create a cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            config,
        }
    }

    /// Look up a resolved path. Increments the entry's hit count on hit.
    pub fn get(&self, resource_type: ResourceType, id: &str) -> Option<PathBuf> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let entry = state.entries.get_mut(&(resource_type, id.to_string()))?;
        entry.hit_count += 1;
        Some(entry.path.clone())
    }

    /// Insert a resolved path, evicting the coldest half first when the
    /// cache is full.
    pub fn put(&self, resource_type: ResourceType, id: &str, path: PathBuf) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if state.entries.len() >= self.config.threshold {
            self.evict_coldest(&mut state);
        }

        state.entries.insert(
            (resource_type, id.to_string()),
            CacheEntry {
                path,
                hit_count: 0,
                marked_for_eviction: false,
            },
        );
    }

    /// Drop every entry. Called when the device language changes.
    pub fn invalidate_all(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.clear();
    }

    /// Whether an entry exists, without touching its hit count.
    pub fn contains(&self, resource_type: ResourceType, id: &str) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.contains_key(&(resource_type, id.to_string()))
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured entry threshold.
    pub fn threshold(&self) -> usize {
        self.config.threshold
    }

    /// Mark the coldest `threshold / 2` entries, then drop the marked ones.
    ///
    /// Ranking is by hit count ascending with the key as a stable
    /// tie-break, so eviction is deterministic for a given access history.
    fn evict_coldest(&self, state: &mut CacheState) {
        let evict_count = self.config.threshold / 2;

        let mut ranked: Vec<(CacheKey, u64)> = state
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.hit_count))
            .collect();
        ranked.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        for (key, _) in ranked.into_iter().take(evict_count) {
            if let Some(entry) = state.entries.get_mut(&key) {
                entry.marked_for_eviction = true;
            }
        }

        state.entries.retain(|_, entry| !entry.marked_for_eviction);
    }
}
