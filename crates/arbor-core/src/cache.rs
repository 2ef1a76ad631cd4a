//! Cache contract for assembled trees.
//!
//! An entry holds one complete node list for one (bundle, language) pair,
//! an absolute expiry, and the invalidation tags of everything that went into
//! it. Backends drop an entry when it expires or when any of its tags is
//! invalidated, whichever comes first. The builder never re-validates a hit.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use arbor_types::{BundleId, CacheTag, LangCode, TreeNode};
use parking_lot::RwLock;
use thiserror::Error;

use crate::env::Clock;

/// Error from a cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// One stored tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    pub data: Vec<TreeNode>,
    /// Absolute expiry, Unix millis.
    pub expire_at: u64,
    pub tags: BTreeSet<CacheTag>,
}

impl CacheEntry {
    pub fn is_expired(&self, now_millis: u64) -> bool {
        now_millis >= self.expire_at
    }

    pub fn has_any_tag(&self, tags: &[CacheTag]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }
}

/// Storage for assembled trees.
pub trait CacheBackend: Send + Sync {
    /// A live entry for `key`, or `None` on miss, expiry, or invalidation.
    fn get(&self, key: &str) -> CacheResult<Option<CacheEntry>>;

    /// Store `data` under `key`, replacing any previous entry.
    fn set(
        &self,
        key: &str,
        data: Vec<TreeNode>,
        expire_at: u64,
        tags: BTreeSet<CacheTag>,
    ) -> CacheResult<()>;
}

/// Cache key for one bundle in one language: `{prefix}{bundle}_{lang}`.
///
/// The language suffix is left off only when the language is empty.
pub fn cache_key(prefix: &str, bundle: &BundleId, lang: &LangCode) -> String {
    if lang.is_empty() {
        format!("{prefix}{bundle}")
    } else {
        format!("{prefix}{bundle}_{lang}")
    }
}

/// In-process cache backend with tag invalidation.
///
/// Thread-safe via internal `RwLock`. Expired entries are dropped lazily
/// on read.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Drop every entry carrying any of `tags`. Returns how many went.
    pub fn invalidate_tags(&self, tags: &[CacheTag]) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.has_any_tag(tags));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(?tags, removed, "invalidated cached trees");
        }
        removed
    }

    pub fn delete(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl CacheBackend for MemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<CacheEntry>> {
        let now = self.clock.now_millis();

        // Fast path: live entry
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it unless a writer already replaced it
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    fn set(
        &self,
        key: &str,
        data: Vec<TreeNode>,
        expire_at: u64,
        tags: BTreeSet<CacheTag>,
    ) -> CacheResult<()> {
        self.entries.write().insert(
            key.to_string(),
            CacheEntry {
                data,
                expire_at,
                tags,
            },
        );
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
