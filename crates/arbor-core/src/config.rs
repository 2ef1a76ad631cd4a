//! Tree builder configuration.
//!
//! Loaded from RON. Every field has a default, so an empty `()` is a valid
//! config:
//!
//! ```ron
//! (
//!     access_permission: "access content",
//!     cache_prefix: "arbor_tree:",
//!     cache_ttl_secs: 2592000,
//!     parent_field: Some("f7c2d1e0"),
//!     reattach_orphans: true,
//!     break_cycles: true,
//! )
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Thirty days.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// A century. Longer TTLs are rejected.
pub const MAX_CACHE_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Coarse gate only; per-entity view checks do the real filtering.
pub const DEFAULT_ACCESS_PERMISSION: &str = "access content";

pub const DEFAULT_CACHE_PREFIX: &str = "arbor_tree:";

/// Error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Permission an account needs before any tree is built for it.
    pub access_permission: String,
    /// Prepended to every cache key.
    pub cache_prefix: String,
    pub cache_ttl_secs: u64,
    /// Read parents only from this field instead of scanning for the first
    /// reference field.
    pub parent_field: Option<String>,
    /// Hang nodes whose parent is missing from the tree under the bundle node.
    pub reattach_orphans: bool,
    /// Cut parent cycles by hanging one member under the bundle node.
    pub break_cycles: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            access_permission: DEFAULT_ACCESS_PERMISSION.to_string(),
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            parent_field: None,
            reattach_orphans: true,
            break_cycles: true,
        }
    }
}

impl TreeConfig {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: TreeConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// The TTL in millis, saturating for configs built without validation.
    pub fn cache_ttl_millis(&self) -> u64 {
        u64::try_from(self.cache_ttl().as_millis()).unwrap_or(u64::MAX)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.access_permission.trim().is_empty() {
            return Err(ConfigError::Invalid("access_permission is empty".into()));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid("cache_ttl_secs must be positive".into()));
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "cache_ttl_secs exceeds {MAX_CACHE_TTL_SECS}"
            )));
        }
        if matches!(self.parent_field.as_deref(), Some(f) if f.trim().is_empty()) {
            return Err(ConfigError::Invalid("parent_field is empty".into()));
        }
        Ok(())
    }
}
