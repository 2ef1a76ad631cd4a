//! Errors that abort a tree build.
//!
//! Only fatal conditions live here. Wildcard bundles and access denial come
//! back as empty trees, and unreadable entities are skipped, so none of those
//! show up as variants.

use arbor_types::BundleId;
use thiserror::Error;

use crate::cache::CacheError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum TreeError {
    /// The bundle is unknown to the bundle or schema registry.
    #[error("bundle not found: {0}")]
    BundleNotFound(BundleId),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

pub type TreeResult<T> = Result<T, TreeError>;
