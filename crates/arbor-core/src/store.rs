//! Storage-side capabilities the tree builder consumes.
//!
//! The builder never talks to a database. It is handed three narrow traits:
//! one that loads entities, one that knows field definitions, one that knows
//! bundles. All are synchronous and `Send + Sync` so a builder can be shared
//! across request threads.

use arbor_types::{Account, Bundle, BundleId, Entity, FieldDefinition};
use thiserror::Error;

/// Error from a storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The entity type has no storage handler.
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Storage is reachable but set up wrong.
    #[error("storage misconfigured: {0}")]
    Misconfigured(String),

    /// Fixture or payload failed to parse.
    #[error("malformed data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Loads entities and answers per-entity view checks.
pub trait EntityStore: Send + Sync {
    /// All entities of `entity_type` whose bundle key equals `bundle`, in
    /// storage order.
    fn load_by_bundle(&self, entity_type: &str, bundle: &BundleId) -> StoreResult<Vec<Entity>>;

    /// Whether `account` may view `entity`.
    fn can_view(&self, entity: &Entity, account: &Account) -> bool;
}

/// Field definitions per bundle, in declaration order.
pub trait SchemaRegistry: Send + Sync {
    /// `Ok(None)` when the registry has never heard of the bundle.
    fn field_definitions(
        &self,
        entity_type: &str,
        bundle: &BundleId,
    ) -> StoreResult<Option<Vec<FieldDefinition>>>;
}

/// Bundle definitions.
pub trait BundleRegistry: Send + Sync {
    fn load(&self, bundle: &BundleId) -> StoreResult<Option<Bundle>>;
}
