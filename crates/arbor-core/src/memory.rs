//! In-memory storage collaborators.
//!
//! Used by the CLI and tests. One `MemoryStore` plays entity store, schema
//! registry, and bundle registry at once. Entities come back in insertion
//! order, which stands in for storage query order.
//!
//! Fixtures are JSON:
//!
//! ```json
//! {
//!   "bundles": [
//!     {"id": "country", "label": "Country",
//!      "fields": [{"name": "eid", "kind": "base"}, {"name": "f7c2"}]}
//!   ],
//!   "entities": [
//!     {"id": 1, "entity_type": "wisski_individual", "bundle": "country",
//!      "label": "Africa", "values": {"f7c2": {"main_property": "value", "items": []}}}
//!   ],
//!   "hidden": [{"entity_type": "wisski_individual", "id": 1}]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use arbor_types::{Account, Bundle, BundleId, Entity, EntityId, FieldDefinition};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::store::{BundleRegistry, EntityStore, SchemaRegistry, StoreResult};

/// A bundle together with its field definitions, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleFixture {
    #[serde(flatten)]
    pub bundle: Bundle,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// Reference to one entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity_type: String,
    pub id: EntityId,
}

/// Serialized content of a `MemoryStore`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub bundles: Vec<BundleFixture>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Entities nobody may view.
    #[serde(default)]
    pub hidden: Vec<EntityRef>,
}

#[derive(Default)]
struct Inner {
    bundles: IndexMap<BundleId, Bundle>,
    fields: HashMap<BundleId, Vec<FieldDefinition>>,
    entities: IndexMap<(String, EntityId), Entity>,
    hidden: HashSet<(String, EntityId)>,
}

/// In-memory entity store, schema registry, and bundle registry.
///
/// Thread-safe via internal `RwLock`.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        let store = Self::new();
        for b in fixture.bundles {
            store.add_bundle(b.bundle, b.fields);
        }
        for entity in fixture.entities {
            store.insert_entity(entity);
        }
        for r in fixture.hidden {
            store.hide(&r.entity_type, r.id);
        }
        store
    }

    pub fn from_json(text: &str) -> StoreResult<Self> {
        let fixture: Fixture = serde_json::from_str(text)?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn load_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Register a bundle and its field definitions.
    pub fn add_bundle(&self, bundle: Bundle, fields: Vec<FieldDefinition>) {
        let mut inner = self.inner.write();
        inner.fields.insert(bundle.id.clone(), fields);
        inner.bundles.insert(bundle.id.clone(), bundle);
    }

    /// Set field definitions without registering a bundle.
    pub fn define_fields(&self, bundle: impl Into<BundleId>, fields: Vec<FieldDefinition>) {
        self.inner.write().fields.insert(bundle.into(), fields);
    }

    /// Insert or replace an entity. Replacement keeps its original position.
    pub fn insert_entity(&self, entity: Entity) -> Option<Entity> {
        let key = (entity.entity_type.clone(), entity.id);
        self.inner.write().entities.insert(key, entity)
    }

    pub fn remove_entity(&self, entity_type: &str, id: EntityId) -> Option<Entity> {
        self.inner
            .write()
            .entities
            .shift_remove(&(entity_type.to_string(), id))
    }

    pub fn hide(&self, entity_type: &str, id: EntityId) {
        self.inner.write().hidden.insert((entity_type.to_string(), id));
    }

    pub fn reveal(&self, entity_type: &str, id: EntityId) {
        self.inner.write().hidden.remove(&(entity_type.to_string(), id));
    }

    pub fn entity_count(&self) -> usize {
        self.inner.read().entities.len()
    }
}

impl EntityStore for MemoryStore {
    fn load_by_bundle(&self, entity_type: &str, bundle: &BundleId) -> StoreResult<Vec<Entity>> {
        let inner = self.inner.read();
        Ok(inner
            .entities
            .values()
            .filter(|e| e.entity_type == entity_type && &e.bundle == bundle)
            .cloned()
            .collect())
    }

    fn can_view(&self, entity: &Entity, _account: &Account) -> bool {
        !self
            .inner
            .read()
            .hidden
            .contains(&(entity.entity_type.clone(), entity.id))
    }
}

impl SchemaRegistry for MemoryStore {
    fn field_definitions(
        &self,
        _entity_type: &str,
        bundle: &BundleId,
    ) -> StoreResult<Option<Vec<FieldDefinition>>> {
        Ok(self.inner.read().fields.get(bundle).cloned())
    }
}

impl BundleRegistry for MemoryStore {
    fn load(&self, bundle: &BundleId) -> StoreResult<Option<Bundle>> {
        Ok(self.inner.read().bundles.get(bundle).cloned())
    }
}

// ============================================================================
// Tests
// ============================================================================
