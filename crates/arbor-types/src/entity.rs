//! Entity records and their field values.
//!
//! Entities are stored flat. Whatever hierarchy exists lives inside the
//! value-map, as a reference field pointing at another entity of the same
//! bundle. The value-map is typed enough to make that scan checkable:
//!
//! ```text
//! ValueMap
//!     └── FieldName → FieldValues
//!             ├── main_property: Option<String>   ("target_id" for references)
//!             └── items: [PropertyRecord]         (multi-valued fields)
//!                     └── sub-property → JSON value
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::{BundleId, CacheTag, EntityId, FieldName, LangCode};

/// Sub-property a reference field declares as its primary scalar.
pub const TARGET_ID: &str = "target_id";

/// One item of a (possibly multi-valued) field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyRecord(IndexMap<String, serde_json::Value>);

impl PropertyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reference item pointing at `target`.
    pub fn reference(target: impl Into<serde_json::Value>) -> Self {
        Self::new().with(TARGET_ID, target)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// The referenced entity, if this item holds a usable `target_id`.
    pub fn target_id(&self) -> Option<EntityId> {
        self.get(TARGET_ID).and_then(EntityId::coerce)
    }
}

/// All stored items of one field, plus the field's declared primary sub-property.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_property: Option<String>,
    #[serde(default)]
    pub items: Vec<PropertyRecord>,
}

impl FieldValues {
    /// A reference field (`main_property = "target_id"`) with one item per target.
    pub fn reference<I, V>(targets: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        Self {
            main_property: Some(TARGET_ID.to_string()),
            items: targets.into_iter().map(PropertyRecord::reference).collect(),
        }
    }

    /// A plain scalar field, e.g. `main_property = "value"`.
    pub fn scalar(main_property: &str, value: impl Into<serde_json::Value>) -> Self {
        Self {
            main_property: Some(main_property.to_string()),
            items: vec![PropertyRecord::new().with(main_property, value)],
        }
    }

    /// Whether the field declares `target_id` as its primary sub-property.
    pub fn is_reference(&self) -> bool {
        self.main_property.as_deref() == Some(TARGET_ID)
    }

    pub fn first(&self) -> Option<&PropertyRecord> {
        self.items.first()
    }
}

/// Field name → stored values, in storage order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap(IndexMap<FieldName, FieldValues>);

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<FieldName>,
        values: FieldValues,
    ) -> Option<FieldValues> {
        self.0.insert(name.into(), values)
    }

    pub fn get(&self, name: &FieldName) -> Option<&FieldValues> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &FieldName) -> bool {
        self.0.contains_key(name)
    }

    /// Whether at least one of `names` has stored values.
    pub fn contains_any(&self, names: &[FieldName]) -> bool {
        names.iter().any(|n| self.contains(n))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &FieldValues)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<FieldName>> FromIterator<(N, FieldValues)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (N, FieldValues)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }
}

/// A language-specific rendition of an entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub label: String,
}

/// One concrete record belonging to a bundle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub entity_type: String,
    pub bundle: BundleId,
    /// Default label, used when no translation matches.
    pub label: String,
    #[serde(default)]
    pub translations: IndexMap<LangCode, Translation>,
    #[serde(default)]
    pub values: ValueMap,
    /// Invalidation tags beyond the entity's own `{entity_type}:{id}` tag.
    #[serde(default)]
    pub tags: Vec<CacheTag>,
}

impl Entity {
    pub fn new(
        entity_type: impl Into<String>,
        id: impl Into<EntityId>,
        bundle: impl Into<BundleId>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
            bundle: bundle.into(),
            label: label.into(),
            translations: IndexMap::new(),
            values: ValueMap::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_translation(mut self, lang: impl Into<LangCode>, label: impl Into<String>) -> Self {
        self.translations
            .insert(lang.into(), Translation { label: label.into() });
        self
    }

    pub fn with_field(mut self, name: impl Into<FieldName>, values: FieldValues) -> Self {
        self.values.insert(name, values);
        self
    }

    pub fn has_translation(&self, lang: &LangCode) -> bool {
        self.translations.contains_key(lang)
    }

    /// Label in `lang` if translated, otherwise the default label.
    pub fn label_in(&self, lang: &LangCode) -> &str {
        self.translations
            .get(lang)
            .map(|t| t.label.as_str())
            .unwrap_or(&self.label)
    }

    /// All invalidation tags for this entity, own tag first.
    pub fn cache_tags(&self) -> Vec<CacheTag> {
        let mut tags = vec![CacheTag::for_entity(&self.entity_type, self.id)];
        tags.extend(self.tags.iter().cloned());
        tags
    }
}

// ============================================================================
// Tests
// ============================================================================
