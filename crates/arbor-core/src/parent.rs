//! Parent inference strategies.
//!
//! The parent pointer is a custom field with a generated name, so it cannot
//! be looked up by name across bundles. The default strategy detects it by
//! shape instead: the first custom field, in declaration order, whose
//! `main_property` is `target_id`. A bundle with two reference fields gets
//! its parent from whichever is declared first. [`NamedFieldResolver`] pins
//! the field explicitly for bundles where that guess is wrong.

use arbor_types::{EntityId, FieldName, ValueMap};

/// Finds an entity's parent in its value-map.
pub trait ParentFieldResolver: Send + Sync {
    /// The parent entity id, or `None` when the entity hangs at the bundle root.
    ///
    /// `custom_fields` is the bundle's custom field list in declaration order.
    fn resolve_parent(&self, values: &ValueMap, custom_fields: &[FieldName]) -> Option<EntityId>;
}

/// First-match scan over custom fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstReferenceResolver;

impl ParentFieldResolver for FirstReferenceResolver {
    fn resolve_parent(&self, values: &ValueMap, custom_fields: &[FieldName]) -> Option<EntityId> {
        let field = custom_fields
            .iter()
            .filter_map(|name| values.get(name))
            .find(|field| field.is_reference())?;

        // First match wins even when its target is unusable
        field.first().and_then(|item| item.target_id())
    }
}

/// Reads the parent from one configured field.
#[derive(Debug, Clone)]
pub struct NamedFieldResolver {
    field: FieldName,
}

impl NamedFieldResolver {
    pub fn new(field: impl Into<FieldName>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn field(&self) -> &FieldName {
        &self.field
    }
}

impl ParentFieldResolver for NamedFieldResolver {
    fn resolve_parent(&self, values: &ValueMap, custom_fields: &[FieldName]) -> Option<EntityId> {
        if !custom_fields.contains(&self.field) {
            return None;
        }
        values
            .get(&self.field)
            .filter(|field| field.is_reference())
            .and_then(|field| field.first())
            .and_then(|item| item.target_id())
    }
}

// ============================================================================
// Tests
// ============================================================================
