//! Custom-field resolution for a bundle.

use std::sync::Arc;

use arbor_types::{BundleId, FieldName};

use crate::error::{TreeError, TreeResult};
use crate::store::SchemaRegistry;

/// Lists a bundle's custom (non-base) field names.
pub struct SchemaResolver {
    registry: Arc<dyn SchemaRegistry>,
}

impl SchemaResolver {
    pub fn new(registry: Arc<dyn SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Custom field names of `bundle`, in the registry's declaration order.
    ///
    /// The order is the tie-break for parent inference and is never re-sorted.
    pub fn custom_fields(
        &self,
        entity_type: &str,
        bundle: &BundleId,
    ) -> TreeResult<Vec<FieldName>> {
        let definitions = self
            .registry
            .field_definitions(entity_type, bundle)?
            .ok_or_else(|| TreeError::BundleNotFound(bundle.clone()))?;

        Ok(definitions
            .into_iter()
            .filter(|def| !def.is_base())
            .map(|def| def.name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use arbor_types::FieldDefinition;

    #[test]
    fn test_custom_fields_keep_declaration_order() {
        let store = MemoryStore::new();
        store.define_fields(
            "country",
            vec![
                FieldDefinition::base("eid"),
                FieldDefinition::custom("fz9"),
                FieldDefinition::base("langcode"),
                FieldDefinition::custom("fa1"),
                FieldDefinition::custom("fm5"),
            ],
        );

        let resolver = SchemaResolver::new(Arc::new(store));
        let fields = resolver.custom_fields("wisski_individual", &"country".into()).unwrap();
        assert_eq!(fields, vec![FieldName::from("fz9"), "fa1".into(), "fm5".into()]);
    }

    #[test]
    fn test_unknown_bundle_is_fatal() {
        let resolver = SchemaResolver::new(Arc::new(MemoryStore::new()));
        let err = resolver
            .custom_fields("wisski_individual", &"atlantis".into())
            .unwrap_err();
        assert!(matches!(err, TreeError::BundleNotFound(b) if b == "atlantis"));
    }

    #[test]
    fn test_bundle_with_only_base_fields() {
        let store = MemoryStore::new();
        store.define_fields("empty", vec![FieldDefinition::base("eid")]);
        let resolver = SchemaResolver::new(Arc::new(store));
        assert!(resolver.custom_fields("wisski_individual", &"empty".into()).unwrap().is_empty());
    }
}
