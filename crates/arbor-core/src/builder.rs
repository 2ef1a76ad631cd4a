//! The tree builder: read-through caching around schema resolution and assembly.
//!
//! # Flow
//!
//! ```text
//! load_tree(entity_type, bundle, lang?)
//!     │
//!     ├── bundle == "*"          → warn, []      (cache and store untouched)
//!     ├── account lacks permission → warn, []
//!     │
//!     ├── lang = lang? or current language
//!     ├── key  = {prefix}{bundle}_{lang}
//!     │
//!     ├── cache hit  → cached nodes, as stored
//!     └── cache miss → load bundle        (missing → BundleNotFound)
//!                      custom fields      (missing → BundleNotFound)
//!                      entities
//!                      assemble + repairs
//!                      set(key, nodes, now + ttl, tags)
//! ```
//!
//! Concurrent misses for the same key both rebuild and both write; the build
//! is a pure function of stored state, so the last write wins harmlessly.

use std::sync::Arc;

use arbor_types::{Account, BundleId, CacheTag, LangCode, TreeNode};

use crate::access::AccessGuard;
use crate::assembler::{Assembled, TreeAssembler};
use crate::cache::{CacheBackend, cache_key};
use crate::config::TreeConfig;
use crate::env::{AccountProvider, Clock, LanguageProvider};
use crate::error::{TreeError, TreeResult};
use crate::parent::{FirstReferenceResolver, NamedFieldResolver, ParentFieldResolver};
use crate::schema::SchemaResolver;
use crate::store::{BundleRegistry, EntityStore, SchemaRegistry};

/// Everything the builder talks to.
#[derive(Clone)]
pub struct TreeDeps {
    pub entities: Arc<dyn EntityStore>,
    pub schema: Arc<dyn SchemaRegistry>,
    pub bundles: Arc<dyn BundleRegistry>,
    pub cache: Arc<dyn CacheBackend>,
    pub language: Arc<dyn LanguageProvider>,
    pub accounts: Arc<dyn AccountProvider>,
    pub clock: Arc<dyn Clock>,
}

impl TreeDeps {
    /// Wire one store that serves entities, schema, and bundles.
    pub fn from_store<S>(
        store: Arc<S>,
        cache: Arc<dyn CacheBackend>,
        language: Arc<dyn LanguageProvider>,
        accounts: Arc<dyn AccountProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        S: EntityStore + SchemaRegistry + BundleRegistry + 'static,
    {
        Self {
            entities: store.clone(),
            schema: store.clone(),
            bundles: store,
            cache,
            language,
            accounts,
            clock,
        }
    }
}

/// Builds and caches bundle trees.
pub struct TreeBuilder {
    entities: Arc<dyn EntityStore>,
    bundles: Arc<dyn BundleRegistry>,
    cache: Arc<dyn CacheBackend>,
    language: Arc<dyn LanguageProvider>,
    accounts: Arc<dyn AccountProvider>,
    clock: Arc<dyn Clock>,
    schema: SchemaResolver,
    assembler: TreeAssembler,
    guard: AccessGuard,
    config: TreeConfig,
}

impl TreeBuilder {
    /// Create a builder. The parent strategy follows `config.parent_field`:
    /// a named field when set, the first-reference scan otherwise.
    pub fn new(deps: TreeDeps, config: TreeConfig) -> Self {
        let resolver: Arc<dyn ParentFieldResolver> = match &config.parent_field {
            Some(field) => Arc::new(NamedFieldResolver::new(field.as_str())),
            None => Arc::new(FirstReferenceResolver),
        };
        Self::with_resolver(deps, config, resolver)
    }

    /// Create a builder with a caller-supplied parent strategy.
    pub fn with_resolver(
        deps: TreeDeps,
        config: TreeConfig,
        resolver: Arc<dyn ParentFieldResolver>,
    ) -> Self {
        let assembler = TreeAssembler::new(deps.entities.clone(), resolver)
            .with_orphan_reattachment(config.reattach_orphans)
            .with_cycle_breaking(config.break_cycles);

        Self {
            entities: deps.entities,
            bundles: deps.bundles,
            cache: deps.cache,
            language: deps.language,
            accounts: deps.accounts,
            clock: deps.clock,
            schema: SchemaResolver::new(deps.schema),
            assembler,
            guard: AccessGuard::new(config.access_permission.clone()),
            config,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Whether `account` passes the bundle-level gate.
    pub fn has_access(&self, account: &Account) -> bool {
        self.guard.has_access(account)
    }

    /// The cache key a request for `bundle` in `lang` would use.
    pub fn cache_key(&self, bundle: &BundleId, lang: &LangCode) -> String {
        cache_key(&self.config.cache_prefix, bundle, lang)
    }

    /// Load the tree for `bundle`, from cache when possible.
    ///
    /// `lang` falls back to the current language. `parent` and `max_depth`
    /// exist for call-compatibility with taxonomy trees and are ignored:
    /// the whole bundle is always returned.
    #[tracing::instrument(skip(self, _parent, _max_depth), name = "tree.load")]
    pub fn load_tree(
        &self,
        entity_type: &str,
        bundle: &BundleId,
        lang: Option<&LangCode>,
        _parent: u64,
        _max_depth: Option<u32>,
    ) -> TreeResult<Vec<TreeNode>> {
        if bundle.is_wildcard() {
            tracing::warn!(entity_type, "wildcard bundle cannot be built as a tree");
            return Ok(Vec::new());
        }

        let account = self.accounts.current_account();
        if !self.guard.has_access(&account) {
            tracing::warn!(
                user = %account.name,
                permission = self.guard.permission(),
                bundle = %bundle,
                "access denied to bundle tree"
            );
            return Ok(Vec::new());
        }

        let lang = match lang {
            Some(lang) => lang.clone(),
            None => self.language.current_language(),
        };
        let key = self.cache_key(bundle, &lang);

        if let Some(entry) = self.cache.get(&key)? {
            tracing::debug!(%key, nodes = entry.data.len(), "tree cache hit");
            return Ok(entry.data);
        }
        tracing::debug!(%key, "tree cache miss");

        let Assembled { nodes, tags } = self.build(entity_type, bundle, &lang, &account)?;

        let expire_at = self
            .clock
            .now_millis()
            .saturating_add(self.config.cache_ttl_millis());
        self.cache.set(&key, nodes.clone(), expire_at, tags)?;

        Ok(nodes)
    }

    fn build(
        &self,
        entity_type: &str,
        bundle_id: &BundleId,
        lang: &LangCode,
        account: &Account,
    ) -> TreeResult<Assembled> {
        let bundle = self
            .bundles
            .load(bundle_id)?
            .ok_or_else(|| TreeError::BundleNotFound(bundle_id.clone()))?;
        let custom_fields = self.schema.custom_fields(entity_type, bundle_id)?;
        let entities = self.entities.load_by_bundle(entity_type, bundle_id)?;

        let mut assembled = self
            .assembler
            .assemble(&bundle, &entities, &custom_fields, lang, account);

        // Stores invalidate the list tag whenever an entity of the type is
        // saved or deleted; new entities carry no other tag this tree holds
        assembled.tags.insert(CacheTag::for_entity_list(entity_type));

        tracing::debug!(
            bundle = %bundle_id,
            %lang,
            entities = entities.len(),
            nodes = assembled.nodes.len(),
            "tree assembled"
        );
        Ok(assembled)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::env::{FixedAccount, FixedLanguage, ManualClock};
    use crate::memory::MemoryStore;
    use arbor_types::{Bundle, Entity, FieldDefinition, FieldValues};

    const TYPE: &str = "wisski_individual";

    struct Harness {
        store: Arc<MemoryStore>,
        cache: Arc<MemoryCache>,
        language: Arc<FixedLanguage>,
        accounts: Arc<FixedAccount>,
        builder: TreeBuilder,
    }

    fn harness(config: TreeConfig) -> Harness {
        let store = Arc::new(MemoryStore::new());
        store.add_bundle(
            Bundle::new("country", "Country"),
            vec![
                FieldDefinition::base("eid"),
                FieldDefinition::custom("fname"),
                FieldDefinition::custom("fparent"),
            ],
        );
        store.insert_entity(
            Entity::new(TYPE, 1u64, "country", "Africa")
                .with_field("fname", FieldValues::scalar("value", "Africa")),
        );
        store.insert_entity(
            Entity::new(TYPE, 2u64, "country", "South Africa")
                .with_translation("de", "Südafrika")
                .with_field("fname", FieldValues::scalar("value", "South Africa"))
                .with_field("fparent", FieldValues::reference([1u64])),
        );

        let clock = Arc::new(ManualClock::new(1_000));
        let cache = Arc::new(MemoryCache::new(clock.clone()));
        let language = Arc::new(FixedLanguage::new("en"));
        let accounts = Arc::new(FixedAccount::new(
            Account::new("amy").with_permission("access content"),
        ));
        let deps = TreeDeps::from_store(
            store.clone(),
            cache.clone(),
            language.clone(),
            accounts.clone(),
            clock,
        );
        Harness {
            store,
            cache,
            language,
            accounts,
            builder: TreeBuilder::new(deps, config),
        }
    }

    #[test]
    fn test_builds_and_caches() {
        let h = harness(TreeConfig::default());
        let nodes = h.builder.load_tree(TYPE, &"country".into(), None, 0, None).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[2].parent.to_string(), "1");
        assert_eq!(h.cache.len(), 1);

        let key = h.builder.cache_key(&"country".into(), &"en".into());
        let entry = h.cache.get(&key).unwrap().unwrap();
        assert_eq!(entry.data, nodes);
        assert!(entry.tags.contains(&CacheTag::from("wisski_individual_list")));
        assert!(entry.tags.contains(&CacheTag::from("wisski_individual:2")));
        assert_eq!(entry.expire_at, 1_000 + 30 * 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_language_falls_back_to_current() {
        let h = harness(TreeConfig::default());
        h.language.switch("de");
        let nodes = h.builder.load_tree(TYPE, &"country".into(), None, 0, None).unwrap();
        assert_eq!(nodes[2].text, "Südafrika");
        assert!(h.cache.get("arbor_tree:country_de").unwrap().is_some());

        let nodes = h
            .builder
            .load_tree(TYPE, &"country".into(), Some(&"en".into()), 0, None)
            .unwrap();
        assert_eq!(nodes[2].text, "South Africa");
        assert_eq!(h.cache.len(), 2);
    }

    #[test]
    fn test_wildcard_and_denied_return_empty() {
        let h = harness(TreeConfig::default());
        assert!(h.builder.load_tree(TYPE, &"*".into(), None, 0, None).unwrap().is_empty());

        h.accounts.switch(Account::anonymous());
        assert!(h.builder.load_tree(TYPE, &"country".into(), None, 0, None).unwrap().is_empty());
        assert!(h.cache.is_empty());
    }

    #[test]
    fn test_missing_bundle_is_an_error() {
        let h = harness(TreeConfig::default());
        let err = h
            .builder
            .load_tree(TYPE, &"atlantis".into(), None, 0, None)
            .unwrap_err();
        assert!(matches!(err, TreeError::BundleNotFound(b) if b == "atlantis"));
        assert!(h.cache.is_empty());
    }

    #[test]
    fn test_named_parent_field_from_config() {
        let config = TreeConfig {
            parent_field: Some("fother".to_string()),
            ..TreeConfig::default()
        };
        let h = harness(config);
        h.store.define_fields(
            "country",
            vec![
                FieldDefinition::custom("fname"),
                FieldDefinition::custom("fparent"),
                FieldDefinition::custom("fother"),
            ],
        );
        let nodes = h.builder.load_tree(TYPE, &"country".into(), None, 0, None).unwrap();
        // fparent is ignored, fother is absent
        assert_eq!(nodes[2].parent.to_string(), "country");
    }

    #[test]
    fn test_custom_permission() {
        let config = TreeConfig {
            access_permission: "view trees".to_string(),
            ..TreeConfig::default()
        };
        let h = harness(config);
        assert!(!h.builder.has_access(&Account::new("amy").with_permission("access content")));
        assert!(h.builder.has_access(&Account::new("amy").with_permission("view trees")));
    }
}
