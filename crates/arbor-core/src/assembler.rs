//! Tree assembly from flat entities.
//!
//! Output order is fixed: the bundle node first, then one node per visible,
//! complete entity in storage order. An entity is complete when at least one
//! of the bundle's custom fields has stored values; incomplete entities are
//! left out entirely, which is not the same as having no parent.

use std::collections::BTreeSet;
use std::sync::Arc;

use arbor_types::{Account, Bundle, CacheTag, Entity, FieldName, LangCode, ParentRef, TreeNode};

use crate::parent::ParentFieldResolver;
use crate::repair;
use crate::store::EntityStore;

/// An assembled tree plus the tags of everything that went into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assembled {
    pub nodes: Vec<TreeNode>,
    pub tags: BTreeSet<CacheTag>,
}

/// Builds the ordered node list for one bundle.
pub struct TreeAssembler {
    entities: Arc<dyn EntityStore>,
    resolver: Arc<dyn ParentFieldResolver>,
    reattach_orphans: bool,
    break_cycles: bool,
}

impl TreeAssembler {
    /// Create an assembler with both structural repairs enabled.
    pub fn new(entities: Arc<dyn EntityStore>, resolver: Arc<dyn ParentFieldResolver>) -> Self {
        Self {
            entities,
            resolver,
            reattach_orphans: true,
            break_cycles: true,
        }
    }

    pub fn with_orphan_reattachment(mut self, enabled: bool) -> Self {
        self.reattach_orphans = enabled;
        self
    }

    pub fn with_cycle_breaking(mut self, enabled: bool) -> Self {
        self.break_cycles = enabled;
        self
    }

    /// Assemble the tree for `bundle` from `entities`.
    ///
    /// Never fails: entities the account may not view and entities with
    /// malformed values are skipped.
    pub fn assemble(
        &self,
        bundle: &Bundle,
        entities: &[Entity],
        custom_fields: &[FieldName],
        lang: &LangCode,
        account: &Account,
    ) -> Assembled {
        let mut nodes = Vec::with_capacity(entities.len() + 1);
        nodes.push(TreeNode::bundle(bundle.id.clone(), bundle.label.clone()));

        let mut tags: BTreeSet<CacheTag> = bundle.cache_tags().into_iter().collect();

        for entity in entities {
            // Skipped entities still shape the tree through their children
            tags.extend(entity.cache_tags());

            if !self.entities.can_view(entity, account) {
                tracing::trace!(
                    entity = %entity.id,
                    account = %account,
                    "entity not viewable, skipped"
                );
                continue;
            }

            if !entity.values.contains_any(custom_fields) {
                tracing::debug!(
                    entity = %entity.id,
                    bundle = %bundle.id,
                    "entity has no custom field values, skipped"
                );
                continue;
            }

            let parent = match self.resolver.resolve_parent(&entity.values, custom_fields) {
                Some(parent_id) => ParentRef::entity(parent_id),
                None => ParentRef::bundle(bundle.id.clone()),
            };

            nodes.push(TreeNode::entity(entity.id, parent, entity.label_in(lang)));
        }

        if self.reattach_orphans {
            let moved = repair::reattach_orphans(&mut nodes, &bundle.id);
            if !moved.is_empty() {
                tracing::warn!(
                    bundle = %bundle.id,
                    entities = ?moved,
                    "parents missing from tree, attached to bundle"
                );
            }
        }

        if self.break_cycles {
            let moved = repair::break_cycles(&mut nodes, &bundle.id);
            if !moved.is_empty() {
                tracing::warn!(
                    bundle = %bundle.id,
                    entities = ?moved,
                    "parent cycles cut, attached to bundle"
                );
            }
        }

        Assembled { nodes, tags }
    }
}

// ============================================================================
// Tests
// ============================================================================
