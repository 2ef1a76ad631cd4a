//! Shared data types for arbor.
//!
//! This crate is the vocabulary the tree builder speaks: typed ids, bundles
//! and their field definitions, entities with their value-maps, and the node
//! shapes handed to the tree widget. It has **no internal arbor
//! dependencies**, a pure leaf crate that other crates build on.
//!
//! # Entity-Relationship Overview
//!
//! ```text
//! Bundle (BundleId) ← schema/category, e.g. "country"
//!     └── declares FieldDefinition (FieldName, base | custom), ordered
//!     └── groups Entity (EntityId)
//!
//! Entity (EntityId) ← one flat record, e.g. "Johannesburg"
//!     └── translations keyed by LangCode
//!     └── ValueMap: FieldName → FieldValues → [PropertyRecord]
//!             └── a custom reference field (main_property = target_id)
//!                 points at the parent entity
//!
//! TreeNode ← output, one per bundle + visible entity
//!     └── parent: "#" (bundle node) | BundleId | EntityId
//! ```
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`Bundle`]        | Bundle definition (id + label + tags)        |
//! | [`FieldDefinition`] | One field slot, base or custom             |
//! | [`Entity`]        | Flat record with translations and values     |
//! | [`ValueMap`]      | Typed field name → values map                |
//! | [`TreeNode`]      | Assembled tree node                          |
//! | [`WidgetNode`]    | Node shape consumed by the tree widget       |
//! | [`Account`]       | Who the tree is built for                    |
//! |-------------------|----------------------------------------------|

pub mod account;
pub mod bundle;
pub mod entity;
pub mod ids;
pub mod node;

// Re-export primary types at crate root for convenience.
pub use account::Account;
pub use bundle::{Bundle, FieldDefinition, FieldKind};
pub use entity::{Entity, FieldValues, PropertyRecord, TARGET_ID, Translation, ValueMap};
pub use ids::{BundleId, CacheTag, EntityId, FieldName, LangCode};
pub use node::{
    NodeData, NodeId, NodeState, ParentRef, ROOT_MARKER, TreeNode, WidgetNode, to_widget_nodes,
};
