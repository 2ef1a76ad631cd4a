//! Output node shapes for the tree widget.
//!
//! A tree is an ordered `Vec<TreeNode>`. The first node is the bundle root
//! (`parent = "#"`); every other node hangs off the bundle id or another
//! entity id in the same list. On the wire bundle ids are strings and entity
//! ids are integers, which is what the widget expects.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ids::{BundleId, EntityId};

/// Wire marker for "this node is the root".
pub const ROOT_MARKER: &str = "#";

/// Identifier of a node in the tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Entity(EntityId),
    Bundle(BundleId),
}

impl NodeId {
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            NodeId::Entity(id) => Some(*id),
            NodeId::Bundle(_) => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Entity(id) => write!(f, "{id}"),
            NodeId::Bundle(id) => write!(f, "{id}"),
        }
    }
}

impl From<EntityId> for NodeId {
    fn from(id: EntityId) -> Self {
        NodeId::Entity(id)
    }
}

impl From<BundleId> for NodeId {
    fn from(id: BundleId) -> Self {
        NodeId::Bundle(id)
    }
}

/// Where a node hangs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// Top of the tree. Only the bundle node uses this.
    Root,
    Node(NodeId),
}

impl ParentRef {
    pub fn entity(id: EntityId) -> Self {
        ParentRef::Node(NodeId::Entity(id))
    }

    pub fn bundle(id: BundleId) -> Self {
        ParentRef::Node(NodeId::Bundle(id))
    }

    pub fn is_root(&self) -> bool {
        matches!(self, ParentRef::Root)
    }

    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            ParentRef::Node(id) => id.as_entity(),
            ParentRef::Root => None,
        }
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentRef::Root => f.write_str(ROOT_MARKER),
            ParentRef::Node(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for ParentRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParentRef::Root => serializer.serialize_str(ROOT_MARKER),
            ParentRef::Node(id) => id.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ParentRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match NodeId::deserialize(deserializer)? {
            NodeId::Bundle(id) if id == ROOT_MARKER => Ok(ParentRef::Root),
            id => Ok(ParentRef::Node(id)),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One node of an assembled tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub parent: ParentRef,
    pub text: String,
    #[serde(rename = "isBundle", default, skip_serializing_if = "is_false")]
    pub is_bundle: bool,
}

impl TreeNode {
    /// The bundle root node.
    pub fn bundle(id: BundleId, label: impl Into<String>) -> Self {
        Self {
            id: NodeId::Bundle(id),
            parent: ParentRef::Root,
            text: label.into(),
            is_bundle: true,
        }
    }

    pub fn entity(id: EntityId, parent: ParentRef, text: impl Into<String>) -> Self {
        Self {
            id: NodeId::Entity(id),
            parent,
            text: text.into(),
            is_bundle: false,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.id
    }

    /// Convert to the widget shape.
    ///
    /// Selection compares ids by their textual form, so a selection of
    /// `"3"` marks entity `3`.
    pub fn to_widget(&self, selected: &[NodeId]) -> WidgetNode {
        let own = self.id.to_string();
        let is_selected = selected.iter().any(|s| s.to_string() == own);
        WidgetNode {
            id: self.id.clone(),
            parent: self.parent.clone(),
            text: self.text.clone(),
            state: NodeState {
                selected: is_selected,
            },
            data: self.is_bundle.then_some(NodeData { is_bundle: true }),
        }
    }
}

/// Widget-facing node state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    pub selected: bool,
}

/// Extra widget payload, only present on the bundle node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(rename = "isBundle")]
    pub is_bundle: bool,
}

/// A node ready for the tree widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetNode {
    pub id: NodeId,
    pub parent: ParentRef,
    pub text: String,
    pub state: NodeState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
}

/// Convert a whole tree to widget nodes.
pub fn to_widget_nodes(tree: &[TreeNode], selected: &[NodeId]) -> Vec<WidgetNode> {
    tree.iter().map(|n| n.to_widget(selected)).collect()
}

// ============================================================================
// Tests
// ============================================================================
