//! Bundle and field-definition types.
//!
//! A `Bundle` is a named schema grouping entities of one kind. Its field
//! definitions come from the schema registry, in declaration order. That
//! order is load-bearing: parent inference scans custom fields in it and the
//! first reference field wins.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::ids::{BundleId, CacheTag, FieldName};

/// A bundle definition. Immutable for the duration of one tree build.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: BundleId,
    /// Display label, used as the text of the tree's root node.
    pub label: String,
    /// Invalidation tags beyond the bundle's own `bundle:{id}` tag.
    #[serde(default)]
    pub tags: Vec<CacheTag>,
}

impl Bundle {
    pub fn new(id: impl Into<BundleId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            tags: Vec::new(),
        }
    }

    /// All invalidation tags for this bundle definition, own tag first.
    pub fn cache_tags(&self) -> Vec<CacheTag> {
        let mut tags = vec![CacheTag::for_bundle(&self.id)];
        tags.extend(self.tags.iter().cloned());
        tags
    }
}

/// Whether a field is system-intrinsic or schema-specific.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum FieldKind {
    /// Present on every entity of the type (id, language, label...).
    Base,
    /// Attached by the bundle's schema.
    #[default]
    Custom,
}

impl FieldKind {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Base => "base",
            FieldKind::Custom => "custom",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attribute slot on a bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: FieldName,
    #[serde(default)]
    pub kind: FieldKind,
}

impl FieldDefinition {
    pub fn base(name: impl Into<FieldName>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Base,
        }
    }

    pub fn custom(name: impl Into<FieldName>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Custom,
        }
    }

    pub fn is_base(&self) -> bool {
        self.kind == FieldKind::Base
    }
}

// ============================================================================
// Tests
// ============================================================================
