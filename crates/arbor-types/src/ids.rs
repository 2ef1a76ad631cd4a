//! Typed identifiers for entities, bundles, fields, languages, and cache tags.
//!
//! Entity ids are unsigned integers assigned by the entity store and unique
//! within one entity type. Everything else is an opaque string: bundle ids are
//! machine names, field names are generated tokens (never human-authored),
//! language codes are whatever the language provider hands out.
//!
//! `EntityId(0)` is never a real entity. Reference fields that point nowhere
//! coerce to it, so it doubles as the "no parent" sentinel in raw data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An entity identifier, unique within one entity type.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether this is the zero sentinel.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Coerce a raw reference value into an entity id.
    ///
    /// Integers are taken as-is, numeric strings are parsed. Everything else
    /// (null, negatives, floats, arbitrary text, containers) yields `None`.
    /// A coerced zero is also `None`.
    pub fn coerce(value: &serde_json::Value) -> Option<Self> {
        let raw = match value {
            serde_json::Value::Number(n) => n.as_u64()?,
            serde_json::Value::String(s) => s.trim().parse::<u64>().ok()?,
            _ => return None,
        };
        (raw != 0).then_some(Self(raw))
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> u64 {
        id.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

/// A bundle identifier (machine name).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleId(String);

/// A field name as generated by the schema registry.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

/// A language code ("en", "de", ...).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LangCode(String);

/// An invalidation label attached to cache entries.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheTag(String);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_string_id {
    ($T:ident, $name:literal) => {
        impl $T {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<&str> for $T {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $T {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $T {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $T {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $T {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", $name, self.0)
            }
        }
    };
}

impl_string_id!(BundleId, "BundleId");
impl_string_id!(FieldName, "FieldName");
impl_string_id!(LangCode, "LangCode");
impl_string_id!(CacheTag, "CacheTag");

impl BundleId {
    /// The "all bundles" selector. Never a real bundle.
    pub const WILDCARD: &'static str = "*";

    pub fn is_wildcard(&self) -> bool {
        self.0 == Self::WILDCARD
    }
}

impl CacheTag {
    /// Tag for one entity: `{entity_type}:{id}`.
    pub fn for_entity(entity_type: &str, id: EntityId) -> Self {
        Self(format!("{entity_type}:{id}"))
    }

    /// Tag invalidated whenever any entity of the type is created or deleted:
    /// `{entity_type}_list`.
    pub fn for_entity_list(entity_type: &str) -> Self {
        Self(format!("{entity_type}_list"))
    }

    /// Tag for a bundle definition: `bundle:{id}`.
    pub fn for_bundle(bundle: &BundleId) -> Self {
        Self(format!("bundle:{bundle}"))
    }
}

// ============================================================================
// Tests
// ============================================================================
