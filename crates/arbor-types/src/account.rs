//! The account a tree is built for.
//!
//! Only what the tree builder needs: a name for log lines and a permission
//! set for the coarse bundle-level gate. Per-entity visibility is the entity
//! store's business.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Login name, e.g. "amy" or "anonymous".
    pub name: String,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: BTreeSet::new(),
        }
    }

    /// The unauthenticated visitor, holding no permissions.
    pub fn anonymous() -> Self {
        Self::new("anonymous")
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
