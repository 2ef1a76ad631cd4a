//! Bundle-level access gate.
//!
//! A cheap early check before any storage is touched. It only asks whether
//! the account holds one coarse permission; per-entity visibility is enforced
//! later by the entity store's own view check.

use arbor_types::Account;

#[derive(Debug, Clone)]
pub struct AccessGuard {
    permission: String,
}

impl AccessGuard {
    pub fn new(permission: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
        }
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub fn has_access(&self, account: &Account) -> bool {
        account.has_permission(&self.permission)
    }
}
