//! Request-environment capabilities: who is asking, in which language, and when.
//!
//! These were ambient framework singletons in older integrations. Here each is
//! a trait object handed to the builder at construction, with a simple
//! implementation for embedding and tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use arbor_types::{Account, LangCode};
use parking_lot::RwLock;

/// Resolves the language of the current request.
pub trait LanguageProvider: Send + Sync {
    fn current_language(&self) -> LangCode;
}

/// Resolves the account of the current request.
pub trait AccountProvider: Send + Sync {
    fn current_account(&self) -> Account;
}

/// Wall clock in Unix milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// The system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(now_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(now_millis),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, now_millis: u64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// A language that stays put until switched.
#[derive(Debug)]
pub struct FixedLanguage {
    lang: RwLock<LangCode>,
}

impl FixedLanguage {
    pub fn new(lang: impl Into<LangCode>) -> Self {
        Self {
            lang: RwLock::new(lang.into()),
        }
    }

    pub fn switch(&self, lang: impl Into<LangCode>) {
        *self.lang.write() = lang.into();
    }
}

impl LanguageProvider for FixedLanguage {
    fn current_language(&self) -> LangCode {
        self.lang.read().clone()
    }
}

/// An account that stays logged in until switched.
#[derive(Debug)]
pub struct FixedAccount {
    account: RwLock<Account>,
}

impl FixedAccount {
    pub fn new(account: Account) -> Self {
        Self {
            account: RwLock::new(account),
        }
    }

    pub fn switch(&self, account: Account) {
        *self.account.write() = account;
    }
}

impl AccountProvider for FixedAccount {
    fn current_account(&self) -> Account {
        self.account.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.now_millis(), 3_000);
        clock.set(10);
        assert_eq!(clock.now_millis(), 10);
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        assert!(SystemClock.now_millis() > 0);
    }

    #[test]
    fn test_fixed_language_switch() {
        let lang = FixedLanguage::new("en");
        assert_eq!(lang.current_language(), "en");
        lang.switch("de");
        assert_eq!(lang.current_language(), "de");
    }
}
