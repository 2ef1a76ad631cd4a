//! # arbor-core
//!
//! Turns the flat entities of one bundle into a parent/child tree for a
//! tree widget, and caches the result per bundle and language.
//!
//! The builder never owns storage. Everything it reads comes through
//! capability traits handed in at construction:
//!
//! | Trait | Answers |
//! |-------|---------|
//! | [`EntityStore`] | entities of a bundle, per-entity view access |
//! | [`SchemaRegistry`] | field definitions of a bundle |
//! | [`BundleRegistry`] | bundle labels and tags |
//! | [`CacheBackend`] | keyed, tagged, expiring entries |
//! | [`LanguageProvider`] / [`AccountProvider`] / [`Clock`] | request context |
//!
//! [`MemoryStore`] and [`MemoryCache`] implement the storage side in memory.

pub mod access;
pub mod assembler;
pub mod builder;
pub mod cache;
pub mod config;
pub mod env;
pub mod error;
pub mod memory;
pub mod parent;
pub mod repair;
pub mod schema;
pub mod store;

pub use access::AccessGuard;
pub use assembler::{Assembled, TreeAssembler};
pub use builder::{TreeBuilder, TreeDeps};
pub use cache::{CacheBackend, CacheEntry, CacheError, CacheResult, MemoryCache, cache_key};
pub use config::{ConfigError, TreeConfig};
pub use env::{
    AccountProvider, Clock, FixedAccount, FixedLanguage, LanguageProvider, ManualClock,
    SystemClock,
};
pub use error::{TreeError, TreeResult};
pub use memory::{BundleFixture, EntityRef, Fixture, MemoryStore};
pub use parent::{FirstReferenceResolver, NamedFieldResolver, ParentFieldResolver};
pub use schema::SchemaResolver;
pub use store::{BundleRegistry, EntityStore, SchemaRegistry, StoreError, StoreResult};
