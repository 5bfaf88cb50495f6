//! # AC-03 Authchain Cache
//!
//! Persistent map from authbase to the last known state of its authchain.
//!
//! **Subsystem ID:** 03
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Staleness Rule
//!
//! | `isActive` | Meaning                              | Re-check cost        |
//! |------------|--------------------------------------|----------------------|
//! | `false`    | authhead spent or walk aborted       | none, permanent      |
//! | `true`     | authhead was unspent when checked    | one liveness probe   |
//!
//! An output spent on an immutable ledger stays spent, so inactive entries
//! never need revisiting.
//!
//! ## Persistence
//!
//! Loading never fails: a missing file, bad JSON or an unknown version all
//! yield an empty cache. Saving replaces the file atomically
//! (temp file, fsync, rename), so the file on disk is always a complete
//! snapshot from some finished run.
//!
//! ## Module Structure
//!
//! ```text
//! ac-03-authchain-cache/
//! ├── domain/          # AuthchainCacheEntry, AuthchainCache, CacheError
//! ├── ports/           # CacheStore
//! └── adapters/        # FileCacheStore, InMemoryCacheStore
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{FileCacheStore, InMemoryCacheStore};
pub use domain::{AuthchainCache, AuthchainCacheEntry, CacheError, CACHE_VERSION};
pub use ports::CacheStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
