//! # Ports
//!
//! Where a cache snapshot is kept between runs.

use crate::domain::{AuthchainCache, CacheError};

/// Persistent home of the authchain cache.
pub trait CacheStore: Send + Sync {
    /// Load the last saved snapshot. Never fails; damage yields an empty cache.
    fn load(&self) -> AuthchainCache;

    /// Replace the saved snapshot as a whole.
    fn save(&self, cache: &AuthchainCache) -> Result<(), CacheError>;
}
