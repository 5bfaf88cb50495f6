use crate::domain::{AuthchainCache, CacheError};
use crate::ports::CacheStore;
use parking_lot::RwLock;

/// In-memory cache store for testing.
#[derive(Default)]
pub struct InMemoryCacheStore {
    snapshot: RwLock<Option<AuthchainCache>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `cache`.
    pub fn with_cache(cache: AuthchainCache) -> Self {
        Self {
            snapshot: RwLock::new(Some(cache)),
        }
    }

    /// Whether `save` has ever been called (or the store was seeded).
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.read().is_some()
    }
}

impl CacheStore for InMemoryCacheStore {
    fn load(&self) -> AuthchainCache {
        self.snapshot.read().clone().unwrap_or_default()
    }

    fn save(&self, cache: &AuthchainCache) -> Result<(), CacheError> {
        *self.snapshot.write() = Some(cache.clone());
        Ok(())
    }
}
