//! Resolver configuration.

use super::errors::ResolverError;
use serde::{Deserialize, Serialize};

/// Default bound on spend queries per walk.
pub const DEFAULT_MAX_HOPS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Spend queries one walk may issue before giving up. Real authchains
    /// are far shorter; hitting this means malformed or cyclic data.
    pub max_hops: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

impl ResolverConfig {
    pub fn with_max_hops(max_hops: u32) -> Self {
        Self { max_hops }
    }

    pub fn validate(&self) -> Result<(), ResolverError> {
        if self.max_hops == 0 {
            return Err(ResolverError::InvalidConfig(
                "max_hops must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
