//! # Cache Errors
//!
//! Only saving can fail; loading degrades to an empty cache.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem error while writing the cache
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cache could not be serialized
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
