//! Runtime error type.

use ac_01_rpc_pool::PoolError;
use ac_03_authchain_cache::CacheError;
use ac_04_authchain_resolver::ResolverError;
use crate::adapters::SourceError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Backend(#[from] PoolError),

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error("candidate source failed: {0}")]
    Source(#[from] SourceError),

    #[error("cache persistence failed: {0}")]
    Cache(#[from] CacheError),

    #[error("cannot write output {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
