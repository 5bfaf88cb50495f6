//! Runtime configuration.
//!
//! One struct per subsystem, assembled by the CLI and validated as a whole
//! before any I/O happens.

use crate::errors::RuntimeError;
use ac_01_rpc_pool::PoolConfig;
use ac_04_authchain_resolver::ResolverConfig;
use ac_05_batch_orchestrator::OrchestratorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the run's candidate announcements come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSourceConfig {
    /// JSON array of candidates on disk.
    File(PathBuf),
    /// Chaingraph GraphQL endpoint.
    Chaingraph { url: String },
}

/// Complete configuration for one resolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub pool: PoolConfig,
    pub resolver: ResolverConfig,
    pub orchestrator: OrchestratorConfig,
    pub source: CandidateSourceConfig,
    /// Authchain cache file, read at start and replaced at the end.
    pub cache_path: PathBuf,
    /// Resolved registry list.
    pub output_path: PathBuf,
}

impl RuntimeConfig {
    pub fn new(pool: PoolConfig, source: CandidateSourceConfig) -> Self {
        Self {
            pool,
            resolver: ResolverConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            source,
            cache_path: PathBuf::from("authchain-cache.json"),
            output_path: PathBuf::from("registries.json"),
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        self.pool.validate()?;
        self.resolver.validate()?;

        match &self.source {
            CandidateSourceConfig::File(path) if path.as_os_str().is_empty() => {
                return Err(RuntimeError::Config("candidate file path is empty".into()));
            }
            CandidateSourceConfig::Chaingraph { url }
                if !(url.starts_with("http://") || url.starts_with("https://")) =>
            {
                return Err(RuntimeError::Config(format!(
                    "chaingraph url must use http:// or https://, got '{url}'"
                )));
            }
            _ => {}
        }

        if self.cache_path == self.output_path {
            return Err(RuntimeError::Config(
                "cache and output must be different files".into(),
            ));
        }
        Ok(())
    }

    /// HTTP timeout for the candidate source, shared with the pool.
    pub fn source_timeout(&self) -> Duration {
        self.pool.request_timeout().max(Duration::from_secs(30))
    }
}
