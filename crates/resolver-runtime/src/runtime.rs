//! # Resolver Runtime
//!
//! Wires the subsystems together for one run:
//!
//! 1. Fetch candidates and parse their BCMR announcements
//! 2. Load the previous authchain cache
//! 3. Connect the pool (fatal if the backend is unreachable)
//! 4. Resolve every announcement
//! 5. Close the pool, save the cache, write the registry list

use crate::adapters::{
    parse_bcmr, write_registries, CandidateSource, ChaingraphSource, JsonFileSource,
};
use crate::config::{CandidateSourceConfig, RuntimeConfig};
use crate::errors::RuntimeError;
use ac_01_rpc_pool::{ConnectionPool, PoolStats};
use ac_02_spend_query::{PooledElectrumBackend, SpendQueryService};
use ac_03_authchain_cache::{CacheStore, FileCacheStore};
use ac_04_authchain_resolver::AuthchainResolver;
use ac_05_batch_orchestrator::{Announcement, BatchOrchestrator, RunStats};
use serde::Serialize;
use shared_types::{CandidateOutput, ResolvedRegistry};
use tracing::{debug, info};

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Outputs returned by the candidate source.
    pub candidates: usize,
    /// Candidates whose script was not a BCMR announcement.
    pub skipped: usize,
    pub stats: RunStats,
    pub pool: PoolStats,
    pub cache_entries: usize,
    #[serde(skip)]
    pub registries: Vec<ResolvedRegistry>,
}

/// Split candidates into parsed announcements and a count of rejects.
pub fn parse_announcements(candidates: Vec<CandidateOutput>) -> (Vec<Announcement>, usize) {
    let total = candidates.len();
    let announcements: Vec<_> = candidates
        .into_iter()
        .filter_map(|candidate| match parse_bcmr(&candidate.locking_script) {
            Some(metadata) => Some(Announcement::new(candidate, metadata)),
            None => {
                debug!(txid = %candidate.txid.short(), vout = candidate.output_index, "Skipping non-BCMR output");
                None
            }
        })
        .collect();
    let skipped = total - announcements.len();
    (announcements, skipped)
}

/// Runs resolution end to end from a validated configuration.
pub struct ResolverRuntime {
    config: RuntimeConfig,
}

impl ResolverRuntime {
    pub fn new(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Candidate source described by the configuration.
    pub fn candidate_source(&self) -> Result<Box<dyn CandidateSource>, RuntimeError> {
        let source: Box<dyn CandidateSource> = match &self.config.source {
            CandidateSourceConfig::File(path) => Box::new(JsonFileSource::new(path)),
            CandidateSourceConfig::Chaingraph { url } => {
                Box::new(ChaingraphSource::new(url.clone(), self.config.source_timeout())?)
            }
        };
        Ok(source)
    }

    /// Run with the configured candidate source and cache file.
    pub async fn run(&self) -> Result<RunSummary, RuntimeError> {
        let source = self.candidate_source()?;
        let store = FileCacheStore::new(&self.config.cache_path);
        self.run_with(source.as_ref(), &store).await
    }

    /// Run with explicit collaborators.
    ///
    /// Nothing is persisted unless resolution completes; an unreachable
    /// backend leaves both the cache and the output untouched.
    pub async fn run_with(
        &self,
        source: &dyn CandidateSource,
        store: &dyn CacheStore,
    ) -> Result<RunSummary, RuntimeError> {
        info!(source = %source.describe(), "Fetching candidates");
        let candidates = source.fetch_candidates().await?;
        let candidate_count = candidates.len();
        let (announcements, skipped) = parse_announcements(candidates);
        info!(
            candidates = candidate_count,
            announcements = announcements.len(),
            skipped,
            "Parsed BCMR announcements"
        );

        let old_cache = store.load();
        info!(entries = old_cache.len(), active = old_cache.active_count(), "Loaded authchain cache");

        let pool = ConnectionPool::connect(self.config.pool.clone()).await?;

        let spend_query = SpendQueryService::new(PooledElectrumBackend::new(pool.clone()));
        let resolver = AuthchainResolver::new(spend_query, self.config.resolver.clone())?;
        let orchestrator = BatchOrchestrator::new(resolver, self.config.orchestrator.clone());

        let report = orchestrator.run(&announcements, &old_cache).await;
        let rpc_calls = orchestrator.resolver().checker().rpc_calls();
        pool.close();
        let pool_stats = pool.stats();
        info!(
            rpc_calls,
            timeouts = pool_stats.timeouts,
            reconnects = pool_stats.reconnects,
            "Backend session closed"
        );

        store.save(&report.cache)?;
        write_registries(&self.config.output_path, &report.registries)?;

        Ok(RunSummary {
            candidates: candidate_count,
            skipped,
            stats: report.stats,
            pool: pool_stats,
            cache_entries: report.cache.len(),
            registries: report.registries,
        })
    }
}
