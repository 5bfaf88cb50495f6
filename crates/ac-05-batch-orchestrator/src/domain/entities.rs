//! Run inputs, statistics and report.

use ac_03_authchain_cache::AuthchainCache;
use ac_04_authchain_resolver::{Resolution, ResolutionOutcome};
use serde::Serialize;
use shared_types::{CandidateOutput, RegistryMetadata, ResolvedRegistry};

/// A candidate output together with its parsed registry metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub candidate: CandidateOutput,
    pub metadata: RegistryMetadata,
}

impl Announcement {
    pub fn new(candidate: CandidateOutput, metadata: RegistryMetadata) -> Self {
        Self {
            candidate,
            metadata,
        }
    }
}

/// Aggregate statistics for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub candidates: u64,
    pub perfect: u64,
    pub good: u64,
    pub partial: u64,
    pub miss: u64,
    /// Spend queries issued.
    pub queries: u64,
    /// Sum of resolved chain lengths; a cold walk costs one query per link.
    pub chain_length_total: u64,
    /// Resolutions cut short by a failed spend check or the hop limit.
    pub unconfirmed: u64,
    /// Unconfirmed resolutions that started from a cache entry.
    pub unconfirmed_hits: u64,
    /// Registries whose authhead is unspent.
    pub active: u64,
    pub elapsed_ms: u64,
}

impl RunStats {
    pub fn record(&mut self, resolution: &Resolution) {
        self.candidates += 1;
        match resolution.outcome {
            ResolutionOutcome::Perfect => self.perfect += 1,
            ResolutionOutcome::Good => self.good += 1,
            ResolutionOutcome::Partial => self.partial += 1,
            ResolutionOutcome::Miss => self.miss += 1,
        }
        self.queries += u64::from(resolution.queries_used);
        self.chain_length_total += u64::from(resolution.entry.chain_length);
        if !resolution.confirmed {
            self.unconfirmed += 1;
            if resolution.outcome.is_hit() {
                self.unconfirmed_hits += 1;
            }
        }
        if resolution.entry.is_active {
            self.active += 1;
        }
    }

    /// Share of candidates served at least partly from cache. Unconfirmed
    /// resolutions never count as hits.
    pub fn hit_rate(&self) -> f64 {
        if self.candidates == 0 {
            return 0.0;
        }
        let hits = (self.perfect + self.good + self.partial).saturating_sub(self.unconfirmed_hits);
        hits as f64 / self.candidates as f64
    }

    /// Queries saved against resolving everything cold.
    pub fn queries_avoided(&self) -> u64 {
        self.chain_length_total.saturating_sub(self.queries)
    }

    pub fn count(&self, outcome: ResolutionOutcome) -> u64 {
        match outcome {
            ResolutionOutcome::Perfect => self.perfect,
            ResolutionOutcome::Good => self.good,
            ResolutionOutcome::Partial => self.partial,
            ResolutionOutcome::Miss => self.miss,
        }
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One record per announcement, in input order.
    pub registries: Vec<ResolvedRegistry>,
    /// Freshly built cache, ready to persist.
    pub cache: AuthchainCache,
    pub stats: RunStats,
}
