//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Default number of candidates resolved concurrently.
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Upper bound on concurrent resolutions.
pub const MAX_CONCURRENCY: usize = 200;

/// Default progress log interval, in candidates.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Candidates per batch. Clamped to 1..=200 when used.
    pub concurrency: usize,
    /// Log progress every this many candidates; 0 disables.
    pub progress_interval: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl OrchestratorConfig {
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self {
            concurrency,
            ..Self::default()
        }
    }

    /// Batch size actually used.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY)
    }
}
