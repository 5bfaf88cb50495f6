//! # AC-05 Batch Orchestrator
//!
//! Drives the authchain resolver over a whole candidate set.
//!
//! **Subsystem ID:** 05
//! **Architecture:** Hexagonal (Domain + Application)
//!
//! ## Run
//!
//! ```text
//! announcements ──chunks(concurrency)──→ batch ──join_all──→ resolutions
//!                                                               │
//!            ┌────────────────── per resolution ────────────────┤
//!            ↓                                                  ↓
//!   new cache (confirmed entry,                        ResolvedRegistry
//!   or old entry carried forward)                      + outcome tallies
//! ```
//!
//! The old cache is only read. The run builds a fresh cache and hands it
//! back; persisting it is the caller's job once the run has completed, so a
//! failed run never touches the file on disk.
//!
//! ## Module Structure
//!
//! ```text
//! ac-05-batch-orchestrator/
//! ├── domain/          # OrchestratorConfig, Announcement, RunStats, RunReport
//! └── application/     # BatchOrchestrator
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod application;
pub mod domain;

// Re-exports
pub use application::BatchOrchestrator;
pub use domain::{
    Announcement, OrchestratorConfig, RunReport, RunStats, DEFAULT_CONCURRENCY, MAX_CONCURRENCY,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
