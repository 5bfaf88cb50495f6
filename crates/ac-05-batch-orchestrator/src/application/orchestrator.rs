//! # Batch Orchestrator

use crate::domain::{Announcement, OrchestratorConfig, RunReport, RunStats};
use ac_03_authchain_cache::AuthchainCache;
use ac_04_authchain_resolver::{AuthchainResolver, SpendChecker};
use futures::future::join_all;
use shared_types::ResolvedRegistry;
use std::time::Instant;
use tracing::{info, warn};

/// Runs the resolver over every announcement with bounded concurrency.
pub struct BatchOrchestrator<S: SpendChecker> {
    resolver: AuthchainResolver<S>,
    config: OrchestratorConfig,
}

impl<S: SpendChecker> BatchOrchestrator<S> {
    pub fn new(resolver: AuthchainResolver<S>, config: OrchestratorConfig) -> Self {
        Self { resolver, config }
    }

    pub fn resolver(&self) -> &AuthchainResolver<S> {
        &self.resolver
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Resolve every announcement against `old_cache`.
    ///
    /// Confirmed resolutions go into the new cache. An unconfirmed one keeps
    /// the old entry if there was one, so a transient fault never overwrites
    /// known state and a chain first seen during a fault is retried cold
    /// next run.
    pub async fn run(&self, announcements: &[Announcement], old_cache: &AuthchainCache) -> RunReport {
        let started = Instant::now();
        let concurrency = self.config.effective_concurrency();
        let total = announcements.len();

        info!(
            candidates = total,
            cached = old_cache.len(),
            concurrency,
            "[ac-05] Starting resolution run"
        );

        let mut cache = AuthchainCache::new();
        let mut registries = Vec::with_capacity(total);
        let mut stats = RunStats::default();
        let mut processed = 0usize;
        let mut next_progress = self.config.progress_interval;

        for batch in announcements.chunks(concurrency) {
            let resolutions = join_all(batch.iter().map(|announcement| {
                let authbase = announcement.candidate.authbase();
                self.resolver.resolve(authbase, old_cache.get(&authbase))
            }))
            .await;

            for (announcement, resolution) in batch.iter().zip(resolutions) {
                stats.record(&resolution);

                let entry = &resolution.entry;
                registries.push(ResolvedRegistry::new(
                    &announcement.candidate,
                    announcement.metadata.clone(),
                    entry.authhead,
                    entry.chain_length,
                    entry.is_active,
                ));

                if resolution.confirmed {
                    cache.insert(resolution.entry);
                } else if let Some(previous) = old_cache.get(&entry.authbase) {
                    warn!(
                        authbase = %entry.authbase.short(),
                        "[ac-05] Unconfirmed resolution, keeping previous cache entry"
                    );
                    cache.insert(previous.clone());
                }
            }

            processed += batch.len();
            if self.config.progress_interval > 0 && processed >= next_progress {
                info!(
                    processed,
                    total,
                    queries = stats.queries,
                    perfect = stats.perfect,
                    good = stats.good,
                    partial = stats.partial,
                    miss = stats.miss,
                    "[ac-05] Progress"
                );
                while next_progress <= processed {
                    next_progress += self.config.progress_interval;
                }
            }
        }

        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            candidates = stats.candidates,
            hit_rate = %format!("{:.1}%", stats.hit_rate() * 100.0),
            queries = stats.queries,
            queries_avoided = stats.queries_avoided(),
            unconfirmed = stats.unconfirmed,
            active = stats.active,
            elapsed_ms = stats.elapsed_ms,
            "[ac-05] Resolution run complete"
        );

        RunReport {
            registries,
            cache,
            stats,
        }
    }
}
