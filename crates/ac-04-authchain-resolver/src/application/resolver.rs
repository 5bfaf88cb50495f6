//! # Authchain Resolver
//!
//! Cache-aware authchain resolution over a `SpendChecker`.

use crate::domain::{Resolution, ResolutionOutcome, ResolverConfig, ResolverError};
use crate::ports::{SpendChecker, SpendStatus};
use ac_03_authchain_cache::AuthchainCacheEntry;
use shared_types::{OutPoint, TxId};
use tracing::{debug, warn};

/// Why a walk stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
enum WalkEnd {
    /// Found an unspent identity output.
    Tip,
    /// Spend status could not be determined.
    Fault(String),
    /// Ran out of hops before finding the tip.
    HopLimit,
}

#[derive(Debug)]
struct Walk {
    authhead: TxId,
    length: u32,
    queries: u32,
    end: WalkEnd,
}

impl Walk {
    fn into_entry(self, authbase: TxId) -> (AuthchainCacheEntry, u32, bool) {
        // Only a reached tip is an observed state; faults and the hop limit
        // leave the chain undetermined.
        let is_active = self.end == WalkEnd::Tip;
        let confirmed = is_active;
        (
            AuthchainCacheEntry::new(authbase, self.authhead, self.length, is_active),
            self.queries,
            confirmed,
        )
    }
}

/// Resolves authchains against a spend checker.
pub struct AuthchainResolver<S: SpendChecker> {
    checker: S,
    config: ResolverConfig,
}

impl<S: SpendChecker> AuthchainResolver<S> {
    pub fn new(checker: S, config: ResolverConfig) -> Result<Self, ResolverError> {
        config.validate()?;
        Ok(Self { checker, config })
    }

    pub fn checker(&self) -> &S {
        &self.checker
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the authchain rooted at `authbase`.
    ///
    /// `cached` must be the cache entry for the same authbase, if any.
    pub async fn resolve(
        &self,
        authbase: TxId,
        cached: Option<&AuthchainCacheEntry>,
    ) -> Resolution {
        let Some(cached) = cached else {
            let (entry, queries_used, confirmed) = self.walk(authbase, 1).await.into_entry(authbase);
            return Resolution {
                entry,
                queries_used,
                outcome: ResolutionOutcome::Miss,
                confirmed,
            };
        };

        if !cached.is_active {
            return Resolution {
                entry: cached.clone(),
                queries_used: 0,
                outcome: ResolutionOutcome::Perfect,
                confirmed: true,
            };
        }

        match self.checker.check_spend(OutPoint::identity(cached.authhead)).await {
            SpendStatus::Unspent => Resolution {
                entry: cached.refreshed(),
                queries_used: 1,
                outcome: ResolutionOutcome::Good,
                confirmed: true,
            },
            SpendStatus::Spent(next) => {
                debug!(
                    authbase = %authbase.short(),
                    old_authhead = %cached.authhead.short(),
                    "[ac-04] Cached authhead spent, resuming walk"
                );
                let start_length = cached.chain_length.saturating_add(1);
                let (entry, walk_queries, confirmed) =
                    self.walk(next, start_length).await.into_entry(authbase);
                Resolution {
                    entry,
                    queries_used: walk_queries.saturating_add(1),
                    outcome: ResolutionOutcome::Partial,
                    confirmed,
                }
            }
            SpendStatus::Unknown(reason) => {
                warn!(
                    authbase = %authbase.short(),
                    authhead = %cached.authhead.short(),
                    %reason,
                    "[ac-04] Probe failed, reporting chain inactive"
                );
                Resolution {
                    entry: cached.deactivated().refreshed(),
                    queries_used: 1,
                    outcome: ResolutionOutcome::Partial,
                    confirmed: false,
                }
            }
        }
    }

    /// Follow identity-output spends from `start`, whose chain position is
    /// `start_length`.
    async fn walk(&self, start: TxId, start_length: u32) -> Walk {
        let mut current = start;
        let mut length = start_length;
        let mut queries = 0u32;

        while queries < self.config.max_hops {
            queries += 1;
            match self.checker.check_spend(OutPoint::identity(current)).await {
                SpendStatus::Unspent => {
                    return Walk {
                        authhead: current,
                        length,
                        queries,
                        end: WalkEnd::Tip,
                    };
                }
                SpendStatus::Spent(next) => {
                    current = next;
                    length = length.saturating_add(1);
                }
                SpendStatus::Unknown(reason) => {
                    warn!(
                        txid = %current.short(),
                        length,
                        %reason,
                        "[ac-04] Spend check failed mid-walk, stopping"
                    );
                    return Walk {
                        authhead: current,
                        length,
                        queries,
                        end: WalkEnd::Fault(reason),
                    };
                }
            }
        }

        warn!(
            start = %start.short(),
            reached = %current.short(),
            max_hops = self.config.max_hops,
            "[ac-04] Hop limit reached, reporting chain inactive"
        );
        Walk {
            authhead: current,
            length,
            queries,
            end: WalkEnd::HopLimit,
        }
    }
}
