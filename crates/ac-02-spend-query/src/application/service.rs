//! # Spend Query Service
//!
//! Runs the five-step spend check against an `ElectrumBackend` and folds
//! every failure into `SpendStatus::Unknown`.

use crate::algorithms::{entries_after, script_hash};
use crate::domain::{HistoryEntry, SpendQueryError, SpendStatus, VerboseTransaction};
use crate::ports::{ElectrumBackend, SpendChecker};
use async_trait::async_trait;
use shared_types::{OutPoint, TxId};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Spend checker backed by an Electrum-style backend.
pub struct SpendQueryService<B: ElectrumBackend> {
    backend: B,
    /// Backend calls issued, for diagnostics.
    rpc_calls: AtomicU64,
}

impl<B: ElectrumBackend> SpendQueryService<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            rpc_calls: AtomicU64::new(0),
        }
    }

    /// Backend calls issued so far.
    pub fn rpc_calls(&self) -> u64 {
        self.rpc_calls.load(Ordering::Relaxed)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn fetch_transaction(&self, txid: &TxId) -> Result<VerboseTransaction, SpendQueryError> {
        self.rpc_calls.fetch_add(1, Ordering::Relaxed);
        self.backend.get_transaction(txid).await
    }

    async fn fetch_history(&self, key: &str) -> Result<Vec<HistoryEntry>, SpendQueryError> {
        self.rpc_calls.fetch_add(1, Ordering::Relaxed);
        self.backend.get_history(key).await
    }

    async fn find_spender(&self, outpoint: &OutPoint) -> Result<Option<TxId>, SpendQueryError> {
        let funding = self.fetch_transaction(&outpoint.txid).await?;
        let script = funding
            .output_script(outpoint.vout)
            .ok_or(SpendQueryError::MissingOutput {
                txid: outpoint.txid,
                vout: outpoint.vout,
            })?;

        let history = self.fetch_history(&script_hash(script)).await?;
        let Some(later) = entries_after(&history, &outpoint.txid) else {
            debug!(outpoint = %outpoint, "[ac-02] Output not in script history yet, treating as unspent");
            return Ok(None);
        };

        for entry in later {
            let candidate = self.fetch_transaction(&entry.tx_hash).await?;
            if candidate.spends(outpoint) {
                return Ok(Some(entry.tx_hash));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<B: ElectrumBackend> SpendChecker for SpendQueryService<B> {
    async fn check_spend(&self, outpoint: OutPoint) -> SpendStatus {
        match self.find_spender(&outpoint).await {
            Ok(Some(spender)) => {
                debug!(outpoint = %outpoint, spender = %spender.short(), "[ac-02] Output spent");
                SpendStatus::Spent(spender)
            }
            Ok(None) => SpendStatus::Unspent,
            Err(e) => {
                warn!(outpoint = %outpoint, error = %e, "[ac-02] Spend check failed");
                SpendStatus::Unknown(e.to_string())
            }
        }
    }
}
