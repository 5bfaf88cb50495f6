//! # Outbound Ports
//!
//! The resolver needs exactly one capability: spend status of an output.

pub use ac_02_spend_query::{SpendChecker, SpendStatus};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{OutPoint, TxId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Ledger of identity-output spends for testing.
///
/// Outputs not recorded as spent are unspent; outputs marked unknown answer
/// `SpendStatus::Unknown` until cleared.
#[derive(Default)]
pub struct MockSpendChecker {
    spends: RwLock<HashMap<TxId, TxId>>,
    unknown: RwLock<HashSet<TxId>>,
    queries: AtomicU64,
}

impl MockSpendChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that output 0 of `txid` is spent by `spender`.
    pub fn spend(&self, txid: TxId, spender: TxId) {
        self.spends.write().insert(txid, spender);
    }

    /// Link consecutive transactions into one authchain.
    pub fn chain(&self, txids: &[TxId]) {
        for pair in txids.windows(2) {
            self.spend(pair[0], pair[1]);
        }
    }

    pub fn mark_unknown(&self, txid: TxId) {
        self.unknown.write().insert(txid);
    }

    pub fn clear_unknown(&self) {
        self.unknown.write().clear();
    }

    /// Spend checks answered so far.
    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SpendChecker for MockSpendChecker {
    async fn check_spend(&self, outpoint: OutPoint) -> SpendStatus {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if self.unknown.read().contains(&outpoint.txid) {
            return SpendStatus::Unknown("injected fault".into());
        }
        if outpoint.vout != 0 {
            return SpendStatus::Unspent;
        }
        match self.spends.read().get(&outpoint.txid) {
            Some(spender) => SpendStatus::Spent(*spender),
            None => SpendStatus::Unspent,
        }
    }
}
