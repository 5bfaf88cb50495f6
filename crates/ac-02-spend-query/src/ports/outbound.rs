//! # Outbound Ports
//!
//! The two backend queries a spend check needs.

use crate::algorithms::script_hash;
use crate::domain::{
    methods, HistoryEntry, ScriptPubKey, SpendQueryError, TxInput, TxOutput, VerboseTransaction,
};
use ac_01_rpc_pool::PoolError;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{OutPoint, TxId};
use std::collections::HashMap;

/// Electrum-cash style backend.
#[async_trait]
pub trait ElectrumBackend: Send + Sync {
    /// `blockchain.transaction.get [txid, true]`
    async fn get_transaction(&self, txid: &TxId) -> Result<VerboseTransaction, SpendQueryError>;

    /// `blockchain.scripthash.get_history [script_hash]`
    async fn get_history(&self, script_hash: &str) -> Result<Vec<HistoryEntry>, SpendQueryError>;
}

/// In-memory ledger for testing.
///
/// Transactions are added in chain order; each one is appended to the
/// history of every script it pays to or spends from, which is how the
/// backend indexes them.
#[derive(Default)]
pub struct MockElectrumBackend {
    inner: Mutex<MockLedger>,
}

#[derive(Default)]
struct MockLedger {
    transactions: HashMap<TxId, VerboseTransaction>,
    histories: HashMap<String, Vec<HistoryEntry>>,
    failing: Vec<TxId>,
}

impl MockElectrumBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transaction spending `inputs` and paying to `output_scripts`.
    pub fn add_transaction(&self, txid: TxId, inputs: &[OutPoint], output_scripts: &[Vec<u8>]) {
        let mut ledger = self.inner.lock();
        let tx = VerboseTransaction {
            vin: inputs
                .iter()
                .map(|outpoint| TxInput {
                    txid: Some(outpoint.txid),
                    vout: Some(outpoint.vout),
                })
                .collect(),
            vout: output_scripts
                .iter()
                .enumerate()
                .map(|(n, script)| TxOutput {
                    n: n as u32,
                    script_pub_key: ScriptPubKey {
                        hex: script.clone(),
                    },
                })
                .collect(),
        };

        let mut touched: Vec<String> = output_scripts.iter().map(|s| script_hash(s)).collect();
        for outpoint in inputs {
            let spent_script = ledger
                .transactions
                .get(&outpoint.txid)
                .and_then(|prev| prev.output_script(outpoint.vout))
                .map(script_hash);
            touched.extend(spent_script);
        }
        touched.dedup();

        let height = ledger.transactions.len() as i64 + 1;
        for key in touched {
            let history = ledger.histories.entry(key).or_default();
            if !history.iter().any(|entry| entry.tx_hash == txid) {
                history.push(HistoryEntry {
                    tx_hash: txid,
                    height,
                });
            }
        }
        ledger.transactions.insert(txid, tx);
    }

    /// Make every fetch of `txid` fail with a transport error.
    pub fn fail_transaction(&self, txid: TxId) {
        self.inner.lock().failing.push(txid);
    }
}

#[async_trait]
impl ElectrumBackend for MockElectrumBackend {
    async fn get_transaction(&self, txid: &TxId) -> Result<VerboseTransaction, SpendQueryError> {
        let ledger = self.inner.lock();
        if ledger.failing.contains(txid) {
            return Err(SpendQueryError::Backend {
                method: methods::TRANSACTION_GET,
                source: PoolError::Timeout {
                    method: methods::TRANSACTION_GET.to_string(),
                    timeout_ms: 0,
                },
            });
        }
        ledger
            .transactions
            .get(txid)
            .cloned()
            .ok_or_else(|| SpendQueryError::Malformed {
                method: methods::TRANSACTION_GET,
                reason: format!("no such transaction {txid}"),
            })
    }

    async fn get_history(&self, script_hash: &str) -> Result<Vec<HistoryEntry>, SpendQueryError> {
        Ok(self
            .inner
            .lock()
            .histories
            .get(script_hash)
            .cloned()
            .unwrap_or_default())
    }
}
