//! # Adapters
//!
//! `ElectrumBackend` over the shared connection pool.

use crate::domain::{methods, HistoryEntry, SpendQueryError, VerboseTransaction};
use crate::ports::ElectrumBackend;
use ac_01_rpc_pool::RpcCaller;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared_types::TxId;

/// Electrum backend reached through any `RpcCaller` (normally the pool).
pub struct PooledElectrumBackend<C: RpcCaller> {
    caller: C,
}

impl<C: RpcCaller> PooledElectrumBackend<C> {
    pub fn new(caller: C) -> Self {
        Self { caller }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, SpendQueryError> {
        let value = self
            .caller
            .call(method, params)
            .await
            .map_err(|source| SpendQueryError::Backend { method, source })?;
        serde_json::from_value(value).map_err(|e| SpendQueryError::Malformed {
            method,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl<C: RpcCaller> ElectrumBackend for PooledElectrumBackend<C> {
    async fn get_transaction(&self, txid: &TxId) -> Result<VerboseTransaction, SpendQueryError> {
        self.request(methods::TRANSACTION_GET, json!([txid.to_hex(), true]))
            .await
    }

    async fn get_history(&self, script_hash: &str) -> Result<Vec<HistoryEntry>, SpendQueryError> {
        self.request(methods::SCRIPTHASH_GET_HISTORY, json!([script_hash]))
            .await
    }
}
