//! # Spend Query Errors

use ac_01_rpc_pool::PoolError;
use shared_types::TxId;
use thiserror::Error;

/// Why a spend check could not complete.
///
/// Never escapes `SpendChecker::check_spend`; it is folded into
/// `SpendStatus::Unknown` there.
#[derive(Debug, Clone, Error)]
pub enum SpendQueryError {
    /// The backend call itself failed
    #[error("{method} failed: {source}")]
    Backend {
        method: &'static str,
        #[source]
        source: PoolError,
    },

    /// The backend answered with an unexpected shape
    #[error("malformed {method} response: {reason}")]
    Malformed {
        method: &'static str,
        reason: String,
    },

    /// Transaction has no output with that index
    #[error("transaction {txid} has no output {vout}")]
    MissingOutput { txid: TxId, vout: u32 },
}
