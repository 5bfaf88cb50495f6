//! Spend status and the backend response schemas it is derived from.

use serde::{Deserialize, Deserializer};
use shared_types::{OutPoint, TxId};

/// Backend method names.
pub mod methods {
    pub const TRANSACTION_GET: &str = "blockchain.transaction.get";
    pub const SCRIPTHASH_GET_HISTORY: &str = "blockchain.scripthash.get_history";
}

/// Outcome of a spend check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpendStatus {
    /// Consumed by this transaction.
    Spent(TxId),
    /// Confirmed not spent (as far as the backend has indexed).
    Unspent,
    /// The check could not complete.
    Unknown(String),
}

impl SpendStatus {
    /// Spending transaction, if known to be spent.
    pub fn spender(&self) -> Option<TxId> {
        match self {
            SpendStatus::Spent(txid) => Some(*txid),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SpendStatus::Unknown(_))
    }
}

// =============================================================================
// blockchain.transaction.get (verbose)
// =============================================================================

/// Decoded transaction as returned with `verbose = true`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerboseTransaction {
    #[serde(default)]
    pub vin: Vec<TxInput>,
    #[serde(default)]
    pub vout: Vec<TxOutput>,
}

impl VerboseTransaction {
    /// Locking script of output `n`.
    pub fn output_script(&self, n: u32) -> Option<&[u8]> {
        self.vout
            .iter()
            .find(|output| output.n == n)
            .map(|output| output.script_pub_key.hex.as_slice())
    }

    /// Whether any input consumes `outpoint`.
    pub fn spends(&self, outpoint: &OutPoint) -> bool {
        self.vin.iter().any(|input| input.spends(outpoint))
    }
}

/// Transaction input. Coinbase inputs carry no outpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxInput {
    #[serde(default)]
    pub txid: Option<TxId>,
    #[serde(default)]
    pub vout: Option<u32>,
}

impl TxInput {
    pub fn spends(&self, outpoint: &OutPoint) -> bool {
        self.txid == Some(outpoint.txid) && self.vout == Some(outpoint.vout)
    }
}

/// Transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxOutput {
    pub n: u32,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptPubKey {
    #[serde(deserialize_with = "hex_script")]
    pub hex: Vec<u8>,
}

fn hex_script<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    hex::decode(s).map_err(serde::de::Error::custom)
}

// =============================================================================
// blockchain.scripthash.get_history
// =============================================================================

/// One history entry. Height is 0 or negative for mempool transactions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    pub tx_hash: TxId,
    pub height: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn txid(byte: u8) -> TxId {
        TxId([byte; 32])
    }

    #[test]
    fn test_decode_verbose_transaction() {
        let tx: VerboseTransaction = serde_json::from_value(json!({
            "txid": txid(2).to_hex(),
            "vin": [
                {"txid": txid(1).to_hex(), "vout": 0, "sequence": 0},
                {"coinbase": "03abcdef", "sequence": 0}
            ],
            "vout": [
                {"n": 0, "value": 0.00001, "scriptPubKey": {"hex": "76a914", "type": "pubkeyhash"}},
                {"n": 1, "value": 0, "scriptPubKey": {"hex": "6a0442434d52"}}
            ]
        }))
        .unwrap();

        assert_eq!(tx.vin.len(), 2);
        assert!(tx.vin[1].txid.is_none());
        assert_eq!(tx.output_script(0), Some(&[0x76, 0xa9, 0x14][..]));
        assert_eq!(tx.output_script(2), None);
        assert!(tx.spends(&OutPoint::new(txid(1), 0)));
        assert!(!tx.spends(&OutPoint::new(txid(1), 1)));
    }

    #[test]
    fn test_bad_script_hex_is_rejected() {
        let result: Result<VerboseTransaction, _> = serde_json::from_value(json!({
            "vout": [{"n": 0, "scriptPubKey": {"hex": "zz"}}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_history() {
        let history: Vec<HistoryEntry> = serde_json::from_value(json!([
            {"tx_hash": txid(1).to_hex(), "height": 800_000},
            {"tx_hash": txid(2).to_hex(), "height": 0, "fee": 220}
        ]))
        .unwrap();
        assert_eq!(history[1].tx_hash, txid(2));
        assert_eq!(history[1].height, 0);
    }

    #[test]
    fn test_status_helpers() {
        assert_eq!(SpendStatus::Spent(txid(3)).spender(), Some(txid(3)));
        assert_eq!(SpendStatus::Unspent.spender(), None);
        assert!(SpendStatus::Unknown("timeout".into()).is_unknown());
    }
}
