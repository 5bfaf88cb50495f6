//! # Algorithms
//!
//! Pure helpers for the spend check.

use crate::domain::HistoryEntry;
use sha2::{Digest, Sha256};
use shared_types::TxId;

/// Backend index key for a locking script: SHA-256, byte-reversed, hex.
pub fn script_hash(script: &[u8]) -> String {
    let mut digest: [u8; 32] = Sha256::digest(script).into();
    digest.reverse();
    hex::encode(digest)
}

/// History entries strictly after `txid`, or `None` if `txid` is not in the
/// history at all.
pub fn entries_after<'a>(history: &'a [HistoryEntry], txid: &TxId) -> Option<&'a [HistoryEntry]> {
    history
        .iter()
        .position(|entry| &entry.tx_hash == txid)
        .map(|index| &history[index + 1..])
}
