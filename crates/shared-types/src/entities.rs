//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Chain**: `TxId`, `OutPoint`
//! - **Announcements**: `CandidateOutput`, `RegistryMetadata`
//! - **Results**: `ResolvedRegistry`

use crate::errors::TypeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// A 32-byte content hash.
pub type Hash = [u8; 32];

/// Milliseconds since the Unix epoch.
pub type UnixMillis = u64;

/// Current wall-clock time in Unix milliseconds.
pub fn now_millis() -> UnixMillis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// Transaction identifier in RPC (display) byte order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TxId(pub Hash);

impl TxId {
    /// Raw bytes in display order.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Abbreviated form for log lines.
    pub fn short(&self) -> String {
        let full = self.to_hex();
        format!("{}..{}", &full[..8], &full[56..])
    }
}

impl FromStr for TxId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 {
            return Err(TypeError::InvalidTxIdLength(s.len()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(TxId(bytes))
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.to_hex())
    }
}

impl Serialize for TxId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A reference to one output of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    /// Transaction holding the output.
    pub txid: TxId,
    /// Output index within that transaction.
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: TxId, vout: u32) -> Self {
        Self { txid, vout }
    }

    /// The authchain identity output (index 0) of `txid`.
    pub fn identity(txid: TxId) -> Self {
        Self { txid, vout: 0 }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

// =============================================================================
// CLUSTER B: ANNOUNCEMENTS
// =============================================================================

/// One announcement output as reported by the candidate data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateOutput {
    /// Announcement transaction.
    pub txid: TxId,
    /// Index of the announcement output.
    pub output_index: u32,
    /// Raw locking script of the announcement output.
    #[serde(with = "hex_bytes")]
    pub locking_script: Vec<u8>,
    /// Height of the including block, if confirmed.
    #[serde(default)]
    pub block_height: Option<u64>,
    /// Whether the announcement occupies output 0 of its transaction.
    #[serde(default)]
    pub is_first_output_in_tx: bool,
}

impl CandidateOutput {
    /// The authbase of this candidate's authchain.
    pub fn authbase(&self) -> TxId {
        self.txid
    }

    /// An announcement placed at output 0 destroys the identity output.
    pub fn is_burned(&self) -> bool {
        self.output_index == 0
    }
}

/// Registry content hash and locations extracted from a locking script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryMetadata {
    /// SHA-256 of the registry document.
    #[serde(with = "hex_hash")]
    pub hash: Hash,
    /// Locations the document can be fetched from.
    pub uris: Vec<String>,
}

// =============================================================================
// CLUSTER C: RESULTS
// =============================================================================

/// Final state of one registry announcement after authchain resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRegistry {
    pub authbase: TxId,
    pub authhead: TxId,
    pub block_height: Option<u64>,
    #[serde(with = "hex_hash")]
    pub content_hash: Hash,
    pub uris: Vec<String>,
    pub is_burned: bool,
    pub is_valid: bool,
    pub authchain_length: u32,
    pub is_authhead_unspent: bool,
}

impl ResolvedRegistry {
    /// Build the record for `candidate` from its parsed metadata and the
    /// resolved chain tip.
    pub fn new(
        candidate: &CandidateOutput,
        metadata: RegistryMetadata,
        authhead: TxId,
        authchain_length: u32,
        is_authhead_unspent: bool,
    ) -> Self {
        let is_valid = !metadata.uris.is_empty();
        Self {
            authbase: candidate.authbase(),
            authhead,
            block_height: candidate.block_height,
            content_hash: metadata.hash,
            uris: metadata.uris,
            is_burned: candidate.is_burned(),
            is_valid,
            authchain_length,
            is_authhead_unspent,
        }
    }
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

/// Serialize a byte vector as a hex string.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

/// Serialize a 32-byte hash as a hex string.
pub mod hex_hash {
    use super::Hash;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let s = String::deserialize(deserializer)?;
        let mut out = [0u8; 32];
        hex::decode_to_slice(&s, &mut out).map_err(serde::de::Error::custom)?;
        Ok(out)
    }
}
