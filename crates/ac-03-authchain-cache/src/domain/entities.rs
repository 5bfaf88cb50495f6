//! Cache entries and the versioned cache document.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{now_millis, TxId, UnixMillis};
use std::collections::BTreeMap;
use tracing::warn;

/// Only cache file version this build reads or writes.
pub const CACHE_VERSION: u32 = 1;

/// Last known state of one authchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthchainCacheEntry {
    pub authbase: TxId,
    pub authhead: TxId,
    /// Transactions in the chain, authbase included. Always >= 1.
    pub chain_length: u32,
    /// `false` is permanent once recorded.
    pub is_active: bool,
    pub last_checked_timestamp: UnixMillis,
}

impl AuthchainCacheEntry {
    /// Entry checked now.
    pub fn new(authbase: TxId, authhead: TxId, chain_length: u32, is_active: bool) -> Self {
        Self {
            authbase,
            authhead,
            chain_length,
            is_active,
            last_checked_timestamp: now_millis(),
        }
    }

    /// Same chain state, timestamp moved to now.
    pub fn refreshed(&self) -> Self {
        Self {
            last_checked_timestamp: now_millis(),
            ..self.clone()
        }
    }

    /// Same position, marked inactive.
    pub fn deactivated(&self) -> Self {
        Self {
            is_active: false,
            ..self.clone()
        }
    }

    /// Equal ignoring `last_checked_timestamp`.
    pub fn same_chain_state(&self, other: &Self) -> bool {
        self.authbase == other.authbase
            && self.authhead == other.authhead
            && self.chain_length == other.chain_length
            && self.is_active == other.is_active
    }
}

/// The cache document: `{version, entries}` keyed by authbase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthchainCache {
    pub version: u32,
    pub entries: BTreeMap<TxId, AuthchainCacheEntry>,
}

impl Default for AuthchainCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthchainCache {
    pub fn new() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, authbase: &TxId) -> Option<&AuthchainCacheEntry> {
        self.entries.get(authbase)
    }

    /// Insert keyed by the entry's own authbase.
    pub fn insert(&mut self, entry: AuthchainCacheEntry) -> Option<AuthchainCacheEntry> {
        self.entries.insert(entry.authbase, entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_active).count()
    }

    /// Decode a cache document, tolerating every kind of damage.
    ///
    /// Unparseable JSON, a missing or unsupported `version`, or an `entries`
    /// value of the wrong shape all give an empty cache. Individual entries
    /// that break the chain-length invariant or sit under the wrong key are
    /// dropped.
    pub fn from_json_lenient(text: &str) -> Self {
        let document: Value = match serde_json::from_str(text) {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "[ac-03] Cache file is not valid JSON, starting empty");
                return Self::new();
            }
        };

        match document.get("version").and_then(Value::as_u64) {
            Some(version) if version == u64::from(CACHE_VERSION) => {}
            other => {
                warn!(
                    found = ?other,
                    expected = CACHE_VERSION,
                    "[ac-03] Unsupported cache version, starting empty"
                );
                return Self::new();
            }
        }

        let entries: BTreeMap<TxId, AuthchainCacheEntry> = match document
            .get("entries")
            .cloned()
            .map(serde_json::from_value)
        {
            Some(Ok(entries)) => entries,
            Some(Err(e)) => {
                warn!(error = %e, "[ac-03] Malformed cache entries, starting empty");
                return Self::new();
            }
            None => {
                warn!("[ac-03] Cache file has no entries, starting empty");
                return Self::new();
            }
        };

        let mut cache = Self::new();
        for (key, entry) in entries {
            if entry.chain_length == 0 || entry.authbase != key {
                warn!(authbase = %key, "[ac-03] Dropping inconsistent cache entry");
                continue;
            }
            cache.insert(entry);
        }
        cache
    }
}
