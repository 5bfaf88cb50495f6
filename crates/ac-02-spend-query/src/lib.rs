//! # AC-02 Spend Query
//!
//! Answers "is this output spent, and by which transaction" against an
//! Electrum-cash style backend.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Algorithm
//!
//! ```text
//! check_spend(txid:n)
//!   1. blockchain.transaction.get [txid, true]     → vout[n].scriptPubKey.hex
//!   2. script hash = reverse(sha256(script))        (backend index key)
//!   3. blockchain.scripthash.get_history [hash]     → [{tx_hash, height}]
//!   4. locate txid in history                       (absent ⇒ Unspent)
//!   5. for each later entry: fetch, scan vin for txid:n
//! ```
//!
//! Step 5 may fetch one transaction per history entry and dominates the cost
//! of a resolution run.
//!
//! ## Failure Model
//!
//! `check_spend` never fails. Transport and decoding faults come back as
//! `SpendStatus::Unknown` so callers can tell "confirmed unspent" apart from
//! "could not tell".
//!
//! ## Module Structure
//!
//! ```text
//! ac-02-spend-query/
//! ├── domain/          # SpendStatus, typed backend responses, errors
//! ├── algorithms/      # script hash derivation, history scan
//! ├── ports/
//! │   ├── inbound.rs   # SpendChecker
//! │   └── outbound.rs  # ElectrumBackend (+ in-memory mock)
//! ├── adapters/        # PooledElectrumBackend over ac-01
//! └── application/     # SpendQueryService
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::PooledElectrumBackend;
pub use algorithms::script_hash;
pub use application::SpendQueryService;
pub use domain::{HistoryEntry, SpendQueryError, SpendStatus, VerboseTransaction};
pub use ports::{ElectrumBackend, MockElectrumBackend, SpendChecker};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
