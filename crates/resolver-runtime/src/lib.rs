//! # Resolver Runtime Library
//!
//! Wiring for authchain resolution runs. The `main.rs` binary is a thin
//! shell over [`ResolverRuntime`].
//!
//! ## Data Flow
//!
//! ```text
//! CandidateSource ──► parse_bcmr ──► BatchOrchestrator ──► registries.json
//!                                        │      ▲
//!                                        ▼      │
//!                                 AuthchainResolver ◄── CacheStore (authchain-cache.json)
//!                                        │
//!                                        ▼
//!                               SpendQueryService ──► ConnectionPool ──► Electrum (ws)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! resolver-runtime/
//! ├── adapters/
//! │   ├── bcmr_script.rs  # OP_RETURN BCMR parser
//! │   ├── candidates.rs   # CandidateSource port, file source
//! │   ├── chaingraph.rs   # Chaingraph GraphQL source
//! │   └── output.rs       # Registry list writer
//! ├── cli.rs              # clap arguments
//! ├── config.rs           # RuntimeConfig
//! ├── errors.rs           # RuntimeError
//! └── runtime.rs          # ResolverRuntime
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;

pub use config::{CandidateSourceConfig, RuntimeConfig};
pub use errors::RuntimeError;
pub use runtime::{parse_announcements, ResolverRuntime, RunSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
