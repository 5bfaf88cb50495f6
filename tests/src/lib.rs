//! # Authchain Resolver Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── resolution_benchmarks.rs  # Cold walks vs cached probes
//! └── src/
//!     ├── mock_electrum.rs          # In-process Electrum websocket server
//!     └── integration/              # Full runs through every subsystem
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ac-tests
//! cargo bench -p ac-tests
//! ```

pub mod integration;
pub mod mock_electrum;

pub use mock_electrum::MockElectrumServer;
