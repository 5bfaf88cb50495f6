//! # AC-01 Connection Pool
//!
//! Persistent websocket connections to a JSON-RPC backend, shared by every
//! concurrent authchain walk.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Purpose
//!
//! Hide connection setup latency and bound fan-out against a rate-limited
//! backend. Each logical call is `{method, params} → result | error`,
//! correlated by a monotonic numeric request id.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! Connecting ──open──→ Idle ──send──→ Busy(request)
//!     ↑                 ↑                  │
//!     │                 └────response──────┘
//!     │
//!  reconnect ←── Closed ←── socket dropped (in-flight request requeued)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! ac-01-rpc-pool/
//! ├── domain/          # PoolConfig, errors, wire messages, connection state
//! ├── adapters/        # pending-call store, websocket io loop
//! ├── ports/           # RpcCaller (what downstream subsystems consume)
//! └── service.rs       # ConnectionPool
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use domain::{
    ConnectionState, PoolConfig, PoolError, PoolSnapshot, RequestId, RpcError,
    DEFAULT_POOL_SIZE, DEFAULT_REQUEST_TIMEOUT_MS,
};
pub use ports::RpcCaller;
pub use service::{ConnectionPool, PoolStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
