//! # AC-04 Authchain Resolver
//!
//! Finds the current authhead of an authchain, reusing whatever the cache
//! already knows.
//!
//! **Subsystem ID:** 04
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Decision Tree
//!
//! ```text
//!                       cached entry?
//!                 ┌──────────┴───────────┐
//!                no                     yes
//!                 │              ┌───────┴────────┐
//!            full walk       inactive           active
//!             (miss)        (perfect, 0)     probe authhead:0
//!                                         ┌───────┴────────┐
//!                                      unspent           spent by S
//!                                     (good, 1)     resume walk from S
//!                                                  length = cached + 1
//!                                                     (partial)
//! ```
//!
//! ## Walk
//!
//! Query `current:0`; unspent ends the chain at `current`, spent by `S`
//! moves to `S`. At most `max_hops` queries per walk; running out marks
//! the chain inactive. A spend check that comes back unknown stops the walk
//! where it is and marks the chain inactive and the result unconfirmed, so
//! a fault can never report a superseded registry as active.
//!
//! ## Module Structure
//!
//! ```text
//! ac-04-authchain-resolver/
//! ├── domain/          # ResolverConfig, ResolutionOutcome, Resolution
//! ├── ports/           # SpendChecker (outbound) + mock ledger
//! └── application/     # AuthchainResolver
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::AuthchainResolver;
pub use domain::{Resolution, ResolutionOutcome, ResolverConfig, ResolverError, DEFAULT_MAX_HOPS};
pub use ports::{MockSpendChecker, SpendChecker};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
