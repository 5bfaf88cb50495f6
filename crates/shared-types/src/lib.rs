//! # Shared Types Crate
//!
//! Domain entities shared by every authchain subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: transaction ids, outpoints and registry
//!   records are defined once, here.
//! - **Hex on the wire**: every 32-byte identifier serializes as 64 lowercase
//!   hex characters in RPC byte order, matching what the backend prints.
//! - **Immutable outputs**: a `ResolvedRegistry` is built once per candidate
//!   and never mutated afterwards.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
