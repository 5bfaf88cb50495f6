//! # Domain Module
//!
//! Configuration, errors, wire messages and per-connection state for the pool.

pub mod config;
pub mod connection;
pub mod error;
pub mod messages;

pub use config::*;
pub use connection::*;
pub use error::*;
pub use messages::*;
