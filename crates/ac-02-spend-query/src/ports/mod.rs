//! # Ports Module
//!
//! Inbound spend-check API and the outbound backend it runs against.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
