//! # Adapters Layer
//!
//! Pending-call correlation and the websocket transport.

pub mod pending;
pub mod websocket;

pub use pending::{CallResult, PendingCallStore, PendingStats};
pub use websocket::{ConnectionHandler, OutboundFrame, WsStream};
