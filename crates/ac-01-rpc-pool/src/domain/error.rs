//! Pool error types.
//!
//! `RpcError` carries a JSON-RPC error object returned by the backend;
//! `PoolError` covers everything that can go wrong around it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard JSON-RPC 2.0 error codes
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Error object returned by the backend for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

/// Pool-level errors
#[derive(Debug, Clone, Error)]
pub enum PoolError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// No connection could be opened at startup
    #[error("backend unreachable at {url}: {reason}")]
    BackendUnreachable { url: String, reason: String },

    /// Call did not complete in time
    #[error("request timeout: {method} after {timeout_ms}ms")]
    Timeout { method: String, timeout_ms: u64 },

    /// Backend answered with an error object
    #[error("RPC error {0}")]
    Rpc(RpcError),

    /// Request could not be encoded
    #[error("encode error: {0}")]
    Encode(String),

    /// Pool closed while the call was pending
    #[error("connection pool closed")]
    Closed,
}

impl PoolError {
    /// Transport-level failures, as opposed to an answer from the backend.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PoolError::BackendUnreachable { .. } | PoolError::Timeout { .. } | PoolError::Closed
        )
    }
}
