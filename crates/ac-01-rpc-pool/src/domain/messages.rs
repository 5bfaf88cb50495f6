//! JSON-RPC 2.0 wire messages.

use super::error::{PoolError, RpcError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric id correlating a response with its request.
pub type RequestId = u64;

/// JSON-RPC request frame.
#[derive(Debug, Serialize)]
struct RpcRequestFrame<'a> {
    jsonrpc: &'static str,
    id: RequestId,
    method: &'a str,
    params: &'a Value,
}

/// A logical call waiting in the queue or in flight on a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedRequest {
    pub id: RequestId,
    pub method: String,
    pub params: Value,
}

impl QueuedRequest {
    pub fn new(id: RequestId, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Encode as a JSON-RPC text frame.
    pub fn encode(&self) -> Result<String, PoolError> {
        serde_json::to_string(&RpcRequestFrame {
            jsonrpc: "2.0",
            id: self.id,
            method: &self.method,
            params: &self.params,
        })
        .map_err(|e| PoolError::Encode(e.to_string()))
    }
}

/// JSON-RPC response frame.
///
/// Servers may also push notifications (a `method` with no `id`); those
/// decode with `id: None` and are ignored by the pool.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<RequestId>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    /// Parse one text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Error object wins; a frame with neither field is a null result.
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}
