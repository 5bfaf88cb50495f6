//! # Ports
//!
//! What downstream subsystems depend on instead of the concrete pool.

use crate::domain::PoolError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Issues one JSON-RPC call and waits for its result.
#[async_trait]
pub trait RpcCaller: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> Result<Value, PoolError>;
}

#[async_trait]
impl<T: RpcCaller + ?Sized> RpcCaller for Arc<T> {
    async fn call(&self, method: &str, params: Value) -> Result<Value, PoolError> {
        (**self).call(method, params).await
    }
}
