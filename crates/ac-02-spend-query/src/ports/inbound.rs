//! # Inbound Ports
//!
//! What the authchain resolver consumes.

use crate::domain::SpendStatus;
use async_trait::async_trait;
use shared_types::OutPoint;
use std::sync::Arc;

/// Spend status lookup for a single output.
#[async_trait]
pub trait SpendChecker: Send + Sync {
    /// Never fails; faults surface as `SpendStatus::Unknown`.
    async fn check_spend(&self, outpoint: OutPoint) -> SpendStatus;
}

#[async_trait]
impl<T: SpendChecker + ?Sized> SpendChecker for Arc<T> {
    async fn check_spend(&self, outpoint: OutPoint) -> SpendStatus {
        (**self).check_spend(outpoint).await
    }
}
