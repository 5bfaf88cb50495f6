//! Pending Call Store - correlates backend responses with waiting callers.
//!
//! Maps request ids to the oneshot sender of the caller awaiting the result.

use crate::domain::{RequestId, RpcError};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::debug;

/// Result delivered to a waiting caller.
pub type CallResult = Result<Value, RpcError>;

/// A pending call waiting for its response
struct PendingCall {
    /// Channel to send the response
    sender: oneshot::Sender<CallResult>,
    /// When the call was registered
    created_at: Instant,
    /// Method name (for logging)
    method: String,
}

/// Statistics for the pending call store
#[derive(Debug, Default)]
pub struct PendingStats {
    /// Total calls registered
    pub total_registered: AtomicU64,
    /// Total calls completed with a response
    pub total_completed: AtomicU64,
    /// Total calls cancelled (timed out or caller dropped)
    pub total_cancelled: AtomicU64,
    /// Responses whose id was no longer pending
    pub total_unmatched: AtomicU64,
}

/// Pending call store.
///
/// Flow:
/// 1. `ConnectionPool::call` allocates an id and calls `register()`
/// 2. The request is queued and eventually written to a connection
/// 3. The connection's read loop calls `complete()` with the response
/// 4. The caller awaits the receiver or times out and calls `cancel()`
#[derive(Default)]
pub struct PendingCallStore {
    pending: DashMap<RequestId, PendingCall>,
    stats: PendingStats,
}

impl PendingCallStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending call and get a receiver for its result.
    pub fn register(&self, id: RequestId, method: &str) -> oneshot::Receiver<CallResult> {
        let (tx, rx) = oneshot::channel();
        self.pending.insert(
            id,
            PendingCall {
                sender: tx,
                created_at: Instant::now(),
                method: method.to_string(),
            },
        );
        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);
        rx
    }

    /// Complete a pending call.
    ///
    /// Returns true if the call was found and its caller was still waiting.
    pub fn complete(&self, id: RequestId, result: CallResult) -> bool {
        let Some((_, pending)) = self.pending.remove(&id) else {
            self.stats.total_unmatched.fetch_add(1, Ordering::Relaxed);
            debug!(request_id = id, "Response for unknown or expired request id");
            return false;
        };

        let elapsed = pending.created_at.elapsed();
        match pending.sender.send(result) {
            Ok(()) => {
                self.stats.total_completed.fetch_add(1, Ordering::Relaxed);
                debug!(
                    request_id = id,
                    method = %pending.method,
                    response_time_ms = elapsed.as_millis() as u64,
                    "Completed pending call"
                );
                true
            }
            Err(_) => {
                // Receiver was dropped (caller gave up)
                self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Forget a pending call without answering it.
    pub fn cancel(&self, id: RequestId) -> bool {
        if self.pending.remove(&id).is_some() {
            self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Drop every pending sender; waiting callers observe a closed channel.
    pub fn clear(&self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn is_pending(&self, id: RequestId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }
}
