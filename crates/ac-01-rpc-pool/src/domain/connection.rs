//! Per-connection state machine.

use super::messages::{QueuedRequest, RequestId};
use serde::Serialize;

/// State of one pooled connection.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// Handshake in progress (initial open or reconnect).
    Connecting,
    /// Open and free to take the next queued request.
    Idle,
    /// Open with one request in flight.
    Busy(QueuedRequest),
    /// Socket gone; a reconnect is pending unless the pool is closing.
    Closed,
}

impl ConnectionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ConnectionState::Idle)
    }

    pub fn is_live(&self) -> bool {
        matches!(self, ConnectionState::Idle | ConnectionState::Busy(_))
    }

    /// Id of the in-flight request, if any.
    pub fn in_flight(&self) -> Option<RequestId> {
        match self {
            ConnectionState::Busy(request) => Some(request.id),
            _ => None,
        }
    }
}

/// Point-in-time view of the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolSnapshot {
    pub idle: usize,
    pub busy: usize,
    pub connecting: usize,
    pub closed: usize,
    pub queued: usize,
    pub pending: usize,
}

impl PoolSnapshot {
    /// Connections currently able to carry requests.
    pub fn live(&self) -> usize {
        self.idle + self.busy
    }
}
