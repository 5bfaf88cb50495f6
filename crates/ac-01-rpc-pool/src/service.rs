//! Connection Pool Service
//!
//! Owns the per-connection state machines and the FIFO request queue. All
//! shared state sits behind one mutex that is never held across an await;
//! io tasks report back through `ConnectionHandler` with a weak reference so
//! dropping the last pool handle tears everything down.

use crate::adapters::websocket::{self, ConnectionHandler, OutboundFrame, WsStream};
use crate::adapters::PendingCallStore;
use crate::domain::{
    codes, ConnectionState, PoolConfig, PoolError, PoolSnapshot, QueuedRequest, RequestId,
    RpcError, RpcResponse,
};
use crate::ports::RpcCaller;
use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Cumulative pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Calls accepted by `call()`
    pub calls: u64,
    /// Responses correlated to a waiting caller
    pub responses: u64,
    /// Responses carrying an error object
    pub rpc_errors: u64,
    /// Calls abandoned after the request timeout
    pub timeouts: u64,
    /// Requests returned to the queue after a send failure or disconnect
    pub requeued: u64,
    /// Successful reconnections
    pub reconnects: u64,
}

#[derive(Debug, Default)]
struct PoolCounters {
    calls: AtomicU64,
    responses: AtomicU64,
    rpc_errors: AtomicU64,
    timeouts: AtomicU64,
    requeued: AtomicU64,
    reconnects: AtomicU64,
}

impl PoolCounters {
    fn snapshot(&self) -> PoolStats {
        PoolStats {
            calls: self.calls.load(Ordering::Relaxed),
            responses: self.responses.load(Ordering::Relaxed),
            rpc_errors: self.rpc_errors.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            requeued: self.requeued.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}

struct ConnectionSlot {
    state: ConnectionState,
    outbound: Option<mpsc::UnboundedSender<OutboundFrame>>,
    /// Bumped on every install; events from older sockets are ignored.
    generation: u64,
    reconnect_attempts: u32,
}

impl ConnectionSlot {
    fn new() -> Self {
        Self {
            state: ConnectionState::Connecting,
            outbound: None,
            generation: 0,
            reconnect_attempts: 0,
        }
    }
}

struct PoolState {
    slots: Vec<ConnectionSlot>,
    queue: VecDeque<QueuedRequest>,
    closing: bool,
}

struct PoolInner {
    config: PoolConfig,
    state: Mutex<PoolState>,
    pending: PendingCallStore,
    next_id: AtomicU64,
    counters: PoolCounters,
}

/// Pool of persistent websocket connections multiplexing JSON-RPC calls.
///
/// Cheap to clone; every clone shares the same connections.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Open `pool_size` connections concurrently.
    ///
    /// Fails with `BackendUnreachable` only when none of them open; slots
    /// that failed keep retrying in the background.
    pub async fn connect(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;

        let inner = Arc::new(PoolInner::new(config));
        let config = &inner.config;
        let opens = (0..config.pool_size).map(|_| websocket::open(&config.url, config.connect_timeout()));
        let results = join_all(opens).await;

        let mut failed = Vec::new();
        let mut last_error = None;
        for (slot, result) in results.into_iter().enumerate() {
            match result {
                Ok(stream) => inner.install(slot, stream),
                Err(e) => {
                    warn!(slot, error = %e, "[ac-01] Initial connection failed");
                    failed.push(slot);
                    last_error = Some(e);
                }
            }
        }

        if failed.len() == config.pool_size {
            inner.shutdown();
            return Err(last_error.unwrap_or_else(|| PoolError::BackendUnreachable {
                url: config.url.clone(),
                reason: "no connection could be opened".to_string(),
            }));
        }

        for slot in failed {
            inner.spawn_reconnect(slot);
        }

        info!(
            url = %config.url,
            pool_size = config.pool_size,
            live = inner.snapshot().live(),
            "[ac-01] Connection pool ready"
        );
        Ok(Self { inner })
    }

    /// Issue one call and wait for its result.
    ///
    /// The request timeout runs from the moment the call is queued, so time
    /// spent waiting for a free connection counts against it.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, PoolError> {
        let inner = &self.inner;
        let id = inner.next_id.fetch_add(1, Ordering::Relaxed);
        let rx = inner.pending.register(id, method);

        {
            let mut state = inner.state.lock();
            if state.closing {
                drop(state);
                inner.pending.cancel(id);
                return Err(PoolError::Closed);
            }
            state.queue.push_back(QueuedRequest::new(id, method, params));
        }
        inner.counters.calls.fetch_add(1, Ordering::Relaxed);
        inner.dispatch();

        let timeout = inner.config.request_timeout();
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => result.map_err(PoolError::Rpc),
            Ok(Err(_)) => Err(PoolError::Closed),
            Err(_) => {
                inner.abandon(id);
                inner.counters.timeouts.fetch_add(1, Ordering::Relaxed);
                warn!(request_id = id, method, "[ac-01] Request timed out");
                Err(PoolError::Timeout {
                    method: method.to_string(),
                    timeout_ms: inner.config.request_timeout_ms,
                })
            }
        }
    }

    /// Tear down every connection.
    ///
    /// Queued and in-flight calls are abandoned; their callers observe
    /// `PoolError::Closed`. Safe to call more than once.
    pub fn close(&self) {
        self.inner.shutdown();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closing
    }

    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    pub fn stats(&self) -> PoolStats {
        self.inner.counters.snapshot()
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        self.inner.snapshot()
    }
}

#[async_trait]
impl RpcCaller for ConnectionPool {
    async fn call(&self, method: &str, params: Value) -> Result<Value, PoolError> {
        ConnectionPool::call(self, method, params).await
    }
}

impl PoolInner {
    fn new(config: PoolConfig) -> Self {
        let slots = (0..config.pool_size).map(|_| ConnectionSlot::new()).collect();
        Self {
            config,
            state: Mutex::new(PoolState {
                slots,
                queue: VecDeque::new(),
                closing: false,
            }),
            pending: PendingCallStore::new(),
            next_id: AtomicU64::new(1),
            counters: PoolCounters::default(),
        }
    }

    /// Attach an open socket to `slot` and start its io task.
    fn install(self: &Arc<Self>, slot: usize, stream: WsStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = {
            let mut state = self.state.lock();
            if state.closing {
                return;
            }
            let Some(entry) = state.slots.get_mut(slot) else {
                return;
            };
            entry.generation += 1;
            entry.state = ConnectionState::Idle;
            entry.outbound = Some(tx);
            entry.reconnect_attempts = 0;
            entry.generation
        };

        tokio::spawn(websocket::run_connection(
            Arc::downgrade(self),
            slot,
            generation,
            stream,
            rx,
        ));
        self.dispatch();
    }

    /// Hand queued requests to idle connections, oldest first.
    fn dispatch(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.closing {
            return;
        }

        while !state.queue.is_empty() {
            let Some(slot) = state.slots.iter().position(|s| s.state.is_idle()) else {
                break;
            };
            let Some(request) = state.queue.pop_front() else {
                break;
            };

            let payload = match request.encode() {
                Ok(payload) => payload,
                Err(e) => {
                    self.pending.complete(
                        request.id,
                        Err(RpcError::new(codes::INTERNAL_ERROR, e.to_string())),
                    );
                    continue;
                }
            };

            let entry = &mut state.slots[slot];
            let frame = OutboundFrame {
                request_id: request.id,
                payload,
            };
            let sent = entry
                .outbound
                .as_ref()
                .is_some_and(|tx| tx.send(frame).is_ok());

            if sent {
                debug!(slot, request_id = request.id, method = %request.method, "[ac-01] Dispatched");
                entry.state = ConnectionState::Busy(request);
            } else {
                // io task already gone; its close event schedules the reconnect
                entry.state = ConnectionState::Closed;
                entry.outbound = None;
                state.queue.push_back(request);
            }
        }
    }

    /// Drop a timed-out call wherever it is.
    fn abandon(&self, id: RequestId) {
        self.pending.cancel(id);
        {
            let mut state = self.state.lock();
            state.queue.retain(|request| request.id != id);
            for entry in state.slots.iter_mut() {
                if entry.state.in_flight() == Some(id) {
                    entry.state = ConnectionState::Idle;
                }
            }
        }
        self.dispatch();
    }

    fn shutdown(&self) {
        let (queued, live) = {
            let mut state = self.state.lock();
            if state.closing {
                return;
            }
            state.closing = true;
            let queued = state.queue.len();
            state.queue.clear();
            let mut live = 0;
            for entry in state.slots.iter_mut() {
                if entry.state.is_live() {
                    live += 1;
                }
                entry.outbound = None;
                entry.state = ConnectionState::Closed;
            }
            (queued, live)
        };
        let abandoned = self.pending.clear();
        info!(queued, live, abandoned, "[ac-01] Connection pool closed");
    }

    fn spawn_reconnect(self: &Arc<Self>, slot: usize) {
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                let (url, delay, timeout, attempt) = {
                    let Some(inner) = weak.upgrade() else { return };
                    let mut state = inner.state.lock();
                    if state.closing {
                        return;
                    }
                    let Some(entry) = state.slots.get_mut(slot) else {
                        return;
                    };
                    let attempt = entry.reconnect_attempts;
                    entry.reconnect_attempts = attempt.saturating_add(1);
                    entry.state = ConnectionState::Connecting;
                    (
                        inner.config.url.clone(),
                        inner.config.reconnect_delay(attempt),
                        inner.config.connect_timeout(),
                        attempt,
                    )
                };

                tokio::time::sleep(delay).await;

                match websocket::open(&url, timeout).await {
                    Ok(stream) => {
                        let Some(inner) = weak.upgrade() else { return };
                        inner.counters.reconnects.fetch_add(1, Ordering::Relaxed);
                        info!(slot, attempt, "[ac-01] Reconnected");
                        inner.install(slot, stream);
                        return;
                    }
                    Err(e) => {
                        debug!(slot, attempt, error = %e, "[ac-01] Reconnect attempt failed");
                    }
                }
            }
        });
    }

    fn snapshot(&self) -> PoolSnapshot {
        let state = self.state.lock();
        let mut snapshot = PoolSnapshot {
            queued: state.queue.len(),
            pending: self.pending.pending_count(),
            ..PoolSnapshot::default()
        };
        for entry in &state.slots {
            match entry.state {
                ConnectionState::Connecting => snapshot.connecting += 1,
                ConnectionState::Idle => snapshot.idle += 1,
                ConnectionState::Busy(_) => snapshot.busy += 1,
                ConnectionState::Closed => snapshot.closed += 1,
            }
        }
        snapshot
    }
}

impl ConnectionHandler for PoolInner {
    fn on_text(&self, slot: usize, generation: u64, text: &str) {
        let response = match RpcResponse::parse(text) {
            Ok(response) => response,
            Err(e) => {
                warn!(slot, error = %e, "[ac-01] Unparseable frame from backend");
                return;
            }
        };
        let Some(id) = response.id else {
            debug!(slot, "[ac-01] Ignoring server notification");
            return;
        };

        {
            let mut state = self.state.lock();
            if let Some(entry) = state.slots.get_mut(slot) {
                if entry.generation == generation && entry.state.in_flight() == Some(id) {
                    entry.state = ConnectionState::Idle;
                }
            }
        }

        let result = response.into_result();
        if result.is_err() {
            self.counters.rpc_errors.fetch_add(1, Ordering::Relaxed);
        }
        if self.pending.complete(id, result) {
            self.counters.responses.fetch_add(1, Ordering::Relaxed);
        }
        self.dispatch();
    }

    fn on_send_failed(&self, slot: usize, generation: u64, request_id: RequestId, reason: String) {
        warn!(slot, request_id, %reason, "[ac-01] Send failed, requeueing request");
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Some(entry) = state.slots.get_mut(slot) else {
            return;
        };
        if entry.generation != generation || entry.state.in_flight() != Some(request_id) {
            return;
        }
        if let ConnectionState::Busy(request) =
            std::mem::replace(&mut entry.state, ConnectionState::Idle)
        {
            if self.pending.is_pending(request.id) {
                state.queue.push_back(request);
                self.counters.requeued.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn on_closed(self: Arc<Self>, slot: usize, generation: u64) {
        {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let Some(entry) = state.slots.get_mut(slot) else {
                return;
            };
            if entry.generation != generation {
                return;
            }
            entry.outbound = None;
            if let ConnectionState::Busy(request) =
                std::mem::replace(&mut entry.state, ConnectionState::Closed)
            {
                if self.pending.is_pending(request.id) {
                    state.queue.push_back(request);
                    self.counters.requeued.fetch_add(1, Ordering::Relaxed);
                }
            }
            if state.closing {
                return;
            }
        }

        warn!(slot, "[ac-01] Connection dropped, scheduling reconnect");
        self.spawn_reconnect(slot);
        self.dispatch();
    }
}
