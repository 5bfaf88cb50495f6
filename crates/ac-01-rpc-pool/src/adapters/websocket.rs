//! Websocket transport for one pooled connection.
//!
//! `open` performs the handshake; `run_connection` owns the socket until it
//! drops, forwarding frames in both directions and reporting events back to
//! the pool through `ConnectionHandler`.

use crate::domain::{PoolError, RequestId};
use futures::{SinkExt, StreamExt};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

/// Client websocket stream.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Encoded request handed to a connection's io loop.
#[derive(Debug)]
pub struct OutboundFrame {
    pub request_id: RequestId,
    pub payload: String,
}

/// Callbacks from a connection's io loop into the pool.
///
/// `generation` identifies the socket instance so late events from a
/// replaced connection can be ignored.
pub trait ConnectionHandler: Send + Sync + 'static {
    /// A text frame arrived.
    fn on_text(&self, slot: usize, generation: u64, text: &str);
    /// Writing `request_id` to the socket failed.
    fn on_send_failed(&self, slot: usize, generation: u64, request_id: RequestId, reason: String);
    /// The socket is gone.
    fn on_closed(self: Arc<Self>, slot: usize, generation: u64);
}

/// Open one websocket connection.
pub async fn open(url: &str, timeout: Duration) -> Result<WsStream, PoolError> {
    match tokio::time::timeout(timeout, connect_async(url)).await {
        Ok(Ok((stream, _response))) => Ok(stream),
        Ok(Err(e)) => Err(PoolError::BackendUnreachable {
            url: url.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Err(PoolError::BackendUnreachable {
            url: url.to_string(),
            reason: format!("handshake timed out after {}ms", timeout.as_millis()),
        }),
    }
}

/// Drive one connection until the socket drops or the pool releases it.
pub async fn run_connection<H: ConnectionHandler>(
    handler: Weak<H>,
    slot: usize,
    generation: u64,
    stream: WsStream,
    mut outbound: mpsc::UnboundedReceiver<OutboundFrame>,
) {
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                // Sender dropped: the pool is closing or replaced this slot
                let Some(frame) = frame else { break };
                if let Err(e) = write.send(Message::Text(frame.payload.into())).await {
                    if let Some(handler) = handler.upgrade() {
                        handler.on_send_failed(slot, generation, frame.request_id, e.to_string());
                    }
                    break;
                }
            }
            message = read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        let Some(handler) = handler.upgrade() else { break };
                        handler.on_text(slot, generation, text.as_str());
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = write.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(slot, "[ac-01] Backend closed connection");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(slot, error = %e, "[ac-01] Websocket read failed");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    let _ = write.close().await;
    if let Some(handler) = handler.upgrade() {
        handler.on_closed(slot, generation);
    }
}
