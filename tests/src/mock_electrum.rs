//! In-process Electrum websocket server.
//!
//! Serves `blockchain.transaction.get` (verbose) and
//! `blockchain.scripthash.get_history` from an in-memory ledger. Every
//! output script gets a history listing the transaction that created it
//! and the one that spent it, in insertion order.

use ac_02_spend_query::script_hash;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared_types::{OutPoint, TxId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};

const TRANSACTION_GET: &str = "blockchain.transaction.get";
const SCRIPTHASH_GET_HISTORY: &str = "blockchain.scripthash.get_history";

#[derive(Default)]
struct Ledger {
    transactions: HashMap<TxId, Value>,
    scripts: HashMap<OutPoint, Vec<u8>>,
    histories: HashMap<String, Vec<(TxId, i64)>>,
    failing: HashSet<TxId>,
    next_height: i64,
}

impl Ledger {
    fn record(&mut self, script: &[u8], txid: TxId, height: i64) {
        let history = self.histories.entry(script_hash(script)).or_default();
        if !history.iter().any(|(seen, _)| *seen == txid) {
            history.push((txid, height));
        }
    }
}

/// Request counters, by method.
#[derive(Default)]
pub struct RequestCounts {
    pub transaction_get: AtomicU64,
    pub get_history: AtomicU64,
    pub connections: AtomicU64,
}

/// Mock Electrum backend on a random local port.
#[derive(Clone)]
pub struct MockElectrumServer {
    url: String,
    ledger: Arc<Mutex<Ledger>>,
    counts: Arc<RequestCounts>,
}

impl MockElectrumServer {
    /// Bind to 127.0.0.1 on an ephemeral port and start accepting.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let server = Self {
            url: format!("ws://{}", listener.local_addr()?),
            ledger: Arc::new(Mutex::new(Ledger {
                next_height: 800_000,
                ..Ledger::default()
            })),
            counts: Arc::new(RequestCounts::default()),
        };

        let accept = server.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(accept.clone().serve(stream));
            }
        });
        Ok(server)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn counts(&self) -> &RequestCounts {
        &self.counts
    }

    /// Total RPC requests answered so far.
    pub fn total_requests(&self) -> u64 {
        self.counts.transaction_get.load(Ordering::SeqCst)
            + self.counts.get_history.load(Ordering::SeqCst)
    }

    /// Add a confirmed transaction spending `inputs` and creating one output
    /// per script.
    pub fn add_transaction(&self, txid: TxId, inputs: &[OutPoint], output_scripts: &[Vec<u8>]) {
        let mut ledger = self.ledger.lock();
        let height = ledger.next_height;
        ledger.next_height += 1;

        let vin: Vec<Value> = inputs
            .iter()
            .map(|input| json!({"txid": input.txid.to_hex(), "vout": input.vout}))
            .collect();
        let vout: Vec<Value> = output_scripts
            .iter()
            .enumerate()
            .map(|(n, script)| json!({"n": n, "scriptPubKey": {"hex": hex::encode(script)}}))
            .collect();
        ledger
            .transactions
            .insert(txid, json!({"txid": txid.to_hex(), "vin": vin, "vout": vout}));

        for input in inputs {
            if let Some(script) = ledger.scripts.get(input).cloned() {
                ledger.record(&script, txid, height);
            }
        }
        for (n, script) in output_scripts.iter().enumerate() {
            ledger.scripts.insert(OutPoint::new(txid, n as u32), script.clone());
            ledger.record(script, txid, height);
        }
    }

    /// Build an authchain: `txids[0]` is the authbase and each following
    /// transaction spends output 0 of the previous one. Output 1 of the
    /// authbase carries `announcement`.
    pub fn add_chain(&self, txids: &[TxId], announcement: &[u8]) {
        for (i, txid) in txids.iter().enumerate() {
            let mut outputs = vec![identity_script(txid)];
            if i == 0 {
                outputs.push(announcement.to_vec());
            }
            let inputs: Vec<OutPoint> = match i {
                0 => vec![OutPoint::new(TxId([0xee; 32]), 7)],
                _ => vec![OutPoint::identity(txids[i - 1])],
            };
            self.add_transaction(*txid, &inputs, &outputs);
        }
    }

    /// Append `next` to the chain ending at `head`.
    pub fn extend_chain(&self, head: TxId, next: TxId) {
        self.add_transaction(next, &[OutPoint::identity(head)], &[identity_script(&next)]);
    }

    /// Answer every `blockchain.transaction.get` for `txid` with an error.
    pub fn fail_transaction(&self, txid: TxId) {
        self.ledger.lock().failing.insert(txid);
    }

    pub fn heal_transaction(&self, txid: TxId) {
        self.ledger.lock().failing.remove(&txid);
    }

    async fn serve(self, stream: TcpStream) {
        let Ok(mut ws) = accept_async(stream).await else {
            return;
        };
        self.counts.connections.fetch_add(1, Ordering::SeqCst);

        while let Some(Ok(message)) = ws.next().await {
            let Message::Text(text) = message else {
                continue;
            };
            let Ok(request) = serde_json::from_str::<Value>(text.as_str()) else {
                continue;
            };
            let id = request["id"].clone();
            let reply = match self.handle(&request) {
                Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
                Err((code, message)) => json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {"code": code, "message": message}
                }),
            };
            if ws.send(Message::Text(reply.to_string().into())).await.is_err() {
                return;
            }
        }
    }

    fn handle(&self, request: &Value) -> Result<Value, (i64, String)> {
        let params = &request["params"];
        let ledger = self.ledger.lock();

        match request["method"].as_str().unwrap_or_default() {
            TRANSACTION_GET => {
                self.counts.transaction_get.fetch_add(1, Ordering::SeqCst);
                let txid: TxId = params[0]
                    .as_str()
                    .and_then(|s| s.parse().ok())
                    .ok_or((-32602, "invalid tx hash".to_string()))?;
                if ledger.failing.contains(&txid) {
                    return Err((-32603, "daemon error".to_string()));
                }
                ledger
                    .transactions
                    .get(&txid)
                    .cloned()
                    .ok_or((2, "No such mempool or blockchain transaction".to_string()))
            }
            SCRIPTHASH_GET_HISTORY => {
                self.counts.get_history.fetch_add(1, Ordering::SeqCst);
                let hash = params[0].as_str().unwrap_or_default();
                let history = ledger.histories.get(hash).cloned().unwrap_or_default();
                Ok(Value::Array(
                    history
                        .into_iter()
                        .map(|(txid, height)| json!({"tx_hash": txid.to_hex(), "height": height}))
                        .collect(),
                ))
            }
            other => Err((-32601, format!("unknown method {other}"))),
        }
    }
}

/// Distinct locking script for the identity output of `txid`.
pub fn identity_script(txid: &TxId) -> Vec<u8> {
    let mut script = vec![0xa9, 0x14];
    script.extend_from_slice(&txid.as_bytes()[..20]);
    script.push(0x87);
    script
}

/// `OP_RETURN "BCMR" <hash> <uri>` announcement script.
pub fn bcmr_announcement(content_hash: [u8; 32], uri: &str) -> Vec<u8> {
    let mut script = vec![0x6a, 0x04];
    script.extend_from_slice(b"BCMR");
    script.push(0x20);
    script.extend_from_slice(&content_hash);
    script.push(uri.len() as u8);
    script.extend_from_slice(uri.as_bytes());
    script
}
