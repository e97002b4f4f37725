//! Push-capable transport: one persistent TCP session
//!
//! The host writes back-to-back JSON objects with no framing, so the reader
//! feeds a streaming deserializer and keeps any incomplete tail for the next read.
//! Responses are routed to the pending call by id; everything without an id is a
//! notification and is broadcast to every subscriber.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;

use crate::envelope::{parse_incoming, Incoming, RawNotification, Request};
use crate::error::TransportError;
use crate::{Transport, TransportKind};

type PendingCalls = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, TransportError>>>>>;

const NOTIFICATION_BUFFER: usize = 256;
const READ_CHUNK: usize = 8192;

/// Persistent-session transport with notification support
#[derive(Debug)]
pub struct TcpTransport {
    writer: tokio::sync::Mutex<OwnedWriteHalf>,
    pending: PendingCalls,
    notifications: broadcast::Sender<RawNotification>,
    closed: Arc<AtomicBool>,
    next_id: AtomicU64,
    call_timeout: Duration,
    reader: JoinHandle<()>,
}

impl TcpTransport {
    /// Open a session to `address:port`
    pub async fn connect(address: &str, port: u16, call_timeout: Duration) -> Result<Self, TransportError> {
        let stream = tokio::time::timeout(call_timeout, TcpStream::connect((address, port)))
            .await
            .map_err(|_| TransportError::Timeout)?
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        let _ = stream.set_nodelay(true);

        tracing::debug!(address, port, "TCP session opened");
        Ok(Self::from_stream(stream, call_timeout))
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream, call_timeout: Duration) -> Self {
        let (read_half, write_half) = stream.into_split();
        let pending: PendingCalls = Arc::new(Mutex::new(HashMap::new()));
        let (notifications, _) = broadcast::channel(NOTIFICATION_BUFFER);
        let closed = Arc::new(AtomicBool::new(false));

        let reader = tokio::spawn(read_loop(
            read_half,
            Arc::clone(&pending),
            notifications.clone(),
            Arc::clone(&closed),
        ));

        Self {
            writer: tokio::sync::Mutex::new(write_half),
            pending,
            notifications,
            closed,
            next_id: AtomicU64::new(1),
            call_timeout,
            reader,
        }
    }

    /// Whether the host closed the session
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(
    mut reader: OwnedReadHalf,
    pending: PendingCalls,
    notifications: broadcast::Sender<RawNotification>,
    closed: Arc<AtomicBool>,
) {
    let mut buffer: Vec<u8> = Vec::with_capacity(READ_CHUNK);
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        let read = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("TCP session read failed: {}", e);
                break;
            }
        };
        buffer.extend_from_slice(&chunk[..read]);

        let messages = match drain_messages(&mut buffer) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Discarding undecodable data from host: {}", e);
                buffer.clear();
                continue;
            }
        };

        for message in messages {
            match parse_incoming(message) {
                Ok(Incoming::Response { id, outcome }) => {
                    if let Some(tx) = pending.lock().remove(&id) {
                        let _ = tx.send(outcome);
                    } else {
                        tracing::debug!(id, "Response for unknown or expired call");
                    }
                }
                Ok(Incoming::Notification(notification)) => {
                    tracing::trace!(method = %notification.method, "Notification received");
                    // No receivers is fine, nobody is observing
                    let _ = notifications.send(notification);
                }
                Err(e) => tracing::warn!("Ignoring malformed message: {}", e),
            }
        }
    }

    closed.store(true, Ordering::Release);
    let orphaned: Vec<_> = pending.lock().drain().collect();
    for (_, tx) in orphaned {
        let _ = tx.send(Err(TransportError::Closed));
    }
    tracing::debug!("TCP session closed");
}

/// Pull every complete JSON value off the front of `buffer`
///
/// Leaves a trailing partial value in place.
pub(crate) fn drain_messages(buffer: &mut Vec<u8>) -> Result<Vec<Value>, TransportError> {
    let mut values = Vec::new();
    let consumed = {
        let mut stream = serde_json::Deserializer::from_slice(buffer).into_iter::<Value>();
        loop {
            match stream.next() {
                Some(Ok(value)) => values.push(value),
                Some(Err(e)) if e.is_eof() => break,
                Some(Err(e)) => return Err(TransportError::InvalidResponse(e.to_string())),
                None => break,
            }
        }
        stream.byte_offset()
    };
    buffer.drain(..consumed);
    Ok(values)
}

#[async_trait]
impl Transport for TcpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Push
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let bytes = serde_json::to_vec(&Request::new(id, method, params))
            .map_err(|e| TransportError::Send(e.to_string()))?;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        tracing::trace!(method, id, "TCP call");

        {
            let mut writer = self.writer.lock().await;
            if let Err(e) = writer.write_all(&bytes).await {
                self.pending.lock().remove(&id);
                return Err(TransportError::Send(e.to_string()));
            }
        }

        match tokio::time::timeout(self.call_timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(TransportError::Closed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(TransportError::Timeout)
            }
        }
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<RawNotification>> {
        Some(self.notifications.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    #[test]
    fn test_drain_back_to_back_objects() {
        let mut buffer = br#"{"a":1}{"b":2} {"c":"#.to_vec();
        let values = drain_messages(&mut buffer).unwrap();
        assert_eq!(values, vec![json!({"a": 1}), json!({"b": 2})]);
        assert_eq!(buffer, br#" {"c":"#.to_vec());

        buffer.extend_from_slice(b"3}");
        let values = drain_messages(&mut buffer).unwrap();
        assert_eq!(values, vec![json!({"c": 3})]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_drain_rejects_garbage() {
        let mut buffer = b"}{".to_vec();
        assert!(drain_messages(&mut buffer).is_err());
    }

    #[tokio::test]
    async fn test_call_and_notification_over_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = socket.into_split();
            let mut reader = BufReader::new(read_half);

            // Requests are written without a delimiter, read one object at a time
            let mut raw = Vec::new();
            loop {
                let available = reader.fill_buf().await.unwrap();
                if available.is_empty() {
                    return;
                }
                raw.extend_from_slice(available);
                let n = available.len();
                reader.consume(n);
                let mut values = drain_messages(&mut raw).unwrap();
                if let Some(request) = values.pop() {
                    let id = request["id"].as_u64().unwrap();
                    let notification = json!({
                        "jsonrpc": "2.0",
                        "method": "Player.OnPause",
                        "params": {"sender": "xbmc", "data": {}}
                    });
                    let response = json!({"jsonrpc": "2.0", "id": id, "result": "pong"});
                    let payload = format!("{}{}", notification, response);
                    write_half.write_all(payload.as_bytes()).await.unwrap();
                    return;
                }
            }
        });

        let transport = TcpTransport::connect("127.0.0.1", port, Duration::from_secs(5))
            .await
            .unwrap();
        let mut notifications = transport.subscribe().unwrap();

        let result = transport.call("JSONRPC.Ping", Value::Null).await.unwrap();
        assert_eq!(result, json!("pong"));

        let notification = notifications.recv().await.unwrap();
        assert_eq!(notification.method, "Player.OnPause");
        assert_eq!(transport.kind(), TransportKind::Push);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_pending_call_fails_when_session_closes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        let transport = TcpTransport::connect("127.0.0.1", port, Duration::from_secs(2))
            .await
            .unwrap();
        let error = transport.call("JSONRPC.Ping", Value::Null).await.unwrap_err();
        assert!(matches!(
            error,
            TransportError::Closed | TransportError::Send(_) | TransportError::Timeout
        ));
    }
}
