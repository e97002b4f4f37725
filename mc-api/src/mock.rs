//! Scripted in-memory transport
//!
//! Responses are scripted per method name, either as a fixed outcome, a queue of
//! outcomes consumed in order, or a closure over the params. Every call is
//! recorded. Unscripted methods fail with a method-not-found error.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rpc_client::{RawNotification, Transport, TransportError, TransportKind};
use serde_json::{json, Value};
use tokio::sync::broadcast;

type Handler = Arc<dyn Fn(&Value) -> Result<Value, TransportError> + Send + Sync>;

enum Script {
    Fixed(Result<Value, TransportError>),
    Queue(VecDeque<Result<Value, TransportError>>),
    Handler(Handler),
}

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: Value,
}

pub struct MockTransport {
    kind: TransportKind,
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<RecordedCall>>,
    notifications: broadcast::Sender<RawNotification>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("kind", &self.kind)
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

impl MockTransport {
    pub fn new(kind: TransportKind) -> Self {
        let (notifications, _) = broadcast::channel(64);
        Self {
            kind,
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            notifications,
        }
    }

    pub fn push() -> Self {
        Self::new(TransportKind::Push)
    }

    pub fn poll_only() -> Self {
        Self::new(TransportKind::PollOnly)
    }

    /// Always answer `method` with `result`
    pub fn respond(&self, method: &str, result: Value) {
        self.scripts
            .lock()
            .insert(method.to_string(), Script::Fixed(Ok(result)));
    }

    /// Always fail `method` with `error`
    pub fn fail(&self, method: &str, error: TransportError) {
        self.scripts
            .lock()
            .insert(method.to_string(), Script::Fixed(Err(error)));
    }

    /// Answer successive calls of `method` in order
    ///
    /// Once the queue is drained further calls fail with a method error.
    pub fn respond_sequence(&self, method: &str, outcomes: Vec<Result<Value, TransportError>>) {
        self.scripts
            .lock()
            .insert(method.to_string(), Script::Queue(outcomes.into()));
    }

    /// Compute the outcome of `method` from its params
    pub fn respond_with<F>(&self, method: &str, handler: F)
    where
        F: Fn(&Value) -> Result<Value, TransportError> + Send + Sync + 'static,
    {
        self.scripts
            .lock()
            .insert(method.to_string(), Script::Handler(Arc::new(handler)));
    }

    /// Push a notification to every subscriber
    ///
    /// Returns the number of subscribers that received it.
    pub fn notify(&self, method: &str, data: Value) -> usize {
        let notification = RawNotification {
            method: method.to_string(),
            params: json!({"sender": "xbmc", "data": data}),
        };
        self.notifications.send(notification).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.notifications.receiver_count()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.method == method).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn outcome(&self, method: &str, params: &Value) -> Result<Value, TransportError> {
        let handler = {
            let mut scripts = self.scripts.lock();
            match scripts.get_mut(method) {
                Some(Script::Fixed(outcome)) => return outcome.clone(),
                Some(Script::Queue(queue)) => {
                    return queue.pop_front().unwrap_or_else(|| Err(not_found(method)))
                }
                Some(Script::Handler(handler)) => Arc::clone(handler),
                None => return Err(not_found(method)),
            }
        };
        handler(params)
    }
}

fn not_found(method: &str) -> TransportError {
    TransportError::Rpc {
        code: -32601,
        message: format!("Method not found: {}", method),
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        let outcome = self.outcome(method, &params);
        self.calls.lock().push(RecordedCall {
            method: method.to_string(),
            params,
        });
        // Let other tasks observe in-flight state, like a real round trip would
        tokio::task::yield_now().await;
        outcome
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<RawNotification>> {
        match self.kind {
            TransportKind::Push => Some(self.notifications.subscribe()),
            TransportKind::PollOnly => None,
        }
    }
}
