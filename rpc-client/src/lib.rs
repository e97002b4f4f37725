//! Private JSON-RPC transports for media-center hosts
//!
//! This crate provides the two ways the SDK talks to a host:
//!
//! - [`HttpTransport`]: poll-only, one HTTP POST per call
//! - [`TcpTransport`]: push-capable, one persistent session that also carries
//!   unsolicited notifications
//!
//! Both implement [`Transport`], so callers execute calls the same way regardless
//! of which one is in use. The only observable differences are [`Transport::kind`]
//! and whether [`Transport::subscribe`] yields a notification receiver.

mod envelope;
mod error;
mod http;
mod tcp;

pub use envelope::{RawNotification, JSONRPC_VERSION};
pub use error::TransportError;
pub use http::{HttpEndpoint, HttpTransport};
pub use tcp::TcpTransport;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

/// Delivery model of a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Persistent session, the host pushes notifications
    Push,
    /// Request/response only, state changes must be polled
    PollOnly,
}

/// One remote call executor
///
/// Implementations must be safe to share between tasks; concurrent calls are allowed.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Delivery model of this transport
    fn kind(&self) -> TransportKind;

    /// Execute `method` with `params` and return the raw `result` value
    async fn call(&self, method: &str, params: Value) -> Result<Value, TransportError>;

    /// Subscribe to unsolicited notifications
    ///
    /// Returns `None` for transports that cannot push.
    fn subscribe(&self) -> Option<broadcast::Receiver<RawNotification>> {
        None
    }
}
