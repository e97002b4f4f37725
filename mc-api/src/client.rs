use std::sync::Arc;

use rpc_client::{RawNotification, Transport, TransportKind};
use tokio::sync::broadcast;

use crate::error::{ApiError, Result};
use crate::method::RpcMethod;

/// A client for executing typed methods against one host
///
/// Wraps a shared [`Transport`]. Cloning is cheap and clones share the
/// underlying connection.
///
/// # Example
/// ```rust,ignore
/// use mc_api::{RemoteClient, methods::jsonrpc::Ping, types::NoParams};
///
/// let client = RemoteClient::new(Arc::new(transport));
/// let pong = client.execute::<Ping>(&NoParams).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RemoteClient {
    transport: Arc<dyn Transport>,
}

impl RemoteClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Execute a typed method
    ///
    /// Encodes `params`, performs the call and decodes the result with
    /// [`RpcMethod::parse_result`].
    pub async fn execute<M: RpcMethod>(&self, params: &M::Params) -> Result<M::Result> {
        let value = serde_json::to_value(params).map_err(|e| ApiError::Encode {
            method: M::METHOD,
            message: e.to_string(),
        })?;

        tracing::trace!(method = M::METHOD, "Executing remote method");

        let raw = self.transport.call(M::METHOD, value).await.map_err(|e| {
            tracing::debug!(method = M::METHOD, "Remote call failed: {}", e);
            ApiError::from(e)
        })?;

        M::parse_result(raw)
    }

    /// Delivery model of the underlying transport
    pub fn kind(&self) -> TransportKind {
        self.transport.kind()
    }

    /// Subscribe to raw notifications, `None` on poll-only transports
    pub fn subscribe(&self) -> Option<broadcast::Receiver<RawNotification>> {
        self.transport.subscribe()
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}
