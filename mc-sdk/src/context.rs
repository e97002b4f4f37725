//! Everything scoped to one connected host

use std::sync::Arc;
use std::time::{Duration, Instant};

use mc_api::methods::jsonrpc::Ping;
use mc_api::types::NoParams;
use mc_api::{HttpTransport, RemoteClient, TcpTransport, Transport, TransportKind};
use mc_state::{ReconcilerConfig, StateReconciler};
use mc_sync::{HostId, SyncService, SyncTask};
use uuid::Uuid;

use crate::error::Result;
use crate::host::{HostConfig, TransportPreference};

/// Open the request/response transport for `host`
pub fn http_transport(host: &HostConfig) -> HttpTransport {
    HttpTransport::with_timeouts(host.http_endpoint(), host.call_timeout(), host.call_timeout())
}

/// Open the transport the host's preference asks for
///
/// A push preference falls back to HTTP when the TCP session cannot be opened,
/// e.g. because remote control over TCP is disabled on the host.
pub async fn open_transport(host: &HostConfig) -> Arc<dyn Transport> {
    if host.transport == TransportPreference::Push {
        match TcpTransport::connect(&host.address, host.tcp_port, host.call_timeout()).await {
            Ok(tcp) => return Arc::new(tcp),
            Err(e) => tracing::warn!(
                host = %host.id,
                "TCP session unavailable, falling back to HTTP polling: {}",
                e
            ),
        }
    }
    Arc::new(http_transport(host))
}

/// Live connection to one host
///
/// Owns the host's client and state reconciler. Library syncs go through the
/// shared [`SyncService`], which opens its own connection per run.
pub struct HostContext {
    config: HostConfig,
    client: RemoteClient,
    reconciler: StateReconciler,
    sync: Arc<SyncService>,
}

impl HostContext {
    pub async fn connect(
        config: HostConfig,
        reconciler_config: ReconcilerConfig,
        sync: Arc<SyncService>,
    ) -> Result<Self> {
        config.validate()?;
        let transport = open_transport(&config).await;
        Self::with_transport(config, transport, reconciler_config, sync)
    }

    /// Build a context over an already opened transport
    pub fn with_transport(
        config: HostConfig,
        transport: Arc<dyn Transport>,
        reconciler_config: ReconcilerConfig,
        sync: Arc<SyncService>,
    ) -> Result<Self> {
        let client = RemoteClient::new(transport);
        let reconciler = StateReconciler::new(client.clone(), reconciler_config)?;
        tracing::info!(host = %config.id, transport = ?client.kind(), "Connected to host");
        Ok(Self {
            config,
            client,
            reconciler,
            sync,
        })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn host_id(&self) -> HostId {
        self.config.host_id()
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.client.kind()
    }

    pub fn reconciler(&self) -> &StateReconciler {
        &self.reconciler
    }

    /// Round trip of one ping call
    pub async fn ping(&self) -> Result<Duration> {
        let started = Instant::now();
        self.client.execute::<Ping>(&NoParams).await?;
        Ok(started.elapsed())
    }

    /// Queue library sync tasks for this host
    pub fn sync(&self, tasks: Vec<SyncTask>) -> Result<Uuid> {
        Ok(self.sync.sync(self.host_id(), tasks)?)
    }

    pub fn is_syncing(&self) -> bool {
        self.sync.is_syncing(&self.host_id())
    }

    /// Drop every observer and stop the reconciler
    pub async fn close(self) {
        if let Err(e) = self.reconciler.stop_observing() {
            tracing::debug!(host = %self.config.id, "Reconciler already stopped: {}", e);
        }
        self.reconciler.shutdown().await;
        tracing::info!(host = %self.config.id, "Disconnected from host");
    }
}
