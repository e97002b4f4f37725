//! MediaCenter - Main entry point for the SDK

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mc_api::{RemoteClient, Transport, TransportError};
use mc_sync::{ConnectionFactory, HostId, LibraryStore, SqliteStore, SyncService};
use parking_lot::RwLock;

use crate::config::SdkConfig;
use crate::context::{http_transport, HostContext};
use crate::error::{Result, SdkError};
use crate::host::HostConfig;
use crate::registry::{default_library_path, default_registry_path, HostRegistry};

/// Connection factory for sync runs, backed by the known host configs
#[derive(Debug, Default)]
pub struct HostDirectory {
    hosts: RwLock<HashMap<HostId, HostConfig>>,
}

impl HostDirectory {
    pub fn new(hosts: &[HostConfig]) -> Self {
        let directory = Self::default();
        for host in hosts {
            directory.insert(host.clone());
        }
        directory
    }

    pub fn insert(&self, host: HostConfig) {
        self.hosts.write().insert(host.host_id(), host);
    }

    pub fn remove(&self, id: &HostId) {
        self.hosts.write().remove(id);
    }
}

impl ConnectionFactory for HostDirectory {
    fn open(&self, host: &HostId) -> mc_api::Result<RemoteClient> {
        let hosts = self.hosts.read();
        let config = hosts
            .get(host)
            .ok_or_else(|| TransportError::Connect(format!("unknown host {}", host)))?;
        Ok(RemoteClient::new(Arc::new(http_transport(config))))
    }
}

/// Main system entry point
///
/// Holds the host registry, the shared library store and sync service, and
/// at most one live [`HostContext`]. Switching hosts tears the previous
/// context down before the next one connects.
///
/// ```rust,ignore
/// let mut center = MediaCenter::open_default(SdkConfig::default())?;
/// let host = center.switch_host("living-room").await?;
/// host.reconciler().register_player(Arc::new(Printer))?;
/// host.sync(vec![SyncTask::full(SyncKind::Movies)])?;
/// ```
pub struct MediaCenter {
    registry: HostRegistry,
    registry_path: Option<PathBuf>,
    directory: Arc<HostDirectory>,
    sync: Arc<SyncService>,
    config: SdkConfig,
    current: Option<HostContext>,
}

impl MediaCenter {
    /// Registry and library at the platform's default locations
    pub fn open_default(config: SdkConfig) -> Result<Self> {
        Self::open(&default_registry_path()?, &default_library_path()?, config)
    }

    pub fn open(registry_path: &Path, library_path: &Path, config: SdkConfig) -> Result<Self> {
        let registry = HostRegistry::load(registry_path)?;
        if let Some(parent) = library_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Arc::new(SqliteStore::open(library_path)?);
        let mut center = Self::new(registry, store, config)?;
        center.registry_path = Some(registry_path.to_path_buf());
        Ok(center)
    }

    /// In-memory setup; the registry is not persisted
    pub fn new(registry: HostRegistry, store: Arc<dyn LibraryStore>, config: SdkConfig) -> Result<Self> {
        let directory = Arc::new(HostDirectory::new(registry.hosts()));
        let connections: Arc<dyn ConnectionFactory> = directory.clone();
        Self::with_connections(registry, store, directory, connections, config)
    }

    /// Sync runs open their connections through `connections` instead of HTTP
    pub fn with_sync_connections(
        registry: HostRegistry,
        store: Arc<dyn LibraryStore>,
        connections: Arc<dyn ConnectionFactory>,
        config: SdkConfig,
    ) -> Result<Self> {
        let directory = Arc::new(HostDirectory::new(registry.hosts()));
        Self::with_connections(registry, store, directory, connections, config)
    }

    fn with_connections(
        registry: HostRegistry,
        store: Arc<dyn LibraryStore>,
        directory: Arc<HostDirectory>,
        connections: Arc<dyn ConnectionFactory>,
        config: SdkConfig,
    ) -> Result<Self> {
        config.validate()?;
        let sync = Arc::new(SyncService::new(store, connections, config.sync.clone())?);
        Ok(Self {
            registry,
            registry_path: None,
            directory,
            sync,
            config,
            current: None,
        })
    }

    pub fn registry(&self) -> &HostRegistry {
        &self.registry
    }

    pub fn sync_service(&self) -> &Arc<SyncService> {
        &self.sync
    }

    pub fn store(&self) -> &Arc<dyn LibraryStore> {
        self.sync.store()
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Add or replace a host
    pub fn add_host(&mut self, host: HostConfig) -> Result<()> {
        self.registry.upsert(host.clone())?;
        self.directory.insert(host);
        self.persist()
    }

    /// Forget a host, disconnecting first if it is the current one
    pub async fn remove_host(&mut self, id: &str) -> Result<HostConfig> {
        if self.current.as_ref().is_some_and(|c| c.config().id == id) {
            self.disconnect().await;
        }
        let removed = self
            .registry
            .remove(id)
            .ok_or_else(|| SdkError::HostNotFound(id.to_string()))?;
        self.directory.remove(&removed.host_id());
        self.persist()?;
        Ok(removed)
    }

    pub fn current(&self) -> Option<&HostContext> {
        self.current.as_ref()
    }

    /// The current context, or [`SdkError::NoActiveHost`]
    pub fn require_current(&self) -> Result<&HostContext> {
        self.current.as_ref().ok_or(SdkError::NoActiveHost)
    }

    /// Connect to the registry's active host, if one is selected
    pub async fn connect_active(&mut self) -> Result<&HostContext> {
        let id = self
            .registry
            .active()
            .map(|h| h.id.clone())
            .ok_or(SdkError::NoActiveHost)?;
        self.switch_host(&id).await
    }

    /// Make `id` the current host, opening its preferred transport
    pub async fn switch_host(&mut self, id: &str) -> Result<&HostContext> {
        let host = self.lookup(id)?;
        self.disconnect().await;
        let context = HostContext::connect(host, self.config.reconciler.clone(), Arc::clone(&self.sync)).await?;
        self.install(context)
    }

    /// Make `id` the current host over an already opened transport
    pub async fn switch_host_with(&mut self, id: &str, transport: Arc<dyn Transport>) -> Result<&HostContext> {
        let host = self.lookup(id)?;
        self.disconnect().await;
        let context = HostContext::with_transport(
            host,
            transport,
            self.config.reconciler.clone(),
            Arc::clone(&self.sync),
        )?;
        self.install(context)
    }

    /// Tear down the current context, if any
    pub async fn disconnect(&mut self) {
        if let Some(context) = self.current.take() {
            context.close().await;
        }
    }

    fn lookup(&self, id: &str) -> Result<HostConfig> {
        self.registry
            .get(id)
            .cloned()
            .ok_or_else(|| SdkError::HostNotFound(id.to_string()))
    }

    fn install(&mut self, context: HostContext) -> Result<&HostContext> {
        self.registry.set_active(&context.config().id)?;
        self.persist()?;
        Ok(&*self.current.insert(context))
    }

    fn persist(&self) -> Result<()> {
        match &self.registry_path {
            Some(path) => self.registry.save(path),
            None => Ok(()),
        }
    }
}
