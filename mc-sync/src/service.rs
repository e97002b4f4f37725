use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::pipeline::{ConnectionFactory, RunSummary, SyncPipeline, SyncQueue};
use crate::store::LibraryStore;
use crate::task::{HostId, SyncKind, SyncResult, SyncTask};

const RESULT_BUFFER: usize = 256;

/// Entry point for library syncs across hosts
///
/// Keeps at most one run per host. Tasks requested while a run is active join
/// the back of its queue; otherwise a new run starts on the current Tokio runtime.
///
/// ```rust,ignore
/// let service = SyncService::new(store, Arc::new(open_http), SyncConfig::default())?;
/// let mut results = service.subscribe();
/// service.sync(HostId::from("living-room"), vec![SyncTask::full(SyncKind::Movies)])?;
/// while let Ok(result) = results.recv().await {
///     println!("{} {:?}", result.kind, result.status);
/// }
/// ```
pub struct SyncService {
    store: Arc<dyn LibraryStore>,
    connections: Arc<dyn ConnectionFactory>,
    config: SyncConfig,
    runs: Arc<DashMap<HostId, SyncQueue>>,
    results: broadcast::Sender<SyncResult>,
    finished: broadcast::Sender<RunSummary>,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn LibraryStore>,
        connections: Arc<dyn ConnectionFactory>,
        config: SyncConfig,
    ) -> Result<Self> {
        config.validate()?;
        let (results, _) = broadcast::channel(RESULT_BUFFER);
        let (finished, _) = broadcast::channel(RESULT_BUFFER);
        Ok(Self {
            store,
            connections,
            config,
            runs: Arc::new(DashMap::new()),
            results,
            finished,
        })
    }

    /// Results of every task, in completion order per host
    pub fn subscribe(&self) -> broadcast::Receiver<SyncResult> {
        self.results.subscribe()
    }

    /// One summary per finished run
    pub fn subscribe_runs(&self) -> broadcast::Receiver<RunSummary> {
        self.finished.subscribe()
    }

    pub fn store(&self) -> &Arc<dyn LibraryStore> {
        &self.store
    }

    /// Queue `tasks` for `host`, returning the id of the run that will execute them
    pub fn sync(&self, host: HostId, tasks: Vec<SyncTask>) -> Result<Uuid> {
        let runtime = Handle::try_current().map_err(|e| SyncError::NoRuntime(e.to_string()))?;

        let queue = match self.runs.entry(host.clone()) {
            Entry::Occupied(mut entry) => match entry.get().extend(tasks) {
                Ok(()) => {
                    tracing::debug!(%host, run_id = %entry.get().run_id(), "Tasks joined running sync");
                    return Ok(entry.get().run_id());
                }
                Err(tasks) => {
                    let queue = SyncQueue::new(tasks);
                    entry.insert(queue.clone());
                    queue
                }
            },
            Entry::Vacant(entry) => {
                let queue = SyncQueue::new(tasks);
                entry.insert(queue.clone());
                queue
            }
        };

        let run_id = queue.run_id();
        let pipeline = SyncPipeline::new(
            host,
            queue,
            Arc::clone(&self.store),
            self.config.clone(),
            self.results.clone(),
        );
        let connections = Arc::clone(&self.connections);
        let runs = Arc::clone(&self.runs);
        let finished = self.finished.clone();

        runtime.spawn(async move {
            pipeline
                .run(connections.as_ref(), move |summary| {
                    runs.remove_if(&summary.host, |_, queue| queue.run_id() == summary.run_id);
                    let _ = finished.send(summary.clone());
                })
                .await;
        });

        Ok(run_id)
    }

    /// Tasks waiting behind the running one
    pub fn queued(&self, host: &HostId) -> Vec<SyncTask> {
        self.runs.get(host).map(|q| q.queued()).unwrap_or_default()
    }

    pub fn running(&self, host: &HostId) -> Option<SyncTask> {
        self.runs.get(host).and_then(|q| q.running())
    }

    /// Whether a task of `kind` is queued or running for `host`
    pub fn is_pending(&self, host: &HostId, kind: SyncKind) -> bool {
        let Some(queue) = self.runs.get(host) else {
            return false;
        };
        queue.running().map(|t| t.kind) == Some(kind) || queue.queued().iter().any(|t| t.kind == kind)
    }

    pub fn is_syncing(&self, host: &HostId) -> bool {
        self.runs.contains_key(host)
    }
}
