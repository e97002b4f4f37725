//! One sync run: a FIFO of tasks executed one at a time over a dedicated connection

mod stages;

use std::collections::VecDeque;
use std::sync::Arc;

use mc_api::{RemoteClient, TransportKind};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::store::LibraryStore;
use crate::task::{HostId, SyncResult, SyncTask};

/// Opens the connection a sync run uses
///
/// A run must not share the reconciler's push session, so each run asks for a
/// fresh request/response connection and drops it when the queue is exhausted.
pub trait ConnectionFactory: Send + Sync {
    fn open(&self, host: &HostId) -> mc_api::Result<RemoteClient>;
}

impl<F> ConnectionFactory for F
where
    F: Fn(&HostId) -> mc_api::Result<RemoteClient> + Send + Sync,
{
    fn open(&self, host: &HostId) -> mc_api::Result<RemoteClient> {
        self(host)
    }
}

#[derive(Debug)]
struct QueueState {
    pending: VecDeque<SyncTask>,
    running: Option<SyncTask>,
    finished: bool,
}

/// Task queue of one run, shared between the run and whoever enqueues into it
#[derive(Debug, Clone)]
pub struct SyncQueue {
    run_id: Uuid,
    state: Arc<Mutex<QueueState>>,
}

impl SyncQueue {
    pub fn new(tasks: impl IntoIterator<Item = SyncTask>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            state: Arc::new(Mutex::new(QueueState {
                pending: tasks.into_iter().collect(),
                running: None,
                finished: false,
            })),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Append to the back of the queue
    ///
    /// Fails, handing the tasks back, once the run has drained its queue and finished.
    pub fn extend(&self, tasks: Vec<SyncTask>) -> Result<(), Vec<SyncTask>> {
        let mut state = self.state.lock();
        if state.finished {
            return Err(tasks);
        }
        state.pending.extend(tasks);
        Ok(())
    }

    pub fn queued(&self) -> Vec<SyncTask> {
        self.state.lock().pending.iter().cloned().collect()
    }

    pub fn running(&self) -> Option<SyncTask> {
        self.state.lock().running.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.state.lock().finished
    }

    /// Dequeue the next task and mark it running; an empty queue finishes the run
    fn start_next(&self) -> Option<SyncTask> {
        let mut state = self.state.lock();
        state.running = None;
        match state.pending.pop_front() {
            Some(task) => {
                state.running = Some(task.clone());
                Some(task)
            }
            None => {
                state.finished = true;
                None
            }
        }
    }
}

/// Counts reported when a run finishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub host: HostId,
    pub run_id: Uuid,
    pub succeeded: usize,
    pub failed: usize,
}

pub struct SyncPipeline {
    host: HostId,
    queue: SyncQueue,
    store: Arc<dyn LibraryStore>,
    config: SyncConfig,
    results: broadcast::Sender<SyncResult>,
}

impl SyncPipeline {
    pub fn new(
        host: HostId,
        queue: SyncQueue,
        store: Arc<dyn LibraryStore>,
        config: SyncConfig,
        results: broadcast::Sender<SyncResult>,
    ) -> Self {
        Self {
            host,
            queue,
            store,
            config,
            results,
        }
    }

    pub fn queue(&self) -> &SyncQueue {
        &self.queue
    }

    /// Execute every queued task in order, then call `on_finished`
    ///
    /// Each task ends in exactly one result on the broadcast channel. A failed
    /// task never stops the tasks behind it.
    pub async fn run<F>(self, connections: &dyn ConnectionFactory, on_finished: F) -> RunSummary
    where
        F: FnOnce(&RunSummary) + Send,
    {
        let run_id = self.queue.run_id();
        tracing::info!(host = %self.host, %run_id, "Sync run started");

        let client = connections.open(&self.host);
        match &client {
            Ok(client) if client.kind() == TransportKind::Push => {
                tracing::warn!(host = %self.host, "Sync run was given a push session");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(host = %self.host, "Could not open sync connection: {}", e),
        }

        let mut summary = RunSummary {
            host: self.host.clone(),
            run_id,
            succeeded: 0,
            failed: 0,
        };

        while let Some(task) = self.queue.start_next() {
            tracing::debug!(host = %self.host, %task, "Sync task started");
            let outcome = match &client {
                Ok(client) => {
                    let ctx = stages::TaskContext {
                        client,
                        store: self.store.as_ref(),
                        host: &self.host,
                        config: &self.config,
                    };
                    stages::execute(&ctx, &task).await
                }
                Err(e) => Err(SyncError::Connection(e.clone())),
            };

            let result = match outcome {
                Ok(()) => {
                    summary.succeeded += 1;
                    tracing::info!(host = %self.host, %task, "Sync task finished");
                    SyncResult::success(self.host.clone(), task)
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(host = %self.host, %task, "Sync task failed: {}", e);
                    SyncResult::failure(self.host.clone(), task, e.info())
                }
            };
            // Nobody listening is fine
            let _ = self.results.send(result);
        }

        drop(client);
        tracing::info!(
            host = %self.host,
            %run_id,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Sync run finished"
        );
        on_finished(&summary);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::SyncKind;

    #[test]
    fn test_queue_fifo_and_finish() {
        let queue = SyncQueue::new([SyncTask::full(SyncKind::Movies)]);
        queue.extend(vec![SyncTask::full(SyncKind::Music)]).unwrap();

        assert_eq!(queue.start_next().map(|t| t.kind), Some(SyncKind::Movies));
        assert_eq!(queue.running().map(|t| t.kind), Some(SyncKind::Movies));
        assert_eq!(queue.queued().len(), 1);

        assert_eq!(queue.start_next().map(|t| t.kind), Some(SyncKind::Music));
        assert_eq!(queue.start_next(), None);
        assert!(queue.is_finished());
        assert!(queue.running().is_none());

        let rejected = queue.extend(vec![SyncTask::full(SyncKind::TvShows)]).unwrap_err();
        assert_eq!(rejected.len(), 1);
    }
}
