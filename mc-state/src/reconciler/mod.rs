//! The state reconciler
//!
//! One Tokio task per host owns the [`HostState`] and every observer list. The
//! [`StateReconciler`] handle, the notification forwarders, the loop timers and
//! the in-flight call chains all talk to that task through one mailbox, so
//! state is only ever touched from a single place.
//!
//! ```text
//! notifications ─┐
//! loop timers  ──┼─► mailbox ─► actor ─► observers
//! call chains  ──┤                │
//! handle       ──┘                └─► call chains (spawned)
//! ```

mod actor;
mod derive;
mod scheduler;
mod sink;

use std::sync::Arc;

use mc_api::{NotificationCategory, RemoteClient};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::ReconcilerConfig;
use crate::error::{Result, StateError};
use crate::model::{ApplicationState, HostState, PlayerState, PlaylistSnapshot, StateFamily};
use crate::observer::{
    ApplicationObserver, ConnectionObserver, Observer, PlayerObserver, PlaylistObserver,
};

use actor::Actor;
use sink::HostEvent;

/// Origin of a liveness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckOrigin {
    /// Tick of the push-transport ping loop
    PingLoop,
    /// Connection-status observers asked for it
    Direct,
}

pub(crate) enum Msg {
    Register(Observer),
    Unregister(Observer),
    ForceRefresh(StateFamily),
    StopObserving,
    Snapshot(oneshot::Sender<HostState>),
    Status(oneshot::Sender<ReconcilerStatus>),
    Event(HostEvent),
    PlayerDerived {
        epoch: u64,
        recheck: bool,
        outcome: mc_api::Result<PlayerState>,
    },
    VolumeFetched {
        epoch: u64,
        outcome: mc_api::Result<ApplicationState>,
    },
    PlaylistsDerived {
        epoch: u64,
        outcome: mc_api::Result<Vec<PlaylistSnapshot>>,
    },
    Checked {
        epoch: u64,
        origin: CheckOrigin,
        outcome: mc_api::Result<()>,
    },
    Tick {
        epoch: u64,
    },
    Recheck {
        epoch: u64,
    },
    Shutdown,
}

/// Observer counts and loop state, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerStatus {
    listeners: [usize; 4],
    /// Whether the ping or poll loop is running
    pub polling: bool,
    /// Notification categories currently forwarded
    pub subscriptions: Vec<NotificationCategory>,
}

impl ReconcilerStatus {
    pub fn listeners(&self, family: StateFamily) -> usize {
        self.listeners[family.index()]
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.iter().sum()
    }

    pub fn is_subscribed(&self, category: NotificationCategory) -> bool {
        self.subscriptions.contains(&category)
    }
}

/// Handle to a running reconciler
///
/// Dropping the handle shuts the reconciler down. Observer registration is
/// fire-and-forget; callbacks arrive on the reconciler task.
pub struct StateReconciler {
    mailbox: mpsc::UnboundedSender<Msg>,
    task: Option<JoinHandle<()>>,
}

impl StateReconciler {
    /// Spawn a reconciler for the host behind `client`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(client: RemoteClient, config: ReconcilerConfig) -> Result<Self> {
        config.validate()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| StateError::NoRuntime(e.to_string()))?;

        let (mailbox, inbox) = mpsc::unbounded_channel();
        let actor = Actor::new(client, config, mailbox.clone());
        let task = runtime.spawn(actor.run(inbox));

        Ok(Self {
            mailbox,
            task: Some(task),
        })
    }

    fn send(&self, msg: Msg) -> Result<()> {
        self.mailbox.send(msg).map_err(|_| StateError::Closed)
    }

    /// Add an observer to its family
    ///
    /// The observer immediately receives the last-known state, or a fetch is
    /// started if nothing is known yet.
    pub fn register(&self, observer: Observer) -> Result<()> {
        self.send(Msg::Register(observer))
    }

    pub fn register_player(&self, observer: Arc<dyn PlayerObserver>) -> Result<()> {
        self.register(Observer::Player(observer))
    }

    pub fn register_application(&self, observer: Arc<dyn ApplicationObserver>) -> Result<()> {
        self.register(Observer::Application(observer))
    }

    pub fn register_playlist(&self, observer: Arc<dyn PlaylistObserver>) -> Result<()> {
        self.register(Observer::Playlist(observer))
    }

    pub fn register_connection(&self, observer: Arc<dyn ConnectionObserver>) -> Result<()> {
        self.register(Observer::Connection(observer))
    }

    pub fn unregister(&self, observer: Observer) -> Result<()> {
        self.send(Msg::Unregister(observer))
    }

    /// Fetch `family` now and deliver the result even if unchanged
    pub fn force_refresh(&self, family: StateFamily) -> Result<()> {
        self.send(Msg::ForceRefresh(family))
    }

    /// Drop every observer and forget all state
    ///
    /// Player observers get [`PlayerObserver::on_stop_observing`] first.
    pub fn stop_observing(&self) -> Result<()> {
        self.send(Msg::StopObserving)
    }

    /// Copy of the cached host state
    pub async fn snapshot(&self) -> Result<HostState> {
        let (tx, rx) = oneshot::channel();
        self.send(Msg::Snapshot(tx))?;
        rx.await.map_err(|_| StateError::Closed)
    }

    pub async fn status(&self) -> Result<ReconcilerStatus> {
        let (tx, rx) = oneshot::channel();
        self.send(Msg::Status(tx))?;
        rx.await.map_err(|_| StateError::Closed)
    }

    /// Stop the reconciler task and wait for it to finish
    pub async fn shutdown(mut self) {
        let _ = self.mailbox.send(Msg::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for StateReconciler {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.mailbox.send(Msg::Shutdown);
        }
    }
}

impl std::fmt::Debug for StateReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateReconciler")
            .field("running", &!self.mailbox.is_closed())
            .finish()
    }
}
