use std::collections::HashMap;
use std::future::Future;

use mc_api::{ErrorInfo, NotificationCategory, RemoteClient, TransportKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::derive;
use super::scheduler::{send_after, LoopMode, PollScheduler};
use super::sink::{spawn_forwarder, HostEvent, MailboxSink};
use super::{Msg, CheckOrigin, ReconcilerStatus};
use crate::config::ReconcilerConfig;
use crate::model::{
    removed_ids, ApplicationState, ConnectionStatus, HostState, PlayerState, PlaylistSnapshot,
    StateFamily,
};
use crate::observer::{
    ApplicationObserver, ConnectionObserver, Observer, ObserverSet, PlayerObserver,
    PlaylistObserver,
};

/// Per-family boolean flags
#[derive(Debug, Default, Clone, Copy)]
struct FamilyFlags([bool; 4]);

impl FamilyFlags {
    fn get(&self, family: StateFamily) -> bool {
        self.0[family.index()]
    }

    fn set(&mut self, family: StateFamily, value: bool) {
        self.0[family.index()] = value;
    }

    /// Read and clear
    fn take(&mut self, family: StateFamily) -> bool {
        std::mem::replace(&mut self.0[family.index()], false)
    }
}

pub(crate) struct Actor {
    client: RemoteClient,
    config: ReconcilerConfig,
    mailbox: mpsc::UnboundedSender<Msg>,
    state: HostState,
    players: ObserverSet<dyn PlayerObserver>,
    applications: ObserverSet<dyn ApplicationObserver>,
    playlists: ObserverSet<dyn PlaylistObserver>,
    connections: ObserverSet<dyn ConnectionObserver>,
    force: FamilyFlags,
    in_flight: FamilyFlags,
    last_application_error: Option<ErrorInfo>,
    last_playlist_error: Option<ErrorInfo>,
    subscriptions: HashMap<NotificationCategory, JoinHandle<()>>,
    scheduler: PollScheduler,
    recheck: Option<JoinHandle<()>>,
    /// Bumped by stop_observing; results of older call chains are discarded
    epoch: u64,
}

impl Actor {
    pub fn new(client: RemoteClient, config: ReconcilerConfig, mailbox: mpsc::UnboundedSender<Msg>) -> Self {
        let scheduler = PollScheduler::new(client.kind());
        Self {
            client,
            config,
            mailbox,
            state: HostState::default(),
            players: ObserverSet::default(),
            applications: ObserverSet::default(),
            playlists: ObserverSet::default(),
            connections: ObserverSet::default(),
            force: FamilyFlags::default(),
            in_flight: FamilyFlags::default(),
            last_application_error: None,
            last_playlist_error: None,
            subscriptions: HashMap::new(),
            scheduler,
            recheck: None,
            epoch: 0,
        }
    }

    pub async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Msg>) {
        tracing::debug!(kind = ?self.client.kind(), "State reconciler started");

        while let Some(msg) = inbox.recv().await {
            if matches!(msg, Msg::Shutdown) {
                break;
            }
            self.handle(msg);
        }

        self.cancel_background();
        tracing::debug!("State reconciler stopped");
    }

    fn handle(&mut self, msg: Msg) {
        match msg {
            Msg::Register(observer) => self.register(observer),
            Msg::Unregister(observer) => self.unregister(observer),
            Msg::ForceRefresh(family) => self.force_refresh(family),
            Msg::StopObserving => self.stop_observing(),
            Msg::Snapshot(reply) => {
                let _ = reply.send(self.state.clone());
            }
            Msg::Status(reply) => {
                let _ = reply.send(self.status());
            }
            Msg::Event(event) => self.on_event(event),
            Msg::PlayerDerived { epoch, recheck, outcome } if epoch == self.epoch => {
                self.on_player_derived(recheck, outcome)
            }
            Msg::VolumeFetched { epoch, outcome } if epoch == self.epoch => self.on_volume_fetched(outcome),
            Msg::PlaylistsDerived { epoch, outcome } if epoch == self.epoch => {
                self.on_playlists_derived(outcome)
            }
            Msg::Checked { epoch, origin, outcome } if epoch == self.epoch => self.on_liveness_checked(origin, outcome),
            Msg::Tick { epoch } if epoch == self.epoch => self.on_tick(),
            Msg::Recheck { epoch } if epoch == self.epoch => {
                self.recheck = None;
                self.force.set(StateFamily::Player, true);
                self.request_player(true);
            }
            Msg::Shutdown => {}
            _ => tracing::trace!("Discarding result from before stop_observing"),
        }
    }

    // Observer management

    fn listener_count(&self, family: StateFamily) -> usize {
        match family {
            StateFamily::Player => self.players.len(),
            StateFamily::Application => self.applications.len(),
            StateFamily::Playlist => self.playlists.len(),
            StateFamily::Connection => self.connections.len(),
        }
    }

    fn has_listeners(&self) -> bool {
        StateFamily::ALL.iter().any(|f| self.listener_count(*f) > 0)
    }

    fn register(&mut self, observer: Observer) {
        let family = observer.family();
        let added = match &observer {
            Observer::Player(o) => self.players.add(o.clone()),
            Observer::Application(o) => self.applications.add(o.clone()),
            Observer::Playlist(o) => self.playlists.add(o.clone()),
            Observer::Connection(o) => self.connections.add(o.clone()),
        };
        if !added {
            tracing::debug!(%family, "Observer already registered");
            return;
        }

        tracing::debug!(%family, count = self.listener_count(family), "Observer registered");
        if self.listener_count(family) == 1 {
            self.subscribe(family);
        }
        self.replay_or_fetch(&observer);
        self.ensure_loop();
    }

    /// Hand the cached value to a new observer only, or fetch if unknown
    fn replay_or_fetch(&mut self, observer: &Observer) {
        match observer {
            Observer::Player(o) => {
                if self.state.player.is_known() {
                    o.on_player_state(&self.state.player);
                } else {
                    self.request_player(false);
                }
            }
            Observer::Application(o) => match self.state.application.volume {
                Some(volume) => o.on_volume_changed(volume, self.state.application.muted),
                None => self.request_volume(),
            },
            Observer::Playlist(o) => match &self.state.playlists {
                Some(playlists) if !playlists.is_empty() => o.on_playlists_available(playlists),
                Some(_) => {}
                None => self.request_playlists(),
            },
            Observer::Connection(o) => {
                if self.state.connection.is_known() {
                    o.on_connection_status(&self.state.connection);
                } else {
                    self.request_liveness_check();
                }
            }
        }
    }

    fn unregister(&mut self, observer: Observer) {
        let family = observer.family();
        let removed = match &observer {
            Observer::Player(o) => self.players.remove(o),
            Observer::Application(o) => self.applications.remove(o),
            Observer::Playlist(o) => self.playlists.remove(o),
            Observer::Connection(o) => self.connections.remove(o),
        };
        if !removed || self.listener_count(family) > 0 {
            return;
        }

        tracing::debug!(%family, "Last observer removed");
        self.unsubscribe(family);
        match family {
            StateFamily::Player => {
                self.state.player = PlayerState::NoResult;
                if let Some(recheck) = self.recheck.take() {
                    recheck.abort();
                }
            }
            StateFamily::Playlist => {
                self.state.playlists = None;
                self.last_playlist_error = None;
            }
            StateFamily::Application | StateFamily::Connection => {}
        }
    }

    fn stop_observing(&mut self) {
        tracing::info!("Stopping observation");
        for observer in self.players.snapshot() {
            observer.on_stop_observing();
        }

        self.players.clear();
        self.applications.clear();
        self.playlists.clear();
        self.connections.clear();
        self.cancel_background();

        self.state.reset();
        self.force = FamilyFlags::default();
        self.in_flight = FamilyFlags::default();
        self.last_application_error = None;
        self.last_playlist_error = None;
        self.epoch += 1;
    }

    fn cancel_background(&mut self) {
        for (_, forwarder) in self.subscriptions.drain() {
            forwarder.abort();
        }
        self.scheduler.stop();
        if let Some(recheck) = self.recheck.take() {
            recheck.abort();
        }
    }

    fn status(&self) -> ReconcilerStatus {
        let mut listeners = [0; 4];
        for family in StateFamily::ALL {
            listeners[family.index()] = self.listener_count(family);
        }
        ReconcilerStatus {
            listeners,
            polling: self.scheduler.is_running(),
            subscriptions: self.subscriptions.keys().copied().collect(),
        }
    }

    // Notification subscriptions

    fn subscribe(&mut self, family: StateFamily) {
        if self.client.kind() != TransportKind::Push {
            return;
        }
        for category in family.categories() {
            if self.subscriptions.contains_key(category) {
                continue;
            }
            let Some(notifications) = self.client.subscribe() else {
                tracing::warn!(?category, "Push transport refused a notification subscription");
                continue;
            };
            let sink = MailboxSink::new(self.mailbox.clone());
            self.subscriptions
                .insert(*category, spawn_forwarder(notifications, *category, sink));
            tracing::debug!(?category, "Subscribed to notifications");
        }
    }

    fn unsubscribe(&mut self, family: StateFamily) {
        for category in family.categories() {
            if let Some(forwarder) = self.subscriptions.remove(category) {
                forwarder.abort();
                tracing::debug!(?category, "Unsubscribed from notifications");
            }
        }
    }

    // Host events

    fn on_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::PlayerChanged => self.request_player(false),
            HostEvent::Quit => {
                for observer in self.players.snapshot() {
                    observer.on_system_quit();
                }
            }
            HostEvent::InputRequested(request) => {
                for observer in self.players.snapshot() {
                    observer.on_input_requested(&request);
                }
            }
            HostEvent::VolumeChanged { volume, muted } => {
                self.state.application = ApplicationState::new(volume, muted);
                for observer in self.applications.snapshot() {
                    observer.on_volume_changed(volume, muted);
                }
            }
            HostEvent::PlaylistCleared(playlistid) => {
                if let Some(playlists) = self.state.playlists.as_mut() {
                    playlists.retain(|p| p.playlistid != playlistid);
                }
                for observer in self.playlists.snapshot() {
                    observer.on_playlist_cleared(playlistid);
                }
            }
            HostEvent::PlaylistChanged => self.request_playlists(),
        }
    }

    fn force_refresh(&mut self, family: StateFamily) {
        self.force.set(family, true);
        match family {
            StateFamily::Player => self.request_player(false),
            StateFamily::Application => self.request_volume(),
            StateFamily::Playlist => self.request_playlists(),
            StateFamily::Connection => self.request_liveness_check(),
        }
    }

    // Call chains

    fn spawn_chain<F, T>(&self, chain: F, into_msg: impl FnOnce(T) -> Msg + Send + 'static)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let mailbox = self.mailbox.clone();
        tokio::spawn(async move {
            let outcome = chain.await;
            let _ = mailbox.send(into_msg(outcome));
        });
    }

    /// Returns false when a chain for `family` is already running
    fn begin(&mut self, family: StateFamily) -> bool {
        if self.in_flight.get(family) {
            tracing::trace!(%family, "Derivation already in flight, dropping trigger");
            return false;
        }
        self.in_flight.set(family, true);
        true
    }

    fn request_player(&mut self, recheck: bool) {
        if !self.begin(StateFamily::Player) {
            return;
        }
        let client = self.client.clone();
        let epoch = self.epoch;
        self.spawn_chain(
            async move { derive::derive_player(&client).await },
            move |outcome| Msg::PlayerDerived { epoch, recheck, outcome },
        );
    }

    fn request_volume(&mut self) {
        if !self.begin(StateFamily::Application) {
            return;
        }
        let client = self.client.clone();
        let epoch = self.epoch;
        self.spawn_chain(
            async move { derive::fetch_volume(&client).await },
            move |outcome| Msg::VolumeFetched { epoch, outcome },
        );
    }

    fn request_playlists(&mut self) {
        if !self.begin(StateFamily::Playlist) {
            return;
        }
        let client = self.client.clone();
        let epoch = self.epoch;
        self.spawn_chain(
            async move { derive::derive_playlists(&client).await },
            move |outcome| Msg::PlaylistsDerived { epoch, outcome },
        );
    }

    fn request_liveness_check(&mut self) {
        if !self.begin(StateFamily::Connection) {
            return;
        }
        self.spawn_liveness_check(CheckOrigin::Direct);
    }

    fn spawn_liveness_check(&self, origin: CheckOrigin) {
        let client = self.client.clone();
        let epoch = self.epoch;
        self.spawn_chain(
            async move { derive::check_liveness(&client).await },
            move |outcome| Msg::Checked { epoch, origin, outcome },
        );
    }

    // Results

    fn on_player_derived(&mut self, recheck: bool, outcome: mc_api::Result<PlayerState>) {
        self.in_flight.set(StateFamily::Player, false);
        let force = self.force.take(StateFamily::Player);
        if self.players.is_empty() {
            return;
        }

        let next = outcome.unwrap_or_else(|e| {
            tracing::warn!("Player state derivation failed: {}", e);
            PlayerState::ConnectionError(e.info())
        });
        self.publish_player(next, force);

        if !recheck
            && self.client.kind() == TransportKind::Push
            && self.state.player.is_playing_at_start()
        {
            tracing::debug!("Playing at 00:00, scheduling a forced re-check");
            if let Some(previous) = self.recheck.take() {
                previous.abort();
            }
            let msg = Msg::Recheck { epoch: self.epoch };
            self.recheck = Some(send_after(self.mailbox.clone(), self.config.playing_recheck_delay, msg));
        }
    }

    fn publish_player(&mut self, next: PlayerState, force: bool) {
        let changed = force || self.state.player.differs_from(&next);
        self.state.player = next;
        if !changed {
            return;
        }
        for observer in self.players.snapshot() {
            observer.on_player_state(&self.state.player);
        }
    }

    fn on_volume_fetched(&mut self, outcome: mc_api::Result<ApplicationState>) {
        self.in_flight.set(StateFamily::Application, false);
        let force = self.force.take(StateFamily::Application);
        if self.applications.is_empty() {
            return;
        }

        match outcome {
            Ok(next) => {
                self.last_application_error = None;
                let changed = force || next != self.state.application;
                self.state.application = next;
                if let (true, Some(volume)) = (changed, next.volume) {
                    for observer in self.applications.snapshot() {
                        observer.on_volume_changed(volume, next.muted);
                    }
                }
            }
            Err(e) => {
                let info = e.info();
                if force || !same_failure(&self.last_application_error, &info) {
                    tracing::warn!("Volume fetch failed: {}", info);
                    for observer in self.applications.snapshot() {
                        observer.on_application_error(&info);
                    }
                }
                self.last_application_error = Some(info);
            }
        }
    }

    fn on_playlists_derived(&mut self, outcome: mc_api::Result<Vec<PlaylistSnapshot>>) {
        self.in_flight.set(StateFamily::Playlist, false);
        let force = self.force.take(StateFamily::Playlist);
        if self.playlists.is_empty() {
            return;
        }

        let next = match outcome {
            Ok(next) => next,
            Err(e) => {
                let info = e.info();
                if force || !same_failure(&self.last_playlist_error, &info) {
                    tracing::warn!("Playlist derivation failed: {}", info);
                    for observer in self.playlists.snapshot() {
                        observer.on_playlist_error(&info);
                    }
                }
                self.last_playlist_error = Some(info);
                return;
            }
        };

        self.last_playlist_error = None;
        let previous = self.state.playlists.take();
        let observers = self.playlists.snapshot();

        if next.is_empty() {
            for playlist in previous.iter().flatten() {
                for observer in &observers {
                    observer.on_playlist_cleared(playlist.playlistid);
                }
            }
        } else if force || previous.as_ref() != Some(&next) {
            for observer in &observers {
                observer.on_playlists_available(&next);
            }
            for playlistid in removed_ids(previous.as_deref().unwrap_or_default(), &next) {
                for observer in &observers {
                    observer.on_playlist_cleared(playlistid);
                }
            }
        }

        self.state.playlists = Some(next);
    }

    fn on_liveness_checked(&mut self, origin: CheckOrigin, outcome: mc_api::Result<()>) {
        if origin == CheckOrigin::Direct {
            self.in_flight.set(StateFamily::Connection, false);
        }
        let force = self.force.take(StateFamily::Connection);

        match outcome {
            Ok(()) => {
                if origin == CheckOrigin::PingLoop {
                    let player_error = self.state.player.is_error();
                    if !self.players.is_empty() && (player_error || !self.state.player.is_known()) {
                        self.request_player(false);
                    }
                    if !self.playlists.is_empty() && player_error {
                        self.request_playlists();
                    }
                }
                self.publish_connection(ConnectionStatus::Success, force);
                if origin == CheckOrigin::PingLoop {
                    self.scheduler
                        .schedule(&self.mailbox, self.config.ping_interval, self.epoch);
                }
            }
            Err(e) => {
                let info = e.info();
                tracing::debug!(?origin, "Liveness check failed: {}", info);
                if origin == CheckOrigin::PingLoop && !self.players.is_empty() {
                    self.publish_player(PlayerState::ConnectionError(info.clone()), false);
                }
                self.publish_connection(ConnectionStatus::Error(info), force);
                if origin == CheckOrigin::PingLoop {
                    self.scheduler
                        .schedule(&self.mailbox, self.config.ping_retry_interval, self.epoch);
                }
            }
        }
    }

    fn publish_connection(&mut self, next: ConnectionStatus, force: bool) {
        let changed = force || self.state.connection.differs_from(&next);
        self.state.connection = next;
        if !changed {
            return;
        }
        for observer in self.connections.snapshot() {
            observer.on_connection_status(&self.state.connection);
        }
    }

    // Loops

    fn ensure_loop(&mut self) {
        let first_tick = match self.scheduler.mode() {
            LoopMode::Ping => self.config.ping_interval,
            LoopMode::Poll => self.config.poll_interval,
        };
        self.scheduler.start(&self.mailbox, first_tick, self.epoch);
    }

    fn on_tick(&mut self) {
        if !self.has_listeners() {
            self.scheduler.stop();
            return;
        }

        match self.scheduler.mode() {
            // Rescheduled when the ping answers
            LoopMode::Ping => self.spawn_liveness_check(CheckOrigin::PingLoop),
            LoopMode::Poll => {
                let tick = self.scheduler.advance();
                if !self.players.is_empty() {
                    self.request_player(false);
                }
                if !self.applications.is_empty() {
                    self.request_volume();
                }
                if !self.playlists.is_empty() && tick % u64::from(self.config.playlist_poll_ticks) == 0 {
                    self.request_playlists();
                }
                if !self.connections.is_empty() {
                    self.request_liveness_check();
                }
                self.scheduler
                    .schedule(&self.mailbox, self.config.poll_interval, self.epoch);
            }
        }
    }
}

fn same_failure(previous: &Option<ErrorInfo>, next: &ErrorInfo) -> bool {
    matches!(previous, Some(p) if p.same_error(next))
}
