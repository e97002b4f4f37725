//! Recording observers and host scripts shared by the reconciler tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use mc_api::mock::MockTransport;
use mc_api::notifications::InputRequest;
use mc_api::{ErrorInfo, RemoteClient};
use mc_state::{
    ApplicationObserver, ConnectionObserver, ConnectionStatus, PlayerObserver, PlayerState,
    PlaylistObserver, PlaylistSnapshot, ReconcilerConfig, StateReconciler,
};
use parking_lot::Mutex;
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    State(PlayerState),
    Quit,
    Input(String),
    StopObserving,
}

#[derive(Default)]
pub struct PlayerRecorder {
    events: Mutex<Vec<PlayerEvent>>,
}

impl PlayerRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<PlayerEvent> {
        self.events.lock().clone()
    }

    pub fn states(&self) -> Vec<PlayerState> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                PlayerEvent::State(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }
}

impl PlayerObserver for PlayerRecorder {
    fn on_player_state(&self, state: &PlayerState) {
        self.events.lock().push(PlayerEvent::State(state.clone()));
    }

    fn on_system_quit(&self) {
        self.events.lock().push(PlayerEvent::Quit);
    }

    fn on_input_requested(&self, request: &InputRequest) {
        self.events.lock().push(PlayerEvent::Input(request.title.clone()));
    }

    fn on_stop_observing(&self) {
        self.events.lock().push(PlayerEvent::StopObserving);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistEvent {
    Available(Vec<i32>),
    Cleared(i32),
    Error(i32),
}

#[derive(Default)]
pub struct PlaylistRecorder {
    events: Mutex<Vec<PlaylistEvent>>,
}

impl PlaylistRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<PlaylistEvent> {
        self.events.lock().clone()
    }
}

impl PlaylistObserver for PlaylistRecorder {
    fn on_playlists_available(&self, playlists: &[PlaylistSnapshot]) {
        let ids = playlists.iter().map(|p| p.playlistid).collect();
        self.events.lock().push(PlaylistEvent::Available(ids));
    }

    fn on_playlist_cleared(&self, playlistid: i32) {
        self.events.lock().push(PlaylistEvent::Cleared(playlistid));
    }

    fn on_playlist_error(&self, error: &ErrorInfo) {
        self.events.lock().push(PlaylistEvent::Error(error.code));
    }
}

#[derive(Default)]
pub struct VolumeRecorder {
    events: Mutex<Vec<(u8, bool)>>,
}

impl VolumeRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(u8, bool)> {
        self.events.lock().clone()
    }
}

impl ApplicationObserver for VolumeRecorder {
    fn on_volume_changed(&self, volume: u8, muted: bool) {
        self.events.lock().push((volume, muted));
    }
}

#[derive(Default)]
pub struct ConnectionRecorder {
    events: Mutex<Vec<ConnectionStatus>>,
}

impl ConnectionRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ConnectionStatus> {
        self.events.lock().clone()
    }
}

impl ConnectionObserver for ConnectionRecorder {
    fn on_connection_status(&self, status: &ConnectionStatus) {
        self.events.lock().push(status.clone());
    }
}

/// Let every ready task run without moving the paused clock meaningfully
pub async fn settle() {
    for _ in 0..5 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

pub fn reconciler(mock: &Arc<MockTransport>) -> StateReconciler {
    StateReconciler::new(RemoteClient::new(mock.clone()), ReconcilerConfig::default()).unwrap()
}

pub fn script_ping(mock: &MockTransport) {
    mock.respond("JSONRPC.Ping", json!("pong"));
}

pub fn script_stopped(mock: &MockTransport) {
    mock.respond("Player.GetActivePlayers", json!([]));
}

/// One active video player at `speed`, showing item `id` at `seconds` elapsed
pub fn script_player(mock: &MockTransport, speed: i32, id: i64, seconds: u32) {
    mock.respond("Player.GetActivePlayers", json!([{"playerid": 1, "type": "video"}]));
    mock.respond(
        "Player.GetProperties",
        json!({
            "speed": speed,
            "shuffled": false,
            "repeat": "off",
            "time": {"hours": 0, "minutes": 0, "seconds": seconds, "milliseconds": 0},
            "type": "video"
        }),
    );
    mock.respond(
        "Player.GetItem",
        json!({"item": {"id": id, "label": format!("Item {}", id), "type": "movie"}}),
    );
}

/// Playlists `ids` exist; only those in `non_empty` hold an item
pub fn script_playlists(mock: &MockTransport, ids: &[i32], non_empty: &[i32]) {
    let lists: Vec<_> = ids
        .iter()
        .map(|id| json!({"playlistid": id, "type": "video"}))
        .collect();
    mock.respond("Playlist.GetPlaylists", json!(lists));

    let non_empty = non_empty.to_vec();
    mock.respond_with("Playlist.GetItems", move |params| {
        let id = params["playlistid"].as_i64().unwrap_or(-1) as i32;
        if non_empty.contains(&id) {
            Ok(json!({"items": [{"id": 100 + id, "label": "queued"}], "limits": {"start": 0, "end": 1, "total": 1}}))
        } else {
            Ok(json!({"limits": {"start": 0, "end": 0, "total": 0}}))
        }
    });
}
