//! Observers that print every state change to stdout

use mc_sdk::api::notifications::InputRequest;
use mc_sdk::api::types::GlobalTime;
use mc_sdk::api::ErrorInfo;
use mc_sdk::state::{
    ApplicationObserver, ConnectionObserver, ConnectionStatus, PlayerObserver, PlayerSnapshot,
    PlayerState, PlaylistObserver, PlaylistSnapshot,
};

pub struct ConsolePrinter {
    host: String,
}

impl ConsolePrinter {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    fn print(&self, line: String) {
        println!("[{}] {}", self.host, line);
    }
}

fn clock(time: &GlobalTime) -> String {
    if time.hours > 0 {
        format!("{}:{:02}:{:02}", time.hours, time.minutes, time.seconds)
    } else {
        format!("{}:{:02}", time.minutes, time.seconds)
    }
}

fn now_playing(snapshot: &PlayerSnapshot) -> String {
    let item = &snapshot.item;
    let title = if item.title.is_empty() { &item.label } else { &item.title };
    let by = if !item.showtitle.is_empty() {
        format!(" ({} S{:02}E{:02})", item.showtitle, item.season, item.episode)
    } else if !item.artist.is_empty() {
        format!(" by {}", item.artist.join(", "))
    } else {
        String::new()
    };
    format!(
        "{}{} [{} / {}]",
        title,
        by,
        clock(&snapshot.properties.time),
        clock(&snapshot.properties.totaltime)
    )
}

pub fn describe_player(state: &PlayerState) -> String {
    match state {
        PlayerState::NoResult => "player: unknown".to_string(),
        PlayerState::ConnectionError(e) => format!("player: error {}", e),
        PlayerState::Playing(s) => format!("playing: {}", now_playing(s)),
        PlayerState::Paused(s) => format!("paused: {}", now_playing(s)),
        PlayerState::Stopped => "stopped".to_string(),
    }
}

pub fn describe_connection(status: &ConnectionStatus) -> String {
    match status {
        ConnectionStatus::NoResult => "connection: unknown".to_string(),
        ConnectionStatus::Success => "connection: ok".to_string(),
        ConnectionStatus::Error(e) => format!("connection: lost {}", e),
    }
}

impl PlayerObserver for ConsolePrinter {
    fn on_player_state(&self, state: &PlayerState) {
        self.print(describe_player(state));
    }

    fn on_system_quit(&self) {
        self.print("host is shutting down".to_string());
    }

    fn on_input_requested(&self, request: &InputRequest) {
        self.print(format!("host asks for input: {}", request.title));
    }

    fn on_stop_observing(&self) {
        self.print("stopped observing".to_string());
    }
}

impl ApplicationObserver for ConsolePrinter {
    fn on_volume_changed(&self, volume: u8, muted: bool) {
        let suffix = if muted { " (muted)" } else { "" };
        self.print(format!("volume: {}{}", volume, suffix));
    }

    fn on_application_error(&self, error: &ErrorInfo) {
        self.print(format!("volume: error {}", error));
    }
}

impl PlaylistObserver for ConsolePrinter {
    fn on_playlists_available(&self, playlists: &[PlaylistSnapshot]) {
        for playlist in playlists {
            self.print(format!(
                "playlist {} ({}): {} item(s)",
                playlist.playlistid,
                playlist.kind,
                playlist.items.len()
            ));
        }
    }

    fn on_playlist_cleared(&self, playlistid: i32) {
        self.print(format!("playlist {} cleared", playlistid));
    }

    fn on_playlist_error(&self, error: &ErrorInfo) {
        self.print(format!("playlists: error {}", error));
    }
}

impl ConnectionObserver for ConsolePrinter {
    fn on_connection_status(&self, status: &ConnectionStatus) {
        self.print(describe_connection(status));
    }
}
