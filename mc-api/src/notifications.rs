//! Typed decoding of host-pushed notifications
//!
//! Push-capable sessions deliver [`RawNotification`]s. [`Notification::decode`]
//! turns them into typed events, and [`dispatch`] routes each event to the
//! matching [`NotificationSink`] method.

use rpc_client::RawNotification;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::namespace::Namespace;

/// Notification groups a consumer can subscribe to independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationCategory {
    Player,
    System,
    Input,
    Application,
    Playlist,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 5] = [
        NotificationCategory::Player,
        NotificationCategory::System,
        NotificationCategory::Input,
        NotificationCategory::Application,
        NotificationCategory::Playlist,
    ];

    pub fn namespace(&self) -> Namespace {
        match self {
            NotificationCategory::Player => Namespace::Player,
            NotificationCategory::System => Namespace::System,
            NotificationCategory::Input => Namespace::Input,
            NotificationCategory::Application => Namespace::Application,
            NotificationCategory::Playlist => Namespace::Playlist,
        }
    }

    /// Category of a raw method name
    pub fn of(method: &str) -> Option<Self> {
        let namespace = Namespace::of(method)?;
        Self::ALL.into_iter().find(|c| c.namespace() == namespace)
    }
}

/// Player reference carried by player notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct PlayerRef {
    #[serde(default)]
    pub playerid: i32,
    #[serde(default)]
    pub speed: i32,
}

/// Data of a player notification
///
/// The host's payload varies per event; only the player reference is decoded.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlayerEventData {
    #[serde(default)]
    pub player: Option<PlayerRef>,
    #[serde(default)]
    pub item: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct InputRequest {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct VolumeChange {
    pub volume: u8,
    pub muted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
struct PlaylistRef {
    playlistid: i32,
}

/// A decoded notification
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    PropertyChanged(PlayerEventData),
    Play(PlayerEventData),
    Resume(PlayerEventData),
    Pause(PlayerEventData),
    SpeedChanged(PlayerEventData),
    Seek(PlayerEventData),
    Stop(PlayerEventData),
    AvStart(PlayerEventData),
    AvChange(PlayerEventData),
    Quit,
    Restart,
    Sleep,
    InputRequested(InputRequest),
    VolumeChanged(VolumeChange),
    PlaylistCleared { playlistid: i32 },
    PlaylistItemAdded { playlistid: i32 },
    PlaylistItemRemoved { playlistid: i32 },
    /// A method this client does not model
    Unknown(RawNotification),
}

impl Notification {
    /// Decode a raw notification
    ///
    /// Unmodeled methods become [`Notification::Unknown`]. A modeled method with
    /// malformed data is a decode error.
    pub fn decode(raw: &RawNotification) -> Result<Self> {
        let data = raw.params.get("data").cloned().unwrap_or(Value::Null);
        let notification = match raw.method.as_str() {
            "Player.OnPropertyChanged" => Notification::PropertyChanged(player_data("Player.OnPropertyChanged", data)?),
            "Player.OnPlay" => Notification::Play(player_data("Player.OnPlay", data)?),
            "Player.OnResume" => Notification::Resume(player_data("Player.OnResume", data)?),
            "Player.OnPause" => Notification::Pause(player_data("Player.OnPause", data)?),
            "Player.OnSpeedChanged" => Notification::SpeedChanged(player_data("Player.OnSpeedChanged", data)?),
            "Player.OnSeek" => Notification::Seek(player_data("Player.OnSeek", data)?),
            "Player.OnStop" => Notification::Stop(player_data("Player.OnStop", data)?),
            "Player.OnAVStart" => Notification::AvStart(player_data("Player.OnAVStart", data)?),
            "Player.OnAVChange" => Notification::AvChange(player_data("Player.OnAVChange", data)?),
            "System.OnQuit" => Notification::Quit,
            "System.OnRestart" => Notification::Restart,
            "System.OnSleep" => Notification::Sleep,
            "Input.OnInputRequested" => Notification::InputRequested(decode_data("Input.OnInputRequested", data)?),
            "Application.OnVolumeChanged" => Notification::VolumeChanged(decode_data("Application.OnVolumeChanged", data)?),
            "Playlist.OnClear" => Notification::PlaylistCleared {
                playlistid: decode_data::<PlaylistRef>("Playlist.OnClear", data)?.playlistid,
            },
            "Playlist.OnAdd" => Notification::PlaylistItemAdded {
                playlistid: decode_data::<PlaylistRef>("Playlist.OnAdd", data)?.playlistid,
            },
            "Playlist.OnRemove" => Notification::PlaylistItemRemoved {
                playlistid: decode_data::<PlaylistRef>("Playlist.OnRemove", data)?.playlistid,
            },
            _ => Notification::Unknown(raw.clone()),
        };

        Ok(notification)
    }

    pub fn category(&self) -> Option<NotificationCategory> {
        match self {
            Notification::PropertyChanged(_)
            | Notification::Play(_)
            | Notification::Resume(_)
            | Notification::Pause(_)
            | Notification::SpeedChanged(_)
            | Notification::Seek(_)
            | Notification::Stop(_)
            | Notification::AvStart(_)
            | Notification::AvChange(_) => Some(NotificationCategory::Player),
            Notification::Quit | Notification::Restart | Notification::Sleep => {
                Some(NotificationCategory::System)
            }
            Notification::InputRequested(_) => Some(NotificationCategory::Input),
            Notification::VolumeChanged(_) => Some(NotificationCategory::Application),
            Notification::PlaylistCleared { .. }
            | Notification::PlaylistItemAdded { .. }
            | Notification::PlaylistItemRemoved { .. } => Some(NotificationCategory::Playlist),
            Notification::Unknown(raw) => NotificationCategory::of(&raw.method),
        }
    }
}

fn decode_data<T: DeserializeOwned>(method: &'static str, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| ApiError::Decode {
        method,
        message: e.to_string(),
    })
}

fn player_data(method: &'static str, data: Value) -> Result<PlayerEventData> {
    if data.is_null() {
        return Ok(PlayerEventData::default());
    }
    decode_data(method, data)
}

/// Receiver of typed notifications
///
/// One method per event; every method defaults to doing nothing so a sink
/// only implements what it cares about.
pub trait NotificationSink: Send + Sync {
    fn on_property_changed(&self, _data: &PlayerEventData) {}
    fn on_play(&self, _data: &PlayerEventData) {}
    fn on_resume(&self, _data: &PlayerEventData) {}
    fn on_pause(&self, _data: &PlayerEventData) {}
    fn on_speed_changed(&self, _data: &PlayerEventData) {}
    fn on_seek(&self, _data: &PlayerEventData) {}
    fn on_stop(&self, _data: &PlayerEventData) {}
    fn on_av_start(&self, _data: &PlayerEventData) {}
    fn on_av_change(&self, _data: &PlayerEventData) {}
    fn on_quit(&self) {}
    fn on_restart(&self) {}
    fn on_sleep(&self) {}
    fn on_input_requested(&self, _request: &InputRequest) {}
    fn on_volume_changed(&self, _volume: u8, _muted: bool) {}
    fn on_playlist_cleared(&self, _playlistid: i32) {}
    fn on_playlist_item_added(&self, _playlistid: i32) {}
    fn on_playlist_item_removed(&self, _playlistid: i32) {}
}

/// Route one notification to the matching sink method
pub fn dispatch(notification: &Notification, sink: &dyn NotificationSink) {
    match notification {
        Notification::PropertyChanged(data) => sink.on_property_changed(data),
        Notification::Play(data) => sink.on_play(data),
        Notification::Resume(data) => sink.on_resume(data),
        Notification::Pause(data) => sink.on_pause(data),
        Notification::SpeedChanged(data) => sink.on_speed_changed(data),
        Notification::Seek(data) => sink.on_seek(data),
        Notification::Stop(data) => sink.on_stop(data),
        Notification::AvStart(data) => sink.on_av_start(data),
        Notification::AvChange(data) => sink.on_av_change(data),
        Notification::Quit => sink.on_quit(),
        Notification::Restart => sink.on_restart(),
        Notification::Sleep => sink.on_sleep(),
        Notification::InputRequested(request) => sink.on_input_requested(request),
        Notification::VolumeChanged(change) => sink.on_volume_changed(change.volume, change.muted),
        Notification::PlaylistCleared { playlistid } => sink.on_playlist_cleared(*playlistid),
        Notification::PlaylistItemAdded { playlistid } => sink.on_playlist_item_added(*playlistid),
        Notification::PlaylistItemRemoved { playlistid } => sink.on_playlist_item_removed(*playlistid),
        Notification::Unknown(raw) => {
            tracing::trace!(method = %raw.method, "Ignoring unmodeled notification");
        }
    }
}
