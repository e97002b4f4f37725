//! Bridge from the transport's notification stream to the reconciler mailbox

use mc_api::notifications::{InputRequest, PlayerEventData};
use mc_api::{dispatch, Notification, NotificationCategory, NotificationSink, RawNotification};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::Msg;

/// Notification turned into a reconciler input
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HostEvent {
    /// Anything that may change what the player is doing
    PlayerChanged,
    Quit,
    InputRequested(InputRequest),
    VolumeChanged { volume: u8, muted: bool },
    PlaylistCleared(i32),
    PlaylistChanged,
}

/// Sink that posts every relevant notification to the mailbox
pub(crate) struct MailboxSink {
    mailbox: mpsc::UnboundedSender<Msg>,
}

impl MailboxSink {
    pub fn new(mailbox: mpsc::UnboundedSender<Msg>) -> Self {
        Self { mailbox }
    }

    fn post(&self, event: HostEvent) {
        // Closed mailbox means the reconciler is gone
        let _ = self.mailbox.send(Msg::Event(event));
    }
}

impl NotificationSink for MailboxSink {
    fn on_property_changed(&self, _data: &PlayerEventData) {
        self.post(HostEvent::PlayerChanged);
    }

    fn on_play(&self, _data: &PlayerEventData) {
        self.post(HostEvent::PlayerChanged);
    }

    fn on_resume(&self, _data: &PlayerEventData) {
        self.post(HostEvent::PlayerChanged);
    }

    fn on_pause(&self, _data: &PlayerEventData) {
        self.post(HostEvent::PlayerChanged);
    }

    fn on_speed_changed(&self, _data: &PlayerEventData) {
        self.post(HostEvent::PlayerChanged);
    }

    fn on_seek(&self, _data: &PlayerEventData) {
        self.post(HostEvent::PlayerChanged);
    }

    fn on_stop(&self, _data: &PlayerEventData) {
        self.post(HostEvent::PlayerChanged);
    }

    fn on_av_start(&self, _data: &PlayerEventData) {
        self.post(HostEvent::PlayerChanged);
    }

    // AV-change fires for stream switches mid-playback and is ignored

    fn on_quit(&self) {
        self.post(HostEvent::Quit);
    }

    fn on_restart(&self) {
        self.post(HostEvent::Quit);
    }

    fn on_sleep(&self) {
        self.post(HostEvent::Quit);
    }

    fn on_input_requested(&self, request: &InputRequest) {
        self.post(HostEvent::InputRequested(request.clone()));
    }

    fn on_volume_changed(&self, volume: u8, muted: bool) {
        self.post(HostEvent::VolumeChanged { volume, muted });
    }

    fn on_playlist_cleared(&self, playlistid: i32) {
        self.post(HostEvent::PlaylistCleared(playlistid));
    }

    fn on_playlist_item_added(&self, _playlistid: i32) {
        self.post(HostEvent::PlaylistChanged);
    }

    fn on_playlist_item_removed(&self, _playlistid: i32) {
        self.post(HostEvent::PlaylistChanged);
    }
}

/// Forward one category of notifications until aborted or the session ends
pub(crate) fn spawn_forwarder(
    mut notifications: broadcast::Receiver<RawNotification>,
    category: NotificationCategory,
    sink: MailboxSink,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let raw = match notifications.recv().await {
                Ok(raw) => raw,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(?category, skipped, "Notification forwarder lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            if NotificationCategory::of(&raw.method) != Some(category) {
                continue;
            }

            match Notification::decode(&raw) {
                Ok(notification) => dispatch(&notification, &sink),
                Err(e) => tracing::warn!(method = %raw.method, "Dropping notification: {}", e),
            }
        }
        tracing::debug!(?category, "Notification stream closed");
    })
}
