//! State model: one tagged value per observed family

mod application;
mod connection;
mod family;
mod player;
mod playlist;

pub use application::ApplicationState;
pub use connection::ConnectionStatus;
pub use family::StateFamily;
pub use player::{PlayerSnapshot, PlayerState};
pub use playlist::{PlaylistSnapshot, PlaylistState};
pub(crate) use playlist::removed_ids;

/// Last-known state of one host
///
/// Everything starts unknown and returns to unknown when observation stops.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HostState {
    pub player: PlayerState,
    pub application: ApplicationState,
    pub playlists: PlaylistState,
    pub connection: ConnectionStatus,
}

impl HostState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
