use mc_api::methods::player::{ActivePlayer, ListItem, PlayerProperties};
use mc_api::ErrorInfo;

/// What the first active player is doing
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub players: Vec<ActivePlayer>,
    pub properties: PlayerProperties,
    pub item: ListItem,
}

impl PlayerSnapshot {
    pub fn playerid(&self) -> Option<i32> {
        self.players.first().map(|p| p.playerid)
    }

    /// Whether the fields observers react to differ
    ///
    /// Progress (time, percentage) is deliberately not compared, it changes on
    /// every poll.
    pub fn differs_from(&self, other: &PlayerSnapshot) -> bool {
        self.properties.speed != other.properties.speed
            || self.properties.shuffled != other.properties.shuffled
            || self.properties.repeat != other.properties.repeat
            || self.item.id != other.item.id
            || self.item.label != other.item.label
    }
}

/// Last player result
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlayerState {
    /// Nothing fetched yet
    #[default]
    NoResult,
    ConnectionError(ErrorInfo),
    Playing(PlayerSnapshot),
    Paused(PlayerSnapshot),
    /// No active player
    Stopped,
}

impl PlayerState {
    /// Classify a snapshot by playback speed
    pub fn from_snapshot(snapshot: PlayerSnapshot) -> Self {
        if snapshot.properties.speed == 0 {
            PlayerState::Paused(snapshot)
        } else {
            PlayerState::Playing(snapshot)
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PlayerState::NoResult)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PlayerState::ConnectionError(_))
    }

    pub fn snapshot(&self) -> Option<&PlayerSnapshot> {
        match self {
            PlayerState::Playing(s) | PlayerState::Paused(s) => Some(s),
            _ => None,
        }
    }

    /// Playing with elapsed time exactly zero
    ///
    /// Hosts report this briefly right after starting a file, before the real
    /// position is known.
    pub fn is_playing_at_start(&self) -> bool {
        matches!(self, PlayerState::Playing(s) if s.properties.time.is_zero())
    }

    /// Whether replacing `self` with `next` is worth telling observers about
    pub fn differs_from(&self, next: &PlayerState) -> bool {
        match (self, next) {
            (PlayerState::Playing(a), PlayerState::Playing(b))
            | (PlayerState::Paused(a), PlayerState::Paused(b)) => a.differs_from(b),
            (PlayerState::ConnectionError(a), PlayerState::ConnectionError(b)) => !a.same_error(b),
            (PlayerState::Stopped, PlayerState::Stopped) => false,
            (PlayerState::NoResult, PlayerState::NoResult) => false,
            _ => true,
        }
    }
}
