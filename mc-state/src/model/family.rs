use mc_api::NotificationCategory;

/// Independently observed state families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateFamily {
    Player,
    Application,
    Playlist,
    Connection,
}

impl StateFamily {
    pub const ALL: [StateFamily; 4] = [
        StateFamily::Player,
        StateFamily::Application,
        StateFamily::Playlist,
        StateFamily::Connection,
    ];

    /// Notification categories that feed this family on a push transport
    pub fn categories(&self) -> &'static [NotificationCategory] {
        match self {
            StateFamily::Player => &[
                NotificationCategory::Player,
                NotificationCategory::System,
                NotificationCategory::Input,
            ],
            StateFamily::Application => &[NotificationCategory::Application],
            StateFamily::Playlist => &[NotificationCategory::Playlist],
            StateFamily::Connection => &[],
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            StateFamily::Player => 0,
            StateFamily::Application => 1,
            StateFamily::Playlist => 2,
            StateFamily::Connection => 3,
        }
    }
}

impl std::fmt::Display for StateFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StateFamily::Player => "player",
            StateFamily::Application => "application",
            StateFamily::Playlist => "playlist",
            StateFamily::Connection => "connection",
        };
        f.write_str(name)
    }
}
