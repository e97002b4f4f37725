/// JSON-RPC namespaces exposed by a media-center host
///
/// Every method name is `<Namespace>.<Method>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Protocol-level methods such as `JSONRPC.Ping`
    JsonRpc,

    /// Playback state of the active players
    Player,

    /// Application-wide settings such as volume
    Application,

    /// Play queues
    Playlist,

    /// Movies, shows, seasons, episodes and music videos
    VideoLibrary,

    /// Artists, genres, albums and songs
    AudioLibrary,

    /// Power state of the host
    System,

    /// Remote input
    Input,
}

impl Namespace {
    /// Wire prefix of this namespace
    pub fn name(&self) -> &'static str {
        match self {
            Namespace::JsonRpc => "JSONRPC",
            Namespace::Player => "Player",
            Namespace::Application => "Application",
            Namespace::Playlist => "Playlist",
            Namespace::VideoLibrary => "VideoLibrary",
            Namespace::AudioLibrary => "AudioLibrary",
            Namespace::System => "System",
            Namespace::Input => "Input",
        }
    }

    /// Namespace of a full method name, if known
    pub fn of(method: &str) -> Option<Self> {
        let prefix = method.split('.').next()?;
        [
            Namespace::JsonRpc,
            Namespace::Player,
            Namespace::Application,
            Namespace::Playlist,
            Namespace::VideoLibrary,
            Namespace::AudioLibrary,
            Namespace::System,
            Namespace::Input,
        ]
        .into_iter()
        .find(|ns| ns.name() == prefix)
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_of_method() {
        assert_eq!(Namespace::of("Player.GetItem"), Some(Namespace::Player));
        assert_eq!(Namespace::of("JSONRPC.Ping"), Some(Namespace::JsonRpc));
        assert_eq!(Namespace::of("AudioLibrary.GetSongs"), Some(Namespace::AudioLibrary));
        assert_eq!(Namespace::of("Addons.GetAddons"), None);
    }
}
