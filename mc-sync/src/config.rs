//! Page sizes used by the paginated sync stages

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Default: 300
    pub movies_page_size: u32,
    /// Default: 200
    pub tv_shows_page_size: u32,
    /// Default: 300
    pub artists_page_size: u32,
    /// Default: 300
    pub albums_page_size: u32,
    /// Default: 600
    pub songs_page_size: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            movies_page_size: 300,
            tv_shows_page_size: 200,
            artists_page_size: 300,
            albums_page_size: 300,
            songs_page_size: 600,
        }
    }
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Smaller pages for hosts on slow hardware
    pub fn low_memory() -> Self {
        Self {
            movies_page_size: 100,
            tv_shows_page_size: 50,
            artists_page_size: 100,
            albums_page_size: 100,
            songs_page_size: 200,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("movies", self.movies_page_size),
            ("tv shows", self.tv_shows_page_size),
            ("artists", self.artists_page_size),
            ("albums", self.albums_page_size),
            ("songs", self.songs_page_size),
        ];
        for (name, size) in sizes {
            if size == 0 {
                return Err(SyncError::Config(format!(
                    "Page size for {} must be greater than 0",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn with_movies_page_size(mut self, size: u32) -> Self {
        self.movies_page_size = size;
        self
    }

    pub fn with_tv_shows_page_size(mut self, size: u32) -> Self {
        self.tv_shows_page_size = size;
        self
    }

    pub fn with_music_page_sizes(mut self, artists: u32, albums: u32, songs: u32) -> Self {
        self.artists_page_size = artists;
        self.albums_page_size = albums;
        self.songs_page_size = songs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_sizes() {
        let config = SyncConfig::default();
        assert_eq!(config.movies_page_size, 300);
        assert_eq!(config.tv_shows_page_size, 200);
        assert_eq!(config.artists_page_size, 300);
        assert_eq!(config.albums_page_size, 300);
        assert_eq!(config.songs_page_size, 600);
        assert!(config.validate().is_ok());
        assert!(SyncConfig::low_memory().validate().is_ok());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = SyncConfig::default().with_music_page_sizes(300, 0, 600);
        assert!(matches!(config.validate(), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SyncConfig = serde_json::from_str(r#"{"songs_page_size": 1000}"#).unwrap();
        assert_eq!(config.songs_page_size, 1000);
        assert_eq!(config.movies_page_size, 300);
    }
}
