//! Relational row sink the sync pipeline persists into
//!
//! Every row is scoped to a host. A full sync of one kind deletes that host's
//! rows of the kind first; a single-entity sync deletes only the rows owned by
//! that entity.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::task::{HostId, SyncKind};

/// Local tables, primary and association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Movies,
    MovieCast,
    TvShows,
    TvShowCast,
    Seasons,
    Episodes,
    Artists,
    Genres,
    Albums,
    AlbumArtists,
    AlbumGenres,
    Songs,
    SongArtists,
    MusicVideos,
}

impl Table {
    pub const ALL: [Table; 14] = [
        Table::Movies,
        Table::MovieCast,
        Table::TvShows,
        Table::TvShowCast,
        Table::Seasons,
        Table::Episodes,
        Table::Artists,
        Table::Genres,
        Table::Albums,
        Table::AlbumArtists,
        Table::AlbumGenres,
        Table::Songs,
        Table::SongArtists,
        Table::MusicVideos,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Movies => "movies",
            Table::MovieCast => "movie_cast",
            Table::TvShows => "tv_shows",
            Table::TvShowCast => "tv_show_cast",
            Table::Seasons => "seasons",
            Table::Episodes => "episodes",
            Table::Artists => "artists",
            Table::Genres => "genres",
            Table::Albums => "albums",
            Table::AlbumArtists => "album_artists",
            Table::AlbumGenres => "album_genres",
            Table::Songs => "songs",
            Table::SongArtists => "song_artists",
            Table::MusicVideos => "music_videos",
        }
    }

    /// Column names in row order; the first is the remote id the row is keyed by
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Movies => &[
                "movie_id", "title", "year", "rating", "runtime", "plot", "tagline", "mpaa",
                "genre", "director", "studio", "imdb_number", "playcount", "file", "thumbnail",
                "fanart",
            ],
            Table::MovieCast => &["movie_id", "name", "role", "cast_order", "thumbnail"],
            Table::TvShows => &[
                "tvshow_id", "title", "year", "rating", "plot", "premiered", "mpaa", "genre",
                "studio", "episode_count", "watched_episodes", "season_count", "playcount",
                "file", "thumbnail", "fanart",
            ],
            Table::TvShowCast => &["tvshow_id", "name", "role", "cast_order", "thumbnail"],
            Table::Seasons => &[
                "season_id", "tvshow_id", "season", "label", "episode_count", "watched_episodes",
                "playcount", "thumbnail", "fanart",
            ],
            Table::Episodes => &[
                "episode_id", "tvshow_id", "season", "episode", "title", "plot", "rating",
                "runtime", "first_aired", "director", "writer", "playcount", "file", "thumbnail",
                "fanart",
            ],
            Table::Artists => &[
                "artist_id", "artist", "description", "genre", "born", "formed", "style", "mood",
                "thumbnail", "fanart",
            ],
            Table::Genres => &["genre_id", "title", "thumbnail"],
            Table::Albums => &[
                "album_id", "title", "display_artist", "genre", "year", "rating", "description",
                "label", "playcount", "thumbnail", "fanart",
            ],
            Table::AlbumArtists => &["album_id", "artist_id"],
            Table::AlbumGenres => &["album_id", "genre_id"],
            Table::Songs => &[
                "song_id", "album_id", "title", "display_artist", "album", "genre", "track",
                "disc", "duration", "year", "rating", "playcount", "file", "thumbnail", "fanart",
            ],
            Table::SongArtists => &["song_id", "artist_id"],
            Table::MusicVideos => &[
                "musicvideo_id", "title", "artist", "album", "genre", "year", "runtime",
                "director", "studio", "plot", "playcount", "file", "thumbnail", "fanart",
            ],
        }
    }

    pub fn key_column(&self) -> &'static str {
        self.columns()[0]
    }

    /// Column holding the id of the entity a single-entity sync rewrites
    pub fn entity_column(&self) -> &'static str {
        match self.kind() {
            SyncKind::Movies => "movie_id",
            SyncKind::TvShows => "tvshow_id",
            SyncKind::Music | SyncKind::MusicVideos => self.key_column(),
        }
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns().iter().position(|c| *c == column)
    }

    /// Catalog kind whose sync owns this table
    pub fn kind(&self) -> SyncKind {
        match self {
            Table::Movies | Table::MovieCast => SyncKind::Movies,
            Table::TvShows | Table::TvShowCast | Table::Seasons | Table::Episodes => SyncKind::TvShows,
            Table::MusicVideos => SyncKind::MusicVideos,
            _ => SyncKind::Music,
        }
    }

    pub fn of_kind(kind: SyncKind) -> impl Iterator<Item = Table> {
        Table::ALL.into_iter().filter(move |t| t.kind() == kind)
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One stored value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Integer(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

/// Values of one row, in the order of its table's columns
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub table: Table,
    pub values: Vec<SqlValue>,
}

impl Row {
    pub fn new(table: Table, values: Vec<SqlValue>) -> Self {
        Self { table, values }
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.table.column_index(column).and_then(|i| self.values.get(i))
    }

    pub fn key(&self) -> Option<i64> {
        self.values.first().and_then(SqlValue::as_i64)
    }

    pub(crate) fn check_shape(&self) -> Result<(), StoreError> {
        let expected = self.table.columns().len();
        if self.values.len() != expected {
            return Err(StoreError::RowShape {
                table: self.table.name(),
                expected,
                actual: self.values.len(),
            });
        }
        Ok(())
    }
}

/// Host-scoped storage of projected catalog rows
///
/// Implementations are called from the sync pipeline's task and must not block
/// for long.
pub trait LibraryStore: Send + Sync {
    /// Delete every row of `kind` for `host`
    fn delete_kind(&self, host: &HostId, kind: SyncKind) -> Result<(), StoreError>;

    /// Delete the rows owned by one entity of `kind`
    fn delete_entity(&self, host: &HostId, kind: SyncKind, id: i64) -> Result<(), StoreError>;

    fn insert(&self, host: &HostId, rows: &[Row]) -> Result<(), StoreError>;

    /// Overwrite `values` of the row keyed by `id`
    fn update(
        &self,
        host: &HostId,
        table: Table,
        id: i64,
        values: &[(&'static str, SqlValue)],
    ) -> Result<(), StoreError>;

    /// Rows of `table` for `host`, in insertion order
    fn rows(&self, host: &HostId, table: Table) -> Result<Vec<Row>, StoreError>;

    fn count(&self, host: &HostId, table: Table) -> Result<usize, StoreError> {
        Ok(self.rows(host, table)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_keyed_by_an_id() {
        for table in Table::ALL {
            assert!(table.key_column().ends_with("_id"), "{}", table);
            assert!(table.column_index(table.entity_column()).is_some(), "{}", table);
        }
    }

    #[test]
    fn test_tables_of_kind() {
        let tv: Vec<_> = Table::of_kind(SyncKind::TvShows).collect();
        assert_eq!(
            tv,
            vec![Table::TvShows, Table::TvShowCast, Table::Seasons, Table::Episodes]
        );
        assert_eq!(Table::of_kind(SyncKind::Music).count(), 7);
        assert_eq!(Table::Episodes.entity_column(), "tvshow_id");
    }

    #[test]
    fn test_row_shape_check() {
        let row = Row::new(Table::AlbumArtists, vec![1i64.into()]);
        assert!(matches!(row.check_shape(), Err(StoreError::RowShape { expected: 2, .. })));

        let row = Row::new(Table::AlbumArtists, vec![1i64.into(), 9i64.into()]);
        assert!(row.check_shape().is_ok());
        assert_eq!(row.get("artist_id"), Some(&SqlValue::Integer(9)));
        assert_eq!(row.key(), Some(1));
    }
}
