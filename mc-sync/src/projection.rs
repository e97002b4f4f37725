//! Catalog records to relational rows
//!
//! Each record becomes its primary row followed by its association rows.
//! Multi-valued text fields are stored joined with `" / "`.

use mc_api::methods::audio_library::{AlbumDetails, ArtistDetails, GenreDetails, SongDetails};
use mc_api::methods::video_library::{
    CastMember, EpisodeDetails, MovieDetails, MusicVideoDetails, SeasonDetails, TvShowDetails,
};

use crate::store::{Row, SqlValue, Table};

const LIST_SEPARATOR: &str = " / ";

/// Relational form of one fetched record
pub trait Project {
    fn rows(&self) -> Vec<Row>;
}

/// Rows of every record in `records`, in order
pub fn project_all<T: Project>(records: &[T]) -> Vec<Row> {
    records.iter().flat_map(Project::rows).collect()
}

fn joined(values: &[String]) -> SqlValue {
    SqlValue::Text(values.join(LIST_SEPARATOR))
}

fn text(value: &str) -> SqlValue {
    SqlValue::from(value)
}

fn cast_rows(table: Table, owner: i64, cast: &[CastMember]) -> impl Iterator<Item = Row> + '_ {
    cast.iter().map(move |member| {
        Row::new(
            table,
            vec![
                owner.into(),
                text(&member.name),
                text(&member.role),
                member.order.into(),
                text(&member.thumbnail),
            ],
        )
    })
}

impl Project for MovieDetails {
    fn rows(&self) -> Vec<Row> {
        let primary = Row::new(
            Table::Movies,
            vec![
                self.movieid.into(),
                text(&self.title),
                self.year.into(),
                self.rating.into(),
                self.runtime.into(),
                text(&self.plot),
                text(&self.tagline),
                text(&self.mpaa),
                joined(&self.genre),
                joined(&self.director),
                joined(&self.studio),
                text(&self.imdbnumber),
                self.playcount.into(),
                text(&self.file),
                text(&self.thumbnail),
                text(&self.fanart),
            ],
        );
        std::iter::once(primary)
            .chain(cast_rows(Table::MovieCast, self.movieid, &self.cast))
            .collect()
    }
}

impl Project for TvShowDetails {
    fn rows(&self) -> Vec<Row> {
        let primary = Row::new(
            Table::TvShows,
            vec![
                self.tvshowid.into(),
                text(&self.title),
                self.year.into(),
                self.rating.into(),
                text(&self.plot),
                text(&self.premiered),
                text(&self.mpaa),
                joined(&self.genre),
                joined(&self.studio),
                self.episode.into(),
                self.watchedepisodes.into(),
                self.season.into(),
                self.playcount.into(),
                text(&self.file),
                text(&self.thumbnail),
                text(&self.fanart),
            ],
        );
        std::iter::once(primary)
            .chain(cast_rows(Table::TvShowCast, self.tvshowid, &self.cast))
            .collect()
    }
}

impl Project for SeasonDetails {
    fn rows(&self) -> Vec<Row> {
        vec![Row::new(
            Table::Seasons,
            vec![
                self.seasonid.into(),
                self.tvshowid.into(),
                self.season.into(),
                text(&self.label),
                self.episode.into(),
                self.watchedepisodes.into(),
                self.playcount.into(),
                text(&self.thumbnail),
                text(&self.fanart),
            ],
        )]
    }
}

impl Project for EpisodeDetails {
    fn rows(&self) -> Vec<Row> {
        vec![Row::new(
            Table::Episodes,
            vec![
                self.episodeid.into(),
                self.tvshowid.into(),
                self.season.into(),
                self.episode.into(),
                text(&self.title),
                text(&self.plot),
                self.rating.into(),
                self.runtime.into(),
                text(&self.firstaired),
                joined(&self.director),
                joined(&self.writer),
                self.playcount.into(),
                text(&self.file),
                text(&self.thumbnail),
                text(&self.fanart),
            ],
        )]
    }
}

impl Project for ArtistDetails {
    fn rows(&self) -> Vec<Row> {
        vec![Row::new(
            Table::Artists,
            vec![
                self.artistid.into(),
                text(&self.artist),
                text(&self.description),
                joined(&self.genre),
                text(&self.born),
                text(&self.formed),
                joined(&self.style),
                joined(&self.mood),
                text(&self.thumbnail),
                text(&self.fanart),
            ],
        )]
    }
}

impl Project for GenreDetails {
    fn rows(&self) -> Vec<Row> {
        let title = if self.title.is_empty() { &self.label } else { &self.title };
        vec![Row::new(
            Table::Genres,
            vec![self.genreid.into(), text(title), text(&self.thumbnail)],
        )]
    }
}

impl Project for AlbumDetails {
    fn rows(&self) -> Vec<Row> {
        let primary = Row::new(
            Table::Albums,
            vec![
                self.albumid.into(),
                text(&self.title),
                text(&self.displayartist),
                joined(&self.genre),
                self.year.into(),
                self.rating.into(),
                text(&self.description),
                text(&self.albumlabel),
                self.playcount.into(),
                text(&self.thumbnail),
                text(&self.fanart),
            ],
        );
        let artists = self
            .artistid
            .iter()
            .map(|artist| Row::new(Table::AlbumArtists, vec![self.albumid.into(), (*artist).into()]));
        let genres = self
            .genreid
            .iter()
            .map(|genre| Row::new(Table::AlbumGenres, vec![self.albumid.into(), (*genre).into()]));

        std::iter::once(primary).chain(artists).chain(genres).collect()
    }
}

impl Project for SongDetails {
    fn rows(&self) -> Vec<Row> {
        let primary = Row::new(
            Table::Songs,
            vec![
                self.songid.into(),
                self.albumid.into(),
                text(&self.title),
                text(&self.displayartist),
                text(&self.album),
                joined(&self.genre),
                self.track.into(),
                self.disc.into(),
                self.duration.into(),
                self.year.into(),
                self.rating.into(),
                self.playcount.into(),
                text(&self.file),
                text(&self.thumbnail),
                text(&self.fanart),
            ],
        );
        let artists = self
            .artistid
            .iter()
            .map(|artist| Row::new(Table::SongArtists, vec![self.songid.into(), (*artist).into()]));

        std::iter::once(primary).chain(artists).collect()
    }
}

impl Project for MusicVideoDetails {
    fn rows(&self) -> Vec<Row> {
        vec![Row::new(
            Table::MusicVideos,
            vec![
                self.musicvideoid.into(),
                text(&self.title),
                joined(&self.artist),
                text(&self.album),
                joined(&self.genre),
                self.year.into(),
                self.runtime.into(),
                joined(&self.director),
                joined(&self.studio),
                text(&self.plot),
                self.playcount.into(),
                text(&self.file),
                text(&self.thumbnail),
                text(&self.fanart),
            ],
        )]
    }
}
