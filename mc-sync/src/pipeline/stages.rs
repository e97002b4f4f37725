//! Per-kind fetch and persist algorithms
//!
//! Every remote call runs to completion before the next one starts. A failed call
//! fails the whole task; rows persisted by earlier pages stay in place until the
//! next full sync of the kind deletes them.

use mc_api::methods::audio_library::{ArtistsParams, GetAlbums, GetArtists, GetGenres, GetSongs};
use mc_api::methods::video_library::{
    GetEpisodes, GetMovieDetails, GetMovies, GetMusicVideos, GetSeasons, GetTvShowDetails,
    GetTvShows, MovieDetailsParams, TvShowParams,
};
use mc_api::types::{PagedParams, PropertyParams};
use mc_api::RemoteClient;

use crate::config::SyncConfig;
use crate::cursor::PageCursor;
use crate::error::{Result, SyncError};
use crate::projection::{project_all, Project};
use crate::store::{LibraryStore, Table};
use crate::task::{HostId, SyncKind, SyncTask};

pub(crate) struct TaskContext<'a> {
    pub client: &'a RemoteClient,
    pub store: &'a dyn LibraryStore,
    pub host: &'a HostId,
    pub config: &'a SyncConfig,
}

pub(crate) async fn execute(ctx: &TaskContext<'_>, task: &SyncTask) -> Result<()> {
    match (task.kind, task.entity_id) {
        (SyncKind::Movies, Some(id)) => sync_movie(ctx, id).await,
        (SyncKind::TvShows, Some(id)) => sync_tv_show(ctx, id).await,
        (kind, Some(_)) => Err(SyncError::UnsupportedEntity(kind)),
        (SyncKind::Movies, None) => sync_movies(ctx).await,
        (SyncKind::TvShows, None) => sync_tv_shows(ctx).await,
        (SyncKind::Music, None) => sync_music(ctx).await,
        (SyncKind::MusicVideos, None) => sync_music_videos(ctx).await,
    }
}

async fn sync_movie(ctx: &TaskContext<'_>, movieid: i64) -> Result<()> {
    ctx.store.delete_entity(ctx.host, SyncKind::Movies, movieid)?;
    let result = ctx
        .client
        .execute::<GetMovieDetails>(&MovieDetailsParams::new(movieid))
        .await?;
    ctx.store.insert(ctx.host, &result.moviedetails.rows())?;
    Ok(())
}

async fn sync_movies(ctx: &TaskContext<'_>) -> Result<()> {
    let mut cursor = Some(PageCursor::first(ctx.config.movies_page_size));

    while let Some(page) = cursor {
        let result = ctx
            .client
            .execute::<GetMovies>(&PagedParams::movies(page.limits()))
            .await?;
        if page.is_first() {
            ctx.store.delete_kind(ctx.host, SyncKind::Movies)?;
        }
        ctx.store.insert(ctx.host, &project_all(&result.movies))?;
        tracing::debug!(
            host = %ctx.host,
            offset = page.offset,
            count = result.movies.len(),
            total = result.limits.total,
            "Persisted movies page"
        );
        cursor = page.next(&result.limits);
    }
    Ok(())
}

/// Position in a full TV sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TvStage {
    Shows(PageCursor),
    /// Seasons of the n-th synced show
    Seasons(usize),
    /// Episodes of the n-th synced show
    Episodes(usize),
    Done,
}

async fn sync_tv_shows(ctx: &TaskContext<'_>) -> Result<()> {
    let mut shows: Vec<i64> = Vec::new();
    let mut stage = TvStage::Shows(PageCursor::first(ctx.config.tv_shows_page_size));

    loop {
        stage = match stage {
            TvStage::Shows(page) => {
                let result = ctx
                    .client
                    .execute::<GetTvShows>(&PagedParams::tv_shows(page.limits()))
                    .await?;
                if page.is_first() {
                    ctx.store.delete_kind(ctx.host, SyncKind::TvShows)?;
                }
                ctx.store.insert(ctx.host, &project_all(&result.tvshows))?;
                shows.extend(result.tvshows.iter().map(|show| show.tvshowid));

                match page.next(&result.limits) {
                    Some(next) => TvStage::Shows(next),
                    None => TvStage::Seasons(0),
                }
            }
            TvStage::Seasons(index) => match shows.get(index) {
                Some(&tvshowid) => {
                    sync_seasons(ctx, tvshowid).await?;
                    TvStage::Seasons(index + 1)
                }
                None => TvStage::Episodes(0),
            },
            TvStage::Episodes(index) => match shows.get(index) {
                Some(&tvshowid) => {
                    sync_episodes(ctx, tvshowid).await?;
                    TvStage::Episodes(index + 1)
                }
                None => TvStage::Done,
            },
            TvStage::Done => break,
        };
    }

    tracing::debug!(host = %ctx.host, shows = shows.len(), "TV library synced");
    Ok(())
}

async fn sync_tv_show(ctx: &TaskContext<'_>, tvshowid: i64) -> Result<()> {
    ctx.store.delete_entity(ctx.host, SyncKind::TvShows, tvshowid)?;
    let result = ctx
        .client
        .execute::<GetTvShowDetails>(&TvShowParams::details(tvshowid))
        .await?;
    ctx.store.insert(ctx.host, &result.tvshowdetails.rows())?;
    sync_seasons(ctx, tvshowid).await?;
    sync_episodes(ctx, tvshowid).await
}

/// Persist a show's seasons and correct its watched-episode total
///
/// The show record's own count can lag behind; the per-season counts are authoritative.
async fn sync_seasons(ctx: &TaskContext<'_>, tvshowid: i64) -> Result<()> {
    let result = ctx
        .client
        .execute::<GetSeasons>(&TvShowParams::seasons(tvshowid))
        .await?;
    ctx.store.insert(ctx.host, &project_all(&result.seasons))?;

    let watched: i32 = result.seasons.iter().map(|season| season.watchedepisodes).sum();
    ctx.store.update(
        ctx.host,
        Table::TvShows,
        tvshowid,
        &[("watched_episodes", watched.into())],
    )?;
    Ok(())
}

async fn sync_episodes(ctx: &TaskContext<'_>, tvshowid: i64) -> Result<()> {
    let result = ctx
        .client
        .execute::<GetEpisodes>(&TvShowParams::episodes(tvshowid))
        .await?;
    ctx.store.insert(ctx.host, &project_all(&result.episodes))?;
    Ok(())
}

/// Position in a music sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MusicStage {
    Artists(PageCursor),
    Genres,
    Albums(PageCursor),
    Songs(PageCursor),
    Done,
}

async fn sync_music(ctx: &TaskContext<'_>) -> Result<()> {
    let config = ctx.config;
    let mut stage = MusicStage::Artists(PageCursor::first(config.artists_page_size));

    loop {
        stage = match stage {
            MusicStage::Artists(page) => {
                let result = ctx
                    .client
                    .execute::<GetArtists>(&ArtistsParams::album_artists(page.limits()))
                    .await?;
                if page.is_first() {
                    ctx.store.delete_kind(ctx.host, SyncKind::Music)?;
                }
                ctx.store.insert(ctx.host, &project_all(&result.artists))?;
                page.next(&result.limits)
                    .map_or(MusicStage::Genres, MusicStage::Artists)
            }
            MusicStage::Genres => {
                let result = ctx.client.execute::<GetGenres>(&PropertyParams::genres()).await?;
                ctx.store.insert(ctx.host, &project_all(&result.genres))?;
                MusicStage::Albums(PageCursor::first(config.albums_page_size))
            }
            MusicStage::Albums(page) => {
                let result = ctx
                    .client
                    .execute::<GetAlbums>(&PagedParams::albums(page.limits()))
                    .await?;
                ctx.store.insert(ctx.host, &project_all(&result.albums))?;
                page.next(&result.limits).map_or(
                    MusicStage::Songs(PageCursor::first(config.songs_page_size)),
                    MusicStage::Albums,
                )
            }
            MusicStage::Songs(page) => {
                let result = ctx
                    .client
                    .execute::<GetSongs>(&PagedParams::songs(page.limits()))
                    .await?;
                ctx.store.insert(ctx.host, &project_all(&result.songs))?;
                page.next(&result.limits).map_or(MusicStage::Done, MusicStage::Songs)
            }
            MusicStage::Done => break,
        };
        tracing::trace!(host = %ctx.host, ?stage, "Music sync advanced");
    }
    Ok(())
}

async fn sync_music_videos(ctx: &TaskContext<'_>) -> Result<()> {
    let result = ctx
        .client
        .execute::<GetMusicVideos>(&PropertyParams::music_videos())
        .await?;
    ctx.store.delete_kind(ctx.host, SyncKind::MusicVideos)?;
    ctx.store.insert(ctx.host, &project_all(&result.musicvideos))?;
    Ok(())
}
