//! Video library methods
//!
//! Record types carry every property the library sync persists. Fields the host
//! omits or sends as `null` fall back to their defaults.

use serde::{Deserialize, Serialize};

use super::string_or_null;
use crate::types::{ListLimits, ListLimitsReturned, PagedParams, PropertyParams};

/// One cast member of a movie or show
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CastMember {
    #[serde(default, deserialize_with = "string_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub role: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MovieDetails {
    pub movieid: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub runtime: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub plot: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub tagline: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub mpaa: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub director: Vec<String>,
    #[serde(default)]
    pub studio: Vec<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub imdbnumber: String,
    #[serde(default)]
    pub playcount: i32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub file: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub fanart: String,
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

impl MovieDetails {
    pub const PROPERTIES: &'static [&'static str] = &[
        "title", "year", "rating", "runtime", "plot", "tagline", "mpaa", "genre", "director",
        "studio", "imdbnumber", "playcount", "file", "thumbnail", "fanart", "cast",
    ];
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TvShowDetails {
    pub tvshowid: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub plot: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub premiered: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub mpaa: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub studio: Vec<String>,
    /// Number of episodes
    #[serde(default)]
    pub episode: i32,
    #[serde(default)]
    pub watchedepisodes: i32,
    /// Number of seasons
    #[serde(default)]
    pub season: i32,
    #[serde(default)]
    pub playcount: i32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub file: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub fanart: String,
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

impl TvShowDetails {
    pub const PROPERTIES: &'static [&'static str] = &[
        "title", "year", "rating", "plot", "premiered", "mpaa", "genre", "studio", "episode",
        "watchedepisodes", "season", "playcount", "file", "thumbnail", "fanart", "cast",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SeasonDetails {
    pub seasonid: i64,
    #[serde(default)]
    pub season: i32,
    #[serde(default)]
    pub tvshowid: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub showtitle: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub label: String,
    #[serde(default)]
    pub episode: i32,
    #[serde(default)]
    pub watchedepisodes: i32,
    #[serde(default)]
    pub playcount: i32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub fanart: String,
}

impl SeasonDetails {
    pub const PROPERTIES: &'static [&'static str] = &[
        "season", "tvshowid", "showtitle", "episode", "watchedepisodes", "playcount",
        "thumbnail", "fanart",
    ];
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EpisodeDetails {
    pub episodeid: i64,
    #[serde(default)]
    pub tvshowid: i64,
    #[serde(default)]
    pub season: i32,
    #[serde(default)]
    pub episode: i32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub showtitle: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub plot: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub runtime: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub firstaired: String,
    #[serde(default)]
    pub director: Vec<String>,
    #[serde(default)]
    pub writer: Vec<String>,
    #[serde(default)]
    pub playcount: i32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub file: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub fanart: String,
}

impl EpisodeDetails {
    pub const PROPERTIES: &'static [&'static str] = &[
        "tvshowid", "season", "episode", "title", "showtitle", "plot", "rating", "runtime",
        "firstaired", "director", "writer", "playcount", "file", "thumbnail", "fanart",
    ];
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MusicVideoDetails {
    pub musicvideoid: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default)]
    pub artist: Vec<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub album: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub runtime: i64,
    #[serde(default)]
    pub director: Vec<String>,
    #[serde(default)]
    pub studio: Vec<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub plot: String,
    #[serde(default)]
    pub playcount: i32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub file: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub fanart: String,
}

impl MusicVideoDetails {
    pub const PROPERTIES: &'static [&'static str] = &[
        "title", "artist", "album", "genre", "year", "runtime", "director", "studio", "plot",
        "playcount", "file", "thumbnail", "fanart",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MovieDetailsParams {
    pub movieid: i64,
    pub properties: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TvShowParams {
    pub tvshowid: i64,
    pub properties: &'static [&'static str],
}

impl PagedParams {
    pub fn movies(limits: ListLimits) -> Self {
        Self {
            properties: MovieDetails::PROPERTIES,
            limits: Some(limits),
        }
    }

    pub fn tv_shows(limits: ListLimits) -> Self {
        Self {
            properties: TvShowDetails::PROPERTIES,
            limits: Some(limits),
        }
    }
}

impl TvShowParams {
    pub fn details(tvshowid: i64) -> Self {
        Self {
            tvshowid,
            properties: TvShowDetails::PROPERTIES,
        }
    }

    pub fn seasons(tvshowid: i64) -> Self {
        Self {
            tvshowid,
            properties: SeasonDetails::PROPERTIES,
        }
    }

    pub fn episodes(tvshowid: i64) -> Self {
        Self {
            tvshowid,
            properties: EpisodeDetails::PROPERTIES,
        }
    }
}

impl MovieDetailsParams {
    pub fn new(movieid: i64) -> Self {
        Self {
            movieid,
            properties: MovieDetails::PROPERTIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MoviesPage {
    #[serde(default)]
    pub movies: Vec<MovieDetails>,
    #[serde(default)]
    pub limits: ListLimitsReturned,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetailsResult {
    pub moviedetails: MovieDetails,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TvShowsPage {
    #[serde(default)]
    pub tvshows: Vec<TvShowDetails>,
    #[serde(default)]
    pub limits: ListLimitsReturned,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TvShowDetailsResult {
    pub tvshowdetails: TvShowDetails,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SeasonsResult {
    #[serde(default)]
    pub seasons: Vec<SeasonDetails>,
    #[serde(default)]
    pub limits: ListLimitsReturned,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EpisodesResult {
    #[serde(default)]
    pub episodes: Vec<EpisodeDetails>,
    #[serde(default)]
    pub limits: ListLimitsReturned,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MusicVideosResult {
    #[serde(default)]
    pub musicvideos: Vec<MusicVideoDetails>,
    #[serde(default)]
    pub limits: ListLimitsReturned,
}

crate::rpc_method! {
    GetMovies: VideoLibrary, "VideoLibrary.GetMovies", PagedParams => MoviesPage
}

crate::rpc_method! {
    GetMovieDetails: VideoLibrary, "VideoLibrary.GetMovieDetails", MovieDetailsParams => MovieDetailsResult
}

crate::rpc_method! {
    GetTvShows: VideoLibrary, "VideoLibrary.GetTVShows", PagedParams => TvShowsPage
}

crate::rpc_method! {
    GetTvShowDetails: VideoLibrary, "VideoLibrary.GetTVShowDetails", TvShowParams => TvShowDetailsResult
}

crate::rpc_method! {
    GetSeasons: VideoLibrary, "VideoLibrary.GetSeasons", TvShowParams => SeasonsResult
}

crate::rpc_method! {
    GetEpisodes: VideoLibrary, "VideoLibrary.GetEpisodes", TvShowParams => EpisodesResult
}

crate::rpc_method! {
    /// Music videos are fetched in one unpaged call
    GetMusicVideos: VideoLibrary, "VideoLibrary.GetMusicVideos", PropertyParams => MusicVideosResult
}

impl PropertyParams {
    pub fn music_videos() -> Self {
        Self {
            properties: MusicVideoDetails::PROPERTIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::RpcMethod;
    use serde_json::json;

    #[test]
    fn test_parse_movies_page() {
        let page = GetMovies::parse_result(json!({
            "movies": [{
                "movieid": 7,
                "label": "Alien",
                "title": "Alien",
                "year": 1979,
                "genre": ["Horror", "Science Fiction"],
                "cast": [{"name": "Sigourney Weaver", "role": "Ripley", "order": 0}]
            }],
            "limits": {"start": 0, "end": 1, "total": 1}
        }))
        .unwrap();

        assert_eq!(page.movies.len(), 1);
        assert_eq!(page.movies[0].genre.len(), 2);
        assert_eq!(page.movies[0].cast[0].role, "Ripley");
        assert!(!page.limits.more_available());
    }

    #[test]
    fn test_empty_library_page() {
        let page = GetTvShows::parse_result(json!({"limits": {"start": 0, "end": 0, "total": 0}})).unwrap();
        assert!(page.tvshows.is_empty());
    }

    #[test]
    fn test_movie_details_requires_id() {
        let result = GetMovieDetails::parse_result(json!({"moviedetails": {"title": "No id"}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_paged_params_for_movies() {
        let value = serde_json::to_value(PagedParams::movies(ListLimits::page(0, 300))).unwrap();
        assert_eq!(value["limits"]["end"], 300);
        assert!(value["properties"].as_array().unwrap().iter().any(|p| p == "cast"));
    }
}
