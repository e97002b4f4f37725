use serde::{Deserialize, Serialize};

use super::string_or_null;
use crate::types::{ListLimits, ListLimitsReturned, PagedParams, PropertyParams};

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ArtistDetails {
    pub artistid: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub artist: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub born: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub formed: String,
    #[serde(default)]
    pub style: Vec<String>,
    #[serde(default)]
    pub mood: Vec<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub fanart: String,
}

impl ArtistDetails {
    pub const PROPERTIES: &'static [&'static str] = &[
        "description", "genre", "born", "formed", "style", "mood", "thumbnail", "fanart",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct GenreDetails {
    pub genreid: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub label: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
}

impl GenreDetails {
    pub const PROPERTIES: &'static [&'static str] = &["title", "thumbnail"];
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AlbumDetails {
    pub albumid: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub displayartist: String,
    #[serde(default)]
    pub artistid: Vec<i64>,
    #[serde(default)]
    pub genreid: Vec<i64>,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub albumlabel: String,
    #[serde(default)]
    pub playcount: i32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub fanart: String,
}

impl AlbumDetails {
    pub const PROPERTIES: &'static [&'static str] = &[
        "title", "displayartist", "artistid", "genreid", "genre", "year", "rating",
        "description", "albumlabel", "playcount", "thumbnail", "fanart",
    ];
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SongDetails {
    pub songid: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub displayartist: String,
    #[serde(default)]
    pub artistid: Vec<i64>,
    #[serde(default)]
    pub albumid: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub album: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub track: i32,
    #[serde(default)]
    pub disc: i32,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub playcount: i32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub file: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub fanart: String,
}

impl SongDetails {
    pub const PROPERTIES: &'static [&'static str] = &[
        "title", "displayartist", "artistid", "albumid", "album", "genre", "track", "disc",
        "duration", "year", "rating", "playcount", "file", "thumbnail", "fanart",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArtistsParams {
    /// Restrict to artists credited on albums
    pub albumartistsonly: bool,
    pub properties: &'static [&'static str],
    pub limits: ListLimits,
}

impl ArtistsParams {
    pub fn album_artists(limits: ListLimits) -> Self {
        Self {
            albumartistsonly: true,
            properties: ArtistDetails::PROPERTIES,
            limits,
        }
    }
}

impl PagedParams {
    pub fn albums(limits: ListLimits) -> Self {
        Self {
            properties: AlbumDetails::PROPERTIES,
            limits: Some(limits),
        }
    }

    pub fn songs(limits: ListLimits) -> Self {
        Self {
            properties: SongDetails::PROPERTIES,
            limits: Some(limits),
        }
    }
}

impl PropertyParams {
    pub fn genres() -> Self {
        Self {
            properties: GenreDetails::PROPERTIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ArtistsPage {
    #[serde(default)]
    pub artists: Vec<ArtistDetails>,
    #[serde(default)]
    pub limits: ListLimitsReturned,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct GenresResult {
    #[serde(default)]
    pub genres: Vec<GenreDetails>,
    #[serde(default)]
    pub limits: ListLimitsReturned,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AlbumsPage {
    #[serde(default)]
    pub albums: Vec<AlbumDetails>,
    #[serde(default)]
    pub limits: ListLimitsReturned,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SongsPage {
    #[serde(default)]
    pub songs: Vec<SongDetails>,
    #[serde(default)]
    pub limits: ListLimitsReturned,
}

crate::rpc_method! {
    GetArtists: AudioLibrary, "AudioLibrary.GetArtists", ArtistsParams => ArtistsPage
}

crate::rpc_method! {
    GetGenres: AudioLibrary, "AudioLibrary.GetGenres", PropertyParams => GenresResult
}

crate::rpc_method! {
    GetAlbums: AudioLibrary, "AudioLibrary.GetAlbums", PagedParams => AlbumsPage
}

crate::rpc_method! {
    GetSongs: AudioLibrary, "AudioLibrary.GetSongs", PagedParams => SongsPage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::RpcMethod;
    use serde_json::json;

    #[test]
    fn test_artists_params_request_album_artists() {
        let value = serde_json::to_value(ArtistsParams::album_artists(ListLimits::page(0, 300))).unwrap();
        assert_eq!(value["albumartistsonly"], true);
        assert_eq!(value["limits"]["start"], 0);
    }

    #[test]
    fn test_parse_album_associations() {
        let page = GetAlbums::parse_result(json!({
            "albums": [{"albumid": 3, "title": "Kid A", "artistid": [1], "genreid": [4, 9]}],
            "limits": {"start": 0, "end": 1, "total": 1}
        }))
        .unwrap();

        assert_eq!(page.albums[0].artistid, vec![1]);
        assert_eq!(page.albums[0].genreid, vec![4, 9]);
    }

    #[test]
    fn test_parse_genres_unpaged() {
        let genres = GetGenres::parse_result(json!({
            "genres": [{"genreid": 1, "label": "Rock", "title": "Rock"}]
        }))
        .unwrap();
        assert_eq!(genres.genres[0].title, "Rock");
        assert_eq!(genres.limits, ListLimitsReturned::default());
    }
}
