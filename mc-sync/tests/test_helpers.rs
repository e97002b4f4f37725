//! Scripted library hosts shared by the sync tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use mc_api::mock::MockTransport;
use mc_api::RemoteClient;
use mc_sync::{
    HostId, LibraryStore, MemoryStore, SyncConfig, SyncPipeline, SyncQueue, SyncResult, SyncTask,
};
use serde_json::{json, Value};
use tokio::sync::broadcast;

pub fn host() -> HostId {
    HostId::from("living-room")
}

pub fn connections(
    mock: &Arc<MockTransport>,
) -> impl Fn(&HostId) -> mc_api::Result<RemoteClient> + Send + Sync + 'static {
    let mock = mock.clone();
    move |_host: &HostId| Ok(RemoteClient::new(mock.clone()))
}

/// Run `tasks` through one pipeline over `mock`, collecting every result
pub async fn run_tasks(
    mock: &Arc<MockTransport>,
    store: &Arc<MemoryStore>,
    tasks: Vec<SyncTask>,
) -> Vec<SyncResult> {
    run_tasks_with(mock, store.clone(), SyncConfig::default(), tasks).await
}

pub async fn run_tasks_with(
    mock: &Arc<MockTransport>,
    store: Arc<dyn LibraryStore>,
    config: SyncConfig,
    tasks: Vec<SyncTask>,
) -> Vec<SyncResult> {
    let (results, mut rx) = broadcast::channel(64);
    let pipeline = SyncPipeline::new(host(), SyncQueue::new(tasks), store, config, results);
    pipeline.run(&connections(mock), |_| {}).await;

    let mut collected = Vec::new();
    while let Ok(result) = rx.try_recv() {
        collected.push(result);
    }
    collected
}

/// Offsets requested for `method`, in call order
pub fn requested_offsets(mock: &MockTransport, method: &str) -> Vec<u64> {
    mock.calls()
        .iter()
        .filter(|c| c.method == method)
        .map(|c| c.params["limits"]["start"].as_u64().unwrap_or(0))
        .collect()
}

/// Serve `total` records of `list_key` window by window
pub fn paged(mock: &MockTransport, method: &str, list_key: &'static str, total: u32, record: fn(u32) -> Value) {
    mock.respond_with(method, move |params| {
        let start = params["limits"]["start"].as_u64().unwrap_or(0) as u32;
        let requested_end = params["limits"]["end"].as_u64().unwrap_or(u64::from(total)) as u32;
        let end = requested_end.min(total);
        let records: Vec<Value> = (start..end).map(record).collect();
        Ok(json!({
            list_key: records,
            "limits": {"start": start, "end": end, "total": total}
        }))
    });
}

pub fn movie(n: u32) -> Value {
    json!({
        "movieid": n + 1,
        "title": format!("Movie {}", n + 1),
        "year": 2000,
        "genre": ["Drama"],
        "cast": [{"name": "Lead", "role": "Hero", "order": 0}]
    })
}

pub fn script_movies(mock: &MockTransport, total: u32) {
    paged(mock, "VideoLibrary.GetMovies", "movies", total, movie);
}

/// Shows `1..=count`, each with two seasons of which `watched` episodes are seen
pub fn script_tv(mock: &MockTransport, count: u32) {
    paged(mock, "VideoLibrary.GetTVShows", "tvshows", count, |n| {
        json!({"tvshowid": n + 1, "title": format!("Show {}", n + 1), "watchedepisodes": 0})
    });
    mock.respond_with("VideoLibrary.GetSeasons", |params| {
        let show = params["tvshowid"].as_i64().unwrap_or(0);
        Ok(json!({
            "seasons": [
                {"seasonid": show * 10 + 1, "tvshowid": show, "season": 1, "episode": 5, "watchedepisodes": 3},
                {"seasonid": show * 10 + 2, "tvshowid": show, "season": 2, "episode": 5, "watchedepisodes": 4}
            ],
            "limits": {"start": 0, "end": 2, "total": 2}
        }))
    });
    mock.respond_with("VideoLibrary.GetEpisodes", |params| {
        let show = params["tvshowid"].as_i64().unwrap_or(0);
        let episodes: Vec<Value> = (1..=3)
            .map(|e| json!({"episodeid": show * 100 + e, "tvshowid": show, "season": 1, "episode": e}))
            .collect();
        Ok(json!({"episodes": episodes, "limits": {"start": 0, "end": 3, "total": 3}}))
    });
    mock.respond_with("VideoLibrary.GetTVShowDetails", |params| {
        let show = params["tvshowid"].as_i64().unwrap_or(0);
        Ok(json!({"tvshowdetails": {"tvshowid": show, "title": format!("Show {}", show), "watchedepisodes": 1}}))
    });
}

pub fn script_music(mock: &MockTransport, artists: u32, albums: u32, songs: u32) {
    paged(mock, "AudioLibrary.GetArtists", "artists", artists, |n| {
        json!({"artistid": n + 1, "artist": format!("Artist {}", n + 1)})
    });
    mock.respond(
        "AudioLibrary.GetGenres",
        json!({
            "genres": [{"genreid": 1, "label": "Rock"}, {"genreid": 2, "label": "Jazz"}],
            "limits": {"start": 0, "end": 2, "total": 2}
        }),
    );
    paged(mock, "AudioLibrary.GetAlbums", "albums", albums, |n| {
        json!({"albumid": n + 1, "title": format!("Album {}", n + 1), "artistid": [1], "genreid": [1, 2]})
    });
    paged(mock, "AudioLibrary.GetSongs", "songs", songs, |n| {
        json!({"songid": n + 1, "albumid": 1, "title": format!("Song {}", n + 1), "artistid": [1]})
    });
}

pub fn script_music_videos(mock: &MockTransport, count: u32) {
    let videos: Vec<Value> = (1..=count)
        .map(|n| json!({"musicvideoid": n, "title": format!("Video {}", n), "artist": ["Band"]}))
        .collect();
    mock.respond(
        "VideoLibrary.GetMusicVideos",
        json!({"musicvideos": videos, "limits": {"start": 0, "end": count, "total": count}}),
    );
}

/// Receive `n` results or give up after a second
pub async fn recv_results(rx: &mut broadcast::Receiver<SyncResult>, n: usize) -> Vec<SyncResult> {
    let mut results = Vec::with_capacity(n);
    while results.len() < n {
        match tokio::time::timeout(Duration::from_secs(1), rx.recv()).await {
            Ok(Ok(result)) => results.push(result),
            _ => break,
        }
    }
    results
}
