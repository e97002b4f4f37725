//! Sync requests and their results

use std::fmt;

use mc_api::ErrorInfo;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of a host whose library rows share one scope in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostId(String);

impl HostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HostId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Catalog kind handled by one sync task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncKind {
    Movies,
    TvShows,
    Music,
    MusicVideos,
}

impl SyncKind {
    pub const ALL: [SyncKind; 4] = [
        SyncKind::Movies,
        SyncKind::TvShows,
        SyncKind::Music,
        SyncKind::MusicVideos,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SyncKind::Movies => "movies",
            SyncKind::TvShows => "tv_shows",
            SyncKind::Music => "music",
            SyncKind::MusicVideos => "music_videos",
        }
    }

    /// Whether one entity of this kind can be synced on its own
    pub fn supports_entity(&self) -> bool {
        matches!(self, SyncKind::Movies | SyncKind::TvShows)
    }
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SyncKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SyncKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown sync kind '{}'", s))
    }
}

/// Caller parameters echoed back untouched in the task's result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyncParams(Map<String, Value>);

impl SyncParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One unit of sync work, consumed once
#[derive(Debug, Clone, PartialEq)]
pub struct SyncTask {
    pub kind: SyncKind,
    /// Remote id of a single entity, `None` for the whole catalog kind
    pub entity_id: Option<i64>,
    pub params: SyncParams,
}

impl SyncTask {
    pub fn full(kind: SyncKind) -> Self {
        Self {
            kind,
            entity_id: None,
            params: SyncParams::default(),
        }
    }

    pub fn movie(movieid: i64) -> Self {
        Self::entity(SyncKind::Movies, movieid)
    }

    pub fn tv_show(tvshowid: i64) -> Self {
        Self::entity(SyncKind::TvShows, tvshowid)
    }

    pub fn entity(kind: SyncKind, id: i64) -> Self {
        Self {
            kind,
            entity_id: Some(id),
            params: SyncParams::default(),
        }
    }

    pub fn with_params(mut self, params: SyncParams) -> Self {
        self.params = params;
        self
    }
}

impl fmt::Display for SyncTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entity_id {
            Some(id) => write!(f, "{} #{}", self.kind, id),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    Success,
    Fail,
}

/// Outcome of one task, broadcast as soon as the task completes
#[derive(Debug, Clone, PartialEq)]
pub struct SyncResult {
    pub host: HostId,
    pub kind: SyncKind,
    pub entity_id: Option<i64>,
    pub params: SyncParams,
    pub status: SyncStatus,
    pub error: Option<ErrorInfo>,
}

impl SyncResult {
    pub fn success(host: HostId, task: SyncTask) -> Self {
        Self {
            host,
            kind: task.kind,
            entity_id: task.entity_id,
            params: task.params,
            status: SyncStatus::Success,
            error: None,
        }
    }

    pub fn failure(host: HostId, task: SyncTask, error: ErrorInfo) -> Self {
        Self {
            host,
            kind: task.kind,
            entity_id: task.entity_id,
            params: task.params,
            status: SyncStatus::Fail,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in SyncKind::ALL {
            assert_eq!(kind.name().parse::<SyncKind>().unwrap(), kind);
        }
        assert!("podcasts".parse::<SyncKind>().is_err());
    }

    #[rstest]
    #[case("movies", SyncKind::Movies, true)]
    #[case("tv_shows", SyncKind::TvShows, true)]
    #[case("music", SyncKind::Music, false)]
    #[case("music_videos", SyncKind::MusicVideos, false)]
    fn test_kind_names_and_entity_support(#[case] name: &str, #[case] kind: SyncKind, #[case] entity: bool) {
        assert_eq!(name.parse::<SyncKind>().unwrap(), kind);
        assert_eq!(kind.supports_entity(), entity);
    }

    #[test]
    fn test_result_echoes_params() {
        let params = SyncParams::new().with("origin", "refresh-button");
        let task = SyncTask::movie(12).with_params(params.clone());
        let result = SyncResult::failure(HostId::from("den"), task, ErrorInfo::new(7, "timed out"));

        assert_eq!(result.params, params);
        assert_eq!(result.entity_id, Some(12));
        assert!(!result.is_success());
    }

    #[test]
    fn test_task_display() {
        assert_eq!(SyncTask::full(SyncKind::Music).to_string(), "music");
        assert_eq!(SyncTask::tv_show(4).to_string(), "tv_shows #4");
    }
}
