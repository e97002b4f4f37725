use serde::{Deserialize, Serialize};

use super::player::ListItem;
use crate::types::{ListLimits, ListLimitsReturned, NoParams};

/// One play queue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaylistInfo {
    pub playlistid: i32,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaylistItemsParams {
    pub playlistid: i32,
    pub properties: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<ListLimits>,
}

impl PlaylistItemsParams {
    pub fn all(playlistid: i32) -> Self {
        Self {
            playlistid,
            properties: ListItem::PROPERTIES,
            limits: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlaylistItems {
    #[serde(default)]
    pub items: Vec<ListItem>,
    #[serde(default)]
    pub limits: ListLimitsReturned,
}

crate::rpc_method! {
    GetPlaylists: Playlist, "Playlist.GetPlaylists", NoParams => Vec<PlaylistInfo>
}

crate::rpc_method! {
    GetItems: Playlist, "Playlist.GetItems", PlaylistItemsParams => PlaylistItems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::RpcMethod;
    use serde_json::json;

    #[test]
    fn test_empty_playlist_omits_items() {
        let items = GetItems::parse_result(json!({"limits": {"start": 0, "end": 0, "total": 0}})).unwrap();
        assert!(items.items.is_empty());
        assert_eq!(items.limits.total, 0);
    }

    #[test]
    fn test_parse_playlists() {
        let lists = GetPlaylists::parse_result(json!([
            {"playlistid": 0, "type": "audio"},
            {"playlistid": 1, "type": "video"}
        ]))
        .unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[1].kind, "video");
    }
}
