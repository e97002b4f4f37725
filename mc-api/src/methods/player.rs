//! Player methods and the list item shape shared with playlists

use serde::{Deserialize, Serialize};

use super::string_or_null;
use crate::types::{GlobalTime, NoParams};

/// One active player
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivePlayer {
    pub playerid: i32,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Playback properties of one player
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlayerProperties {
    #[serde(default)]
    pub speed: i32,
    #[serde(default)]
    pub shuffled: bool,
    #[serde(default, deserialize_with = "string_or_null")]
    pub repeat: String,
    #[serde(default)]
    pub time: GlobalTime,
    #[serde(default)]
    pub totaltime: GlobalTime,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub playlistid: i32,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl PlayerProperties {
    pub const PROPERTIES: &'static [&'static str] = &[
        "speed",
        "shuffled",
        "repeat",
        "time",
        "totaltime",
        "percentage",
        "position",
        "playlistid",
        "type",
    ];
}

/// A media item as reported by players and playlists
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ListItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default)]
    pub artist: Vec<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub album: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub showtitle: String,
    #[serde(default)]
    pub season: i32,
    #[serde(default)]
    pub episode: i32,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub runtime: i64,
    #[serde(default, deserialize_with = "string_or_null")]
    pub file: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub fanart: String,
}

impl ListItem {
    pub const PROPERTIES: &'static [&'static str] = &[
        "title",
        "artist",
        "album",
        "showtitle",
        "season",
        "episode",
        "duration",
        "runtime",
        "file",
        "thumbnail",
        "fanart",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerParams {
    pub playerid: i32,
    pub properties: &'static [&'static str],
}

impl PlayerParams {
    pub fn properties(playerid: i32) -> Self {
        Self {
            playerid,
            properties: PlayerProperties::PROPERTIES,
        }
    }

    pub fn item(playerid: i32) -> Self {
        Self {
            playerid,
            properties: ListItem::PROPERTIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentItem {
    pub item: ListItem,
}

crate::rpc_method! {
    GetActivePlayers: Player, "Player.GetActivePlayers", NoParams => Vec<ActivePlayer>
}

crate::rpc_method! {
    GetProperties: Player, "Player.GetProperties", PlayerParams => PlayerProperties
}

crate::rpc_method! {
    GetItem: Player, "Player.GetItem", PlayerParams => CurrentItem
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::RpcMethod;
    use serde_json::json;

    #[test]
    fn test_parse_active_players() {
        let players = GetActivePlayers::parse_result(json!([{"playerid": 1, "type": "video"}])).unwrap();
        assert_eq!(players, vec![ActivePlayer { playerid: 1, kind: "video".to_string() }]);

        let none = GetActivePlayers::parse_result(json!([])).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_parse_properties() {
        let props = GetProperties::parse_result(json!({
            "speed": 1,
            "shuffled": false,
            "repeat": "off",
            "time": {"hours": 0, "minutes": 12, "seconds": 3, "milliseconds": 0},
            "percentage": 14.5,
            "type": "video"
        }))
        .unwrap();

        assert_eq!(props.speed, 1);
        assert_eq!(props.repeat, "off");
        assert_eq!(props.time.minutes, 12);
        assert!(props.totaltime.is_zero());
    }

    #[test]
    fn test_parse_item_with_nulls() {
        let current = GetItem::parse_result(json!({
            "item": {"id": 42, "label": "Blade Runner", "type": "movie", "album": null, "artist": []}
        }))
        .unwrap();

        assert_eq!(current.item.id, Some(42));
        assert_eq!(current.item.label, "Blade Runner");
        assert_eq!(current.item.album, "");
    }

    #[test]
    fn test_params_shape() {
        let value = serde_json::to_value(PlayerParams::item(1)).unwrap();
        assert_eq!(value["playerid"], 1);
        assert_eq!(value["properties"][0], "title");
    }
}
