//! Dependent call chains
//!
//! Each derivation runs as its own task and reports exactly one outcome back to
//! the reconciler. A step only starts after the previous one succeeded; the
//! first error abandons the chain.

use mc_api::methods::application::{self, ApplicationProperties};
use mc_api::methods::jsonrpc::Ping;
use mc_api::methods::player::{self, GetActivePlayers, GetItem, PlayerParams};
use mc_api::methods::playlist::{GetItems, GetPlaylists, PlaylistItemsParams};
use mc_api::types::NoParams;
use mc_api::{RemoteClient, Result};

use crate::model::{ApplicationState, PlayerSnapshot, PlayerState, PlaylistSnapshot};

/// Active players, then properties of the first, then its current item
pub(crate) async fn derive_player(client: &RemoteClient) -> Result<PlayerState> {
    let players = client.execute::<GetActivePlayers>(&NoParams).await?;
    let Some(playerid) = players.first().map(|p| p.playerid) else {
        return Ok(PlayerState::Stopped);
    };

    let properties = client
        .execute::<player::GetProperties>(&PlayerParams::properties(playerid))
        .await?;
    let item = client
        .execute::<GetItem>(&PlayerParams::item(playerid))
        .await?
        .item;

    Ok(PlayerState::from_snapshot(PlayerSnapshot {
        players,
        properties,
        item,
    }))
}

pub(crate) async fn fetch_volume(client: &RemoteClient) -> Result<ApplicationState> {
    let props = client
        .execute::<application::GetProperties>(&ApplicationProperties::params())
        .await?;
    Ok(ApplicationState::new(props.volume, props.muted))
}

/// Every playlist, then the items of each one in turn
///
/// Empty playlists are left out of the result.
pub(crate) async fn derive_playlists(client: &RemoteClient) -> Result<Vec<PlaylistSnapshot>> {
    let playlists = client.execute::<GetPlaylists>(&NoParams).await?;

    let mut snapshots = Vec::with_capacity(playlists.len());
    for playlist in playlists {
        let items = client
            .execute::<GetItems>(&PlaylistItemsParams::all(playlist.playlistid))
            .await?
            .items;
        if !items.is_empty() {
            snapshots.push(PlaylistSnapshot {
                playlistid: playlist.playlistid,
                kind: playlist.kind,
                items,
            });
        }
    }

    Ok(snapshots)
}

pub(crate) async fn check_liveness(client: &RemoteClient) -> Result<()> {
    client.execute::<Ping>(&NoParams).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_api::mock::MockTransport;
    use mc_api::TransportError;
    use serde_json::json;
    use std::sync::Arc;

    fn client(mock: &Arc<MockTransport>) -> RemoteClient {
        RemoteClient::new(mock.clone())
    }

    #[tokio::test]
    async fn test_no_active_player_stops_chain() {
        let mock = Arc::new(MockTransport::push());
        mock.respond("Player.GetActivePlayers", json!([]));

        let state = derive_player(&client(&mock)).await.unwrap();
        assert_eq!(state, PlayerState::Stopped);
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_error_abandons_remaining_steps() {
        let mock = Arc::new(MockTransport::push());
        mock.respond("Player.GetActivePlayers", json!([{"playerid": 1, "type": "audio"}]));
        mock.fail("Player.GetProperties", TransportError::Timeout);
        mock.respond("Player.GetItem", json!({"item": {"id": 1, "label": "x"}}));

        let error = derive_player(&client(&mock)).await.unwrap_err();
        assert_eq!(error.code(), TransportError::Timeout.code());
        assert_eq!(mock.call_count("Player.GetItem"), 0);
    }

    #[tokio::test]
    async fn test_full_chain_uses_first_player() {
        let mock = Arc::new(MockTransport::push());
        mock.respond(
            "Player.GetActivePlayers",
            json!([{"playerid": 2, "type": "video"}, {"playerid": 0, "type": "audio"}]),
        );
        mock.respond("Player.GetProperties", json!({"speed": 0}));
        mock.respond("Player.GetItem", json!({"item": {"id": 5, "label": "Heat"}}));

        let state = derive_player(&client(&mock)).await.unwrap();
        assert!(matches!(state, PlayerState::Paused(_)));
        let calls = mock.calls();
        assert_eq!(calls[1].params["playerid"], 2);
        assert_eq!(calls[2].params["playerid"], 2);
    }

    #[tokio::test]
    async fn test_playlists_skip_empty() {
        let mock = Arc::new(MockTransport::push());
        mock.respond(
            "Playlist.GetPlaylists",
            json!([{"playlistid": 0, "type": "audio"}, {"playlistid": 1, "type": "video"}]),
        );
        mock.respond_with("Playlist.GetItems", |params| {
            if params["playlistid"] == 0 {
                Ok(json!({"limits": {"start": 0, "end": 0, "total": 0}}))
            } else {
                Ok(json!({"items": [{"id": 3, "label": "a"}], "limits": {"start": 0, "end": 1, "total": 1}}))
            }
        });

        let playlists = derive_playlists(&client(&mock)).await.unwrap();
        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].playlistid, 1);
        assert_eq!(mock.call_count("Playlist.GetItems"), 2);
    }
}
