//! Typed calls and notifications over a real TCP session against a scripted host

use std::sync::Arc;
use std::time::Duration;

use mc_api::methods::application::{ApplicationProperties, GetProperties};
use mc_api::methods::player::GetActivePlayers;
use mc_api::types::NoParams;
use mc_api::{Notification, RemoteClient, TcpTransport, TransportKind};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Minimal host: answers each request by method name and pushes one
/// volume notification before the first answer
async fn spawn_host() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];
        let mut pushed = false;

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buffer.extend_from_slice(&chunk[..n]);

            let mut consumed = 0;
            let mut requests = Vec::new();
            {
                let mut stream = serde_json::Deserializer::from_slice(&buffer).into_iter::<Value>();
                while let Some(Ok(value)) = stream.next() {
                    requests.push(value);
                    consumed = stream.byte_offset();
                }
            }
            buffer.drain(..consumed);

            for request in requests {
                if !pushed {
                    let notification = json!({
                        "jsonrpc": "2.0",
                        "method": "Application.OnVolumeChanged",
                        "params": {"sender": "xbmc", "data": {"volume": 20, "muted": true}}
                    });
                    socket.write_all(notification.to_string().as_bytes()).await.unwrap();
                    pushed = true;
                }

                let result = match request["method"].as_str().unwrap() {
                    "Player.GetActivePlayers" => json!([]),
                    "Application.GetProperties" => json!({"volume": 20, "muted": true}),
                    _ => json!(null),
                };
                let response = json!({"jsonrpc": "2.0", "id": request["id"], "result": result});
                socket.write_all(response.to_string().as_bytes()).await.unwrap();
            }
        }
    });

    port
}

#[tokio::test]
async fn test_typed_calls_over_tcp() {
    let port = spawn_host().await;
    let transport = TcpTransport::connect("127.0.0.1", port, Duration::from_secs(5))
        .await
        .unwrap();
    let client = RemoteClient::new(Arc::new(transport));
    assert_eq!(client.kind(), TransportKind::Push);

    let mut notifications = client.subscribe().unwrap();

    let players = client.execute::<GetActivePlayers>(&NoParams).await.unwrap();
    assert!(players.is_empty());

    let props = client
        .execute::<GetProperties>(&ApplicationProperties::params())
        .await
        .unwrap();
    assert_eq!(props, ApplicationProperties { volume: 20, muted: true });

    let raw = notifications.recv().await.unwrap();
    match Notification::decode(&raw).unwrap() {
        Notification::VolumeChanged(change) => {
            assert_eq!(change.volume, 20);
            assert!(change.muted);
        }
        other => panic!("Expected volume change, got {:?}", other),
    }
}
