//! WebSocket relay tests
//!
//! Connect to `/ws/:username` on the API server and exchange relay frames.
//!
//! Run with: cargo test -p weview-integration-tests --test ws_tests

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{protocol::frame::coding::CloseCode, Error, Message};
use weview_integration_tests::{next_json, TestServer, WsClient};

const WAIT: Duration = Duration::from_secs(5);

async fn send(socket: &mut WsClient, frame: serde_json::Value) {
    socket.send(Message::Text(frame.to_string())).await.unwrap();
}

/// Wait until the server has subscribed `socket` to its topic by
/// relaying a frame to ourselves
async fn await_subscribed(socket: &mut WsClient, owner: &str) {
    send(
        socket,
        json!({"destination": "friend-login", "target": owner, "username": owner}),
    )
    .await;
    let echo = next_json(socket, WAIT).await.unwrap();
    assert_eq!(echo, json!({"event": "login", "username": owner}));
}

#[tokio::test]
async fn test_invite_reaches_target() {
    let server = TestServer::start().await.unwrap();

    let mut bob = server.connect_ws("bob").await.unwrap();
    await_subscribed(&mut bob, "bob").await;

    let mut alice = server.connect_ws("alice").await.unwrap();
    send(&mut alice, json!({"destination": "invite", "target": "bob"})).await;

    let event = next_json(&mut bob, WAIT).await.unwrap();
    assert_eq!(event, json!({"event": "invite", "username": "alice"}));

    send(&mut bob, json!({"destination": "accept", "target": "alice"})).await;
    // alice's socket is subscribed once it has processed her own frame
    let event = next_json(&mut alice, WAIT).await.unwrap();
    assert_eq!(event, json!({"event": "acceptInvite", "username": "bob"}));
}

/// Discard frames already queued on `socket`
async fn drain(socket: &mut WsClient) {
    while let Ok(Some(_)) = tokio::time::timeout(Duration::from_millis(200), socket.next()).await {}
}

#[tokio::test]
async fn test_events_fan_out_to_every_connection() {
    let server = TestServer::start().await.unwrap();

    let mut first = server.connect_ws("bob").await.unwrap();
    let mut second = server.connect_ws("bob").await.unwrap();
    await_subscribed(&mut first, "bob").await;
    await_subscribed(&mut second, "bob").await;
    // each self-relay may also have reached the other connection
    drain(&mut first).await;
    drain(&mut second).await;

    let mut alice = server.connect_ws("alice").await.unwrap();
    send(&mut alice, json!({"destination": "friend-logout", "target": "bob"})).await;

    for socket in [&mut first, &mut second] {
        let event = next_json(socket, WAIT).await.unwrap();
        assert_eq!(event, json!({"event": "logout", "username": "alice"}));
    }
}

#[tokio::test]
async fn test_invalid_target_keeps_connection() {
    let server = TestServer::start().await.unwrap();
    let mut bob = server.connect_ws("bob").await.unwrap();

    send(&mut bob, json!({"destination": "invite", "target": "bad/name"})).await;
    let reply = next_json(&mut bob, WAIT).await.unwrap();
    assert_eq!(reply["error"]["code"], "VALIDATION_ERROR");

    // still open and subscribed
    await_subscribed(&mut bob, "bob").await;
}

#[tokio::test]
async fn test_malformed_frame_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut bob = server.connect_ws("bob").await.unwrap();

    bob.send(Message::Text("not json".to_string())).await.unwrap();

    let code = loop {
        match tokio::time::timeout(WAIT, bob.next()).await.unwrap() {
            Some(Ok(Message::Close(Some(frame)))) => break frame.code,
            Some(Ok(_)) => {}
            other => panic!("expected close frame, got {other:?}"),
        }
    };
    assert_eq!(code, CloseCode::from(4002));
}

#[tokio::test]
async fn test_invalid_username_rejected_before_upgrade() {
    let server = TestServer::start().await.unwrap();
    let url = format!("ws://{}/ws/bad:name", server.addr);

    match connect_async(url).await {
        Err(Error::Http(response)) => assert_eq!(response.status().as_u16(), 400),
        Err(e) => panic!("expected HTTP 400, got {e}"),
        Ok(_) => panic!("upgrade should be rejected"),
    }
}
