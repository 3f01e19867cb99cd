//! 网关端到端流程：真实 WebSocket 帧经内存双工流往返

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use kick_chat::models::{Message, MessageKind};
use kick_chat::{Gateway, LoopState, StopReason, Topic};
use protocol::tungstenite::protocol::Role;
use protocol::tungstenite::Message as WsMessage;
use protocol::{Connection, WebSocketStream};
use serde_json::{json, Value};
use tokio::io::{duplex, DuplexStream};
use tokio::sync::mpsc;
use tokio::time::timeout;

type Server = WebSocketStream<DuplexStream>;

async fn setup() -> (Gateway<DuplexStream>, Server) {
    let (client_io, server_io) = duplex(64 * 1024);
    let client = WebSocketStream::from_raw_socket(client_io, Role::Client, None).await;
    let server = WebSocketStream::from_raw_socket(server_io, Role::Server, None).await;
    (
        Gateway::new(Connection::from_stream(client), Duration::from_secs(60)),
        server,
    )
}

/// 注册一个把收到的消息转发到通道的处理器
fn collect(gateway: &Gateway<DuplexStream>) -> mpsc::UnboundedReceiver<Arc<Message>> {
    let (tx, rx) = mpsc::unbounded_channel();
    gateway.on_message(move |msg| {
        let _ = tx.send(msg);
        async { Ok(()) }
    });
    rx
}

async fn next_json(server: &mut Server) -> Value {
    let frame = timeout(Duration::from_secs(1), server.next())
        .await
        .expect("no frame within timeout")
        .unwrap()
        .unwrap();
    serde_json::from_str(frame.to_text().unwrap()).unwrap()
}

async fn push(server: &mut Server, frame: Value) {
    server.send(WsMessage::Text(frame.to_string())).await.unwrap();
}

fn chat_event(kind: &str, content: &str) -> Value {
    json!({
        "event": "App\\Events\\ChatMessageEvent",
        "channel": "chatrooms.42.v2",
        "data": json!({"type": kind, "content": content}).to_string(),
    })
}

#[tokio::test]
async fn subscribe_and_unsubscribe_frames() {
    let (gateway, mut server) = setup().await;

    assert!(gateway.subscribe(Topic::Chatroom(42)).await.unwrap());
    assert!(!gateway.subscribe(Topic::Chatroom(42)).await.unwrap());
    gateway.unsubscribe(Topic::Chatroom(42)).await.unwrap();

    assert_eq!(
        next_json(&mut server).await,
        json!({"event": "pusher:subscribe", "data": {"auth": "", "channel": "chatrooms.42.v2"}})
    );
    // 重复订阅没有发帧，下一帧直接是退订
    assert_eq!(
        next_json(&mut server).await,
        json!({"event": "pusher:unsubscribe", "data": {"auth": "", "channel": "chatrooms.42.v2"}})
    );
    assert!(gateway.subscriptions().topics().await.is_empty());
}

#[tokio::test]
async fn message_is_dispatched_once_to_every_handler() {
    let (gateway, mut server) = setup().await;
    let mut first = collect(&gateway);
    let mut second = collect(&gateway);
    let _handle = gateway.start().unwrap();

    push(&mut server, json!({"data": "{\"type\":\"message\",\"content\":\"hi\"}"})).await;

    for rx in [&mut first, &mut second] {
        let msg = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert_eq!(msg.content, "hi");
        assert_eq!(msg.kind, MessageKind::Message);
        assert!(timeout(Duration::from_millis(50), rx.recv()).await.is_err());
    }
}

#[tokio::test]
async fn handlers_see_frames_in_arrival_order() {
    let (gateway, mut server) = setup().await;
    let mut rx = collect(&gateway);
    let _handle = gateway.start().unwrap();

    push(&mut server, chat_event("message", "F1")).await;
    push(&mut server, chat_event("reply", "F2")).await;

    let f1 = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
    let f2 = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
    assert_eq!((f1.content.as_str(), f1.is_reply()), ("F1", false));
    assert_eq!((f2.content.as_str(), f2.is_reply()), ("F2", true));
}

#[tokio::test]
async fn malformed_and_unknown_frames_are_skipped() {
    let (gateway, mut server) = setup().await;
    let mut rx = collect(&gateway);
    let _handle = gateway.start().unwrap();

    server.send(WsMessage::Text("{".to_string())).await.unwrap();
    push(&mut server, json!({"event": "App\\Events\\ChatMessageEvent", "data": "not json"})).await;
    push(
        &mut server,
        json!({"event": "App\\Events\\SubscriptionEvent",
               "data": json!({"type": "subscription", "months": 3}).to_string()}),
    )
    .await;
    push(&mut server, chat_event("message", "after the noise")).await;

    let msg = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
    assert_eq!(msg.content, "after the noise");
    assert_eq!(gateway.state(), LoopState::Running);
}

#[tokio::test]
async fn control_events_never_reach_handlers() {
    let (gateway, mut server) = setup().await;
    let mut rx = collect(&gateway);
    let _handle = gateway.start().unwrap();

    push(
        &mut server,
        json!({"event": "pusher:connection_established",
               "data": "{\"socket_id\":\"1.2\",\"activity_timeout\":120}"}),
    )
    .await;
    push(
        &mut server,
        json!({"event": "pusher_internal:subscription_succeeded", "data": "{}", "channel": "chatrooms.42.v2"}),
    )
    .await;
    push(&mut server, json!({"event": "pusher:ping", "data": {}})).await;

    assert_eq!(next_json(&mut server).await, json!({"event": "pusher:pong", "data": {}}));
    assert!(timeout(Duration::from_millis(50), rx.recv()).await.is_err());
}

#[tokio::test]
async fn peer_close_stops_loop_and_blocks_sends() {
    let (gateway, mut server) = setup().await;
    let mut state = gateway.watch_state();
    let handle = gateway.start().unwrap();

    server.close(None).await.unwrap();

    let reason = timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    assert!(matches!(reason, StopReason::Closed));
    state.wait_for(|s| *s == LoopState::Stopped).await.unwrap();

    let err = gateway.subscribe(Topic::Chatroom(42)).await.unwrap_err();
    assert!(err.is_connection_closed());

    // 关闭握手之后服务端收不到任何数据帧
    while let Ok(Some(frame)) = timeout(Duration::from_millis(50), server.next()).await {
        match frame {
            Ok(frame) => assert!(frame.is_close(), "unexpected frame after close: {:?}", frame),
            Err(_) => break,
        }
    }
}

#[tokio::test]
async fn shutdown_cancels_and_closes() {
    let (gateway, mut server) = setup().await;
    let handle = gateway.start().unwrap();

    gateway.shutdown();
    let reason = timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    assert!(matches!(reason, StopReason::Cancelled));

    let frame = timeout(Duration::from_secs(1), server.next()).await.unwrap().unwrap().unwrap();
    assert!(frame.is_close());
    assert!(gateway.subscribe(Topic::Chatroom(1)).await.is_err());
}
