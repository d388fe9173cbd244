//! WsTransport against an in-process WebSocket server.

use futures_util::{SinkExt, StreamExt};
use parlor_client::WsTransport;
use protocol::{ClientEvent, UserType};
use widget::{
    ChatMessage, MemoryStore, Renderer, Sender, SessionController, SessionStarter, SessionState,
    Transport, TransportEvent, WidgetConfig, WidgetEvent,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn next_event(rx: &mut UnboundedReceiver<WidgetEvent>) -> WidgetEvent {
    timeout(TIMEOUT, rx.recv()).await.unwrap().unwrap()
}

fn join(chat_id: &str) -> ClientEvent {
    ClientEvent::Join {
        chat_id: chat_id.into(),
        user_type: UserType::Visitor,
    }
}

struct Headless;

impl Renderer for Headless {
    fn show(&mut self) {}
    fn hide(&mut self) {}
    fn show_form(&mut self) {}
    fn show_conversation(&mut self, _transcript: &[ChatMessage]) {}
    fn append_message(&mut self, _message: &ChatMessage) {}
    fn replace_transcript(&mut self, _transcript: &[ChatMessage]) {}
    fn show_error(&mut self, _message: &str) {}
}

struct NoStart;

impl SessionStarter for NoStart {
    fn start(&mut self, _request: protocol::StartChatRequest) {}
}

/// Verify WsTransport is Send (required for async usage).
#[test]
fn transport_is_send() {
    fn assert_send<T: Send>() {}
    let _: fn() = assert_send::<WsTransport>;
}

#[test]
fn emit_before_connect_fails() {
    let (tx, _rx) = unbounded_channel();
    let mut transport = WsTransport::new("ws://127.0.0.1:9/ws", Duration::from_millis(10), None, tx);
    let err = transport.emit(join("x"));
    assert!(err.is_err());
    assert!(!transport.is_open());
}

#[tokio::test]
async fn exchanges_events_with_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        let Some(Ok(Message::Text(join))) = ws.next().await else {
            panic!("expected join frame");
        };
        let join: serde_json::Value = serde_json::from_str(join.as_str()).unwrap();
        assert_eq!(join["event"], "join");
        assert_eq!(join["data"]["chat_id"], "abc123");

        let history = r#"{"event":"chat_history","data":{"messages":[{"text":"hi","sender":"agent"}]}}"#;
        ws.send(Message::Text(history.into())).await.unwrap();
        ws.send(Message::Text(r#"{"event":"new_chat","data":{}}"#.into()))
            .await
            .unwrap();
        ws.send(Message::Text(
            r#"{"event":"message","data":{"text":"welcome back","sender":"agent"}}"#.into(),
        ))
        .await
        .unwrap();
        ws.close(None).await.unwrap();
    });

    let (tx, mut rx) = unbounded_channel();
    let mut transport = WsTransport::new(
        format!("ws://{addr}/ws"),
        Duration::from_secs(60),
        Some(0),
        tx,
    );
    transport.connect(join("abc123"));
    assert!(transport.is_open());

    assert_eq!(next_event(&mut rx).await, TransportEvent::Connected.into());

    assert_eq!(
        next_event(&mut rx).await,
        TransportEvent::History(vec![ChatMessage::new("hi", Sender::Agent)]).into()
    );
    assert_eq!(
        next_event(&mut rx).await,
        TransportEvent::Message(ChatMessage::new("welcome back", Sender::Agent)).into()
    );
    assert_eq!(next_event(&mut rx).await, TransportEvent::Disconnected.into());

    server.await.unwrap();
}

#[tokio::test]
async fn reconnects_after_drop() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.close(None).await.unwrap();

        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let mut frames = Vec::new();
        for _ in 0..2 {
            let Some(Ok(Message::Text(frame))) = ws.next().await else {
                panic!("expected frame");
            };
            frames.push(frame.as_str().to_owned());
        }
        frames
    });

    let (tx, mut rx) = unbounded_channel();
    let mut transport =
        WsTransport::new(format!("ws://{addr}/ws"), Duration::from_millis(50), None, tx);
    transport.connect(join("abc123"));

    assert_eq!(next_event(&mut rx).await, TransportEvent::Connected.into());
    assert_eq!(next_event(&mut rx).await, TransportEvent::Disconnected.into());
    transport
        .emit(ClientEvent::Message {
            chat_id: "abc123".into(),
            message: "still there?".into(),
            sender: Sender::Visitor,
        })
        .unwrap();
    assert_eq!(next_event(&mut rx).await, TransportEvent::Connected.into());

    let frames = timeout(TIMEOUT, server).await.unwrap().unwrap();
    let rejoin: serde_json::Value = serde_json::from_str(&frames[0]).unwrap();
    assert_eq!(rejoin["event"], "join");
    assert_eq!(rejoin["data"]["chat_id"], "abc123");
    let value: serde_json::Value = serde_json::from_str(&frames[1]).unwrap();
    assert_eq!(value["event"], "message");
    assert_eq!(value["data"]["message"], "still there?");

    transport.disconnect();
    assert!(!transport.is_open());
}

#[tokio::test]
async fn refused_connection_reports_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (tx, mut rx) = unbounded_channel();
    let mut transport =
        WsTransport::new(format!("ws://{addr}/ws"), Duration::from_millis(10), Some(0), tx);
    transport.connect(join("abc123"));

    assert!(matches!(
        next_event(&mut rx).await,
        WidgetEvent::Transport(TransportEvent::Error(_))
    ));
}

#[tokio::test]
async fn controller_joins_before_early_message() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let mut frames = Vec::new();
        for _ in 0..2 {
            let Some(Ok(Message::Text(frame))) = ws.next().await else {
                panic!("expected frame");
            };
            let value: serde_json::Value = serde_json::from_str(frame.as_str()).unwrap();
            frames.push(value);
        }
        frames
    });

    let config = WidgetConfig::default();
    let store = MemoryStore::with_entry(config.storage_key.clone(), "abc123");
    let (tx, mut rx) = unbounded_channel();
    let transport = WsTransport::new(format!("ws://{addr}/ws"), Duration::from_secs(60), None, tx);
    let mut controller = SessionController::new(config, Headless, store, transport, NoStart);

    controller.initialize();
    assert_eq!(controller.state(), SessionState::Connecting);
    assert!(controller.send_message("hello before connect"));

    let event = next_event(&mut rx).await;
    assert_eq!(event, TransportEvent::Connected.into());
    controller.handle(event).unwrap();
    assert_eq!(controller.state(), SessionState::Active);

    let frames = timeout(TIMEOUT, server).await.unwrap().unwrap();
    assert_eq!(frames[0]["event"], "join");
    assert_eq!(frames[0]["data"]["chat_id"], "abc123");
    assert_eq!(frames[1]["event"], "message");
    assert_eq!(frames[1]["data"]["message"], "hello before connect");

    controller.shutdown();
}
