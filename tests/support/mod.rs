// Shared primitives for one-time server bootstrapping and WebSocket clients across integration tests.
#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::{
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, OnceLock},
    time::Duration,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Global base URL used by all tests after the server publishes its bound address.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

// Ensure the test server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                arena_server::run(listener).await.expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// WebSocket endpoint of the shared test server.
pub fn ws_url() -> String {
    let base_url = ensure_server();
    format!("{}/ws", base_url.replacen("http://", "ws://", 1))
}

// Wait for URL publication and then wait for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    // Strip the scheme so we can use host:port for raw TCP readiness checks.
    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

// Short random room name; distinct per call.
pub fn unique_room() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("it-{}", &id[..12])
}

pub async fn connect() -> WsClient {
    let (ws, _response) = connect_async(ws_url()).await.expect("websocket connects");
    ws
}

pub async fn send_json(ws: &mut WsClient, value: Value) {
    ws.send(Message::text(value.to_string()))
        .await
        .expect("send succeeds");
}

// Joins a room and returns the assigned player id from the Welcome reply.
pub async fn join(ws: &mut WsClient, room: &str, element: &str, name: &str) -> String {
    send_json(
        ws,
        serde_json::json!({
            "type": "Join",
            "data": { "room": room, "type": element, "name": name }
        }),
    )
    .await;
    let welcome = recv_until(ws, "Welcome", |_| true).await;
    assert_eq!(welcome["data"]["room"], room);
    welcome["data"]["player_id"]
        .as_str()
        .expect("player id is a string")
        .to_string()
}

// Reads until a message of the given type satisfies `pred`, skipping everything else.
pub async fn recv_until(ws: &mut WsClient, kind: &str, pred: impl Fn(&Value) -> bool) -> Value {
    tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            let msg = ws
                .next()
                .await
                .expect("socket open")
                .expect("valid frame");
            let Message::Text(_) = &msg else {
                continue;
            };
            let value: Value =
                serde_json::from_str(msg.to_text().expect("utf-8 text")).expect("valid json");
            if value["type"] == kind && pred(&value) {
                return value;
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {kind}"))
}

pub fn roster_len(value: &Value) -> usize {
    value["data"]["players"].as_array().map_or(0, Vec::len)
}
