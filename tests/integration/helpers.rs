//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use futures::{SinkExt, StreamExt};
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use uuid::Uuid;

use tweet_api::app::{self, Repositories};
use tweet_core::config::AppConfig;
use tweet_database::MemoryStore;
use tweet_realtime::{ChannelGateway, MemoryChannel, NotifierEngine};

/// WebSocket client used by the tests.
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for something that should happen.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// How long a test waits before concluding that nothing arrives.
pub const SILENCE_WINDOW: Duration = Duration::from_millis(400);

/// Config used by all test processes.
pub fn test_config(echo_to_sender: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.realtime.echo_to_sender = echo_to_sender;
    config.broker.reconnect_delay_ms = 50;
    config
}

/// A running notifier process on an ephemeral port.
pub struct TestNotifier {
    pub addr: std::net::SocketAddr,
    pub engine: NotifierEngine,
    pub channel: MemoryChannel,
    shutdown: CancellationToken,
}

impl TestNotifier {
    /// Starts a notifier consuming from a fresh in-memory channel.
    pub async fn start(echo_to_sender: bool) -> Self {
        Self::start_with_channel(echo_to_sender, MemoryChannel::default()).await
    }

    /// Starts a notifier consuming from `channel`.
    pub async fn start_with_channel(echo_to_sender: bool, channel: MemoryChannel) -> Self {
        let config = test_config(echo_to_sender);
        let (router, engine) = app::notifier_app(&config, Arc::new(channel.clone()))
            .await
            .expect("Failed to start notifier engine");

        let listener = app::bind("127.0.0.1:0").await.expect("Failed to bind");
        let addr = listener.local_addr().expect("No local address");

        let shutdown = CancellationToken::new();
        tokio::spawn(app::serve("notifier", listener, router, shutdown.clone()));

        Self {
            addr,
            engine,
            channel,
            shutdown,
        }
    }

    /// WebSocket URL of the notifier.
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.engine.connections.connection_count()
    }

    /// Opens a client and waits until the server has registered it.
    pub async fn connect(&self) -> WsClient {
        let before = self.connection_count();
        let (client, _) = connect_async(self.ws_url())
            .await
            .expect("WebSocket handshake failed");
        self.wait_for_connections(before + 1).await;
        client
    }

    /// Waits until exactly `expected` connections are registered.
    pub async fn wait_for_connections(&self, expected: usize) {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        while self.connection_count() != expected {
            assert!(
                tokio::time::Instant::now() < deadline,
                "Expected {expected} connections, have {}",
                self.connection_count()
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Publishes a payload as if it came from the durable channel.
    pub async fn publish(&self, payload: &str) {
        self.channel
            .publish(payload)
            .await
            .expect("Memory channel publish failed");
    }

    /// Stops the engine, then the HTTP server.
    pub async fn stop(self) {
        self.engine.shutdown().await.expect("Engine shutdown failed");
        self.shutdown.cancel();
    }
}

/// Writer API router over an in-memory store with one seeded post.
pub struct TestApi {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub post_id: Uuid,
}

/// Response captured from the API router.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApi {
    /// Builds the writer API publishing through `gateway`.
    pub fn new(gateway: Arc<dyn ChannelGateway>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let post_id = Uuid::new_v4();
        store.add_post(post_id);

        let repos = Repositories::in_memory(store.clone());
        let router = app::api_app(&repos, gateway);

        Self {
            router,
            store,
            post_id,
        }
    }

    /// Sends a request with an optional acting user and JSON body.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(user) = user {
            builder = builder.header("X-User-Id", user.to_string());
        }

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Posts a comment on the seeded post.
    pub async fn comment(&self, user: Uuid, content: &str) -> TestResponse {
        self.request(
            "POST",
            &format!("/v1/posts/{}/comments", self.post_id),
            Some(user),
            Some(serde_json::json!({ "content": content })),
        )
        .await
    }
}

/// Reads the next text frame, or `None` if nothing arrives within `wait`.
pub async fn recv_text_within(client: &mut WsClient, wait: Duration) -> Option<String> {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        match tokio::time::timeout(remaining, client.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => return Some(text.as_str().to_owned()),
            Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => continue,
            _ => return None,
        }
    }
}

/// Reads the next text frame, failing the test if none arrives.
pub async fn recv_text(client: &mut WsClient) -> String {
    recv_text_within(client, RECV_TIMEOUT)
        .await
        .expect("Expected a text frame")
}

/// Asserts that no text frame arrives for a short while.
pub async fn assert_silent(client: &mut WsClient) {
    if let Some(text) = recv_text_within(client, SILENCE_WINDOW).await {
        panic!("Expected no message, received {text:?}");
    }
}

/// Sends a text frame.
pub async fn send_text(client: &mut WsClient, text: &str) {
    client
        .send(Message::text(text))
        .await
        .expect("Failed to send text frame");
}

/// Log output captured by a thread-scoped subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Routes this thread's log events into a buffer until the guard drops.
    ///
    /// Tests using it must run on the current-thread runtime so every event
    /// is emitted on the thread that installed the subscriber.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    /// Everything logged so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines containing `needle`.
    pub fn lines_with(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
