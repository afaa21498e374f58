//! Test server fixture shared by the integration tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use parlor_server::{
    ServerConfig, ServerError,
    domain::{CredentialStore, SessionCache},
    infrastructure::repository::{InMemoryCredentialStore, InMemorySessionCache},
    ui::{self, state::AppState},
};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// How long a test waits for a frame that should arrive
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// How long a test waits to conclude that nothing arrives
pub const SILENCE: Duration = Duration::from_millis(200);

/// Server bound to an ephemeral port, stopped on drop.
pub struct TestServer {
    port: u16,
    pub state: Arc<AppState>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    /// Start a server with the in-memory collaborators.
    pub async fn start() -> Self {
        Self::start_with(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(InMemorySessionCache::new()),
        )
        .await
    }

    pub async fn start_with(
        credentials: Arc<dyn CredentialStore>,
        session_cache: Arc<dyn SessionCache>,
    ) -> Self {
        let config = ServerConfig::new("127.0.0.1", 0);
        let state = Arc::new(AppState::new(credentials, session_cache, config.session_ttl));
        let listener = ui::bind(&config).await.expect("Failed to bind test server");
        let port = listener.local_addr().expect("No local address").port();

        let task = tokio::spawn(ui::serve(
            listener,
            state.clone(),
            std::future::pending::<()>(),
        ));

        Self { port, state, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    /// Wait for the server task to end, as it does after a fatal failure.
    pub async fn stopped(&mut self) -> Result<(), ServerError> {
        tokio::time::timeout(RECV_TIMEOUT, &mut self.task)
            .await
            .expect("Server did not stop")
            .expect("Server task panicked")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// WebSocket test client speaking the text protocol.
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let (ws, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect");
        Self { ws }
    }

    pub async fn send(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.into()))
            .await
            .expect("Failed to send");
    }

    /// Next text frame, panicking if none arrives in time.
    pub async fn recv(&mut self) -> String {
        self.try_recv(RECV_TIMEOUT)
            .await
            .expect("Expected a frame from the server")
    }

    /// Next text frame within `wait`, if any.
    pub async fn try_recv(&mut self, wait: Duration) -> Option<String> {
        loop {
            match tokio::time::timeout(wait, self.ws.next()).await {
                Ok(Some(Ok(Message::Text(text)))) => return Some(text.to_string()),
                Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => continue,
                _ => return None,
            }
        }
    }

    /// Whether the server closed the stream.
    pub async fn is_closed_by_server(&mut self) -> bool {
        loop {
            match tokio::time::timeout(RECV_TIMEOUT, self.ws.next()).await {
                Ok(None) | Ok(Some(Ok(Message::Close(_)))) | Ok(Some(Err(_))) => return true,
                Ok(Some(Ok(_))) => continue,
                Err(_) => return false,
            }
        }
    }

    /// Register `name` with password `pw`, log in and return the token.
    pub async fn register_and_login(&mut self, name: &str) -> String {
        self.send(&format!("name:{name}pass:pw")).await;
        self.send(&format!("login:{name}pass:pw")).await;
        let reply = self.recv().await;
        reply
            .strip_prefix("ok")
            .unwrap_or_else(|| panic!("Login failed: {reply}"))
            .to_string()
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}

/// Poll `condition` until it holds or `RECV_TIMEOUT` passes.
pub async fn eventually<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
