//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use duochat_api::state::AppState;
use duochat_auth::jwt::{JwtDecoder, JwtEncoder};
use duochat_client::ChatClient;
use duochat_core::config::AppConfig;
use duochat_core::types::UserId;
use duochat_realtime::message::types::{ServerEvent, SetupPayload};
use duochat_realtime::server::RealtimeEngine;

/// Upper bound for anything the server should deliver.
pub const WAIT: Duration = Duration::from_secs(2);
/// How long to listen before concluding nothing was delivered.
pub const QUIET: Duration = Duration::from_millis(300);

/// A running server plus what tests need to talk to it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    encoder: JwtEncoder,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Start with the test configuration.
    pub async fn start() -> Self {
        Self::with_config(test_config()).await
    }

    /// Start with a custom configuration.
    pub async fn with_config(config: AppConfig) -> Self {
        let decoder = Arc::new(JwtDecoder::new(&config.auth));
        let engine = Arc::new(RealtimeEngine::new(&config.realtime, decoder));
        let encoder = JwtEncoder::new(&config.auth);
        let state = AppState::new(Arc::new(config), engine);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let router = duochat_api::build_router(state.clone());
        let task = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });

        Self {
            addr,
            state,
            encoder,
            task,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Token the REST layer would have issued for `id`.
    pub fn token(&self, id: &str) -> String {
        self.encoder.issue(&UserId::from(id)).expect("issue token")
    }

    /// Open a session without identifying.
    pub async fn connect(&self) -> ChatClient {
        ChatClient::connect(&self.ws_url()).await.expect("connect")
    }

    /// Open a session, run an authenticated `setup` and wait until the
    /// server lists `id` as online.
    pub async fn login(&self, id: &str) -> ChatClient {
        let mut client = self.connect().await;
        let payload = SetupPayload {
            id: Some(UserId::from(id)),
            username: Some(id.to_string()),
            token: Some(self.token(id)),
        };
        client.setup(payload).expect("queue setup");
        wait_online_containing(&mut client, id).await;
        client
    }

    /// Router for in-process HTTP requests.
    pub fn router(&self) -> Router {
        duochat_api::build_router(self.state.clone())
    }

    /// GET `uri` in-process and decode the JSON body.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .router()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&body).expect("json body"))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Test configuration: fixed secret, authenticated setup, no pings.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.realtime.ping_interval_seconds = 0;
    config
}

pub fn ids(list: &[&str]) -> Vec<UserId> {
    list.iter().map(|id| UserId::from(*id)).collect()
}

/// Wait for an `online-users` snapshot containing `id`.
pub async fn wait_online_containing(client: &mut ChatClient, id: &str) -> Vec<UserId> {
    let id = UserId::from(id);
    match client
        .next_matching(WAIT, |e| matches!(e, ServerEvent::OnlineUsers(list) if list.contains(&id)))
        .await
        .expect("online-users")
    {
        ServerEvent::OnlineUsers(list) => list,
        _ => unreachable!(),
    }
}

/// Wait for an `online-users` snapshot equal to `expected`.
pub async fn wait_online_exact(client: &mut ChatClient, expected: &[&str]) {
    let expected = ids(expected);
    client
        .next_matching(WAIT, |e| matches!(e, ServerEvent::OnlineUsers(list) if *list == expected))
        .await
        .expect("online-users snapshot");
}

/// Assert that no event matching `matches` arrives within [`QUIET`].
pub async fn assert_none<F>(client: &mut ChatClient, matches: F)
where
    F: FnMut(&ServerEvent) -> bool,
{
    let result = client.next_matching(QUIET, matches).await;
    assert!(result.is_err(), "unexpected event: {result:?}");
}

/// Read until the session goes quiet; return the last `online-users` seen.
pub async fn last_online(client: &mut ChatClient) -> Option<Vec<UserId>> {
    let mut last = None;
    while let Ok(event) = client.next_event(QUIET).await {
        if let ServerEvent::OnlineUsers(list) = event {
            last = Some(list);
        }
    }
    last
}

/// Poll `condition` until it holds or [`WAIT`] elapses.
pub async fn wait_until<F>(condition: F)
where
    F: FnMut() -> bool,
{
    wait_until_within(WAIT, condition).await;
}

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn wait_until_within<F>(timeout: Duration, mut condition: F)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within {timeout:?}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
