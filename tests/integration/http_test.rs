//! HTTP endpoints alongside live sessions.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestServer;

#[tokio::test]
async fn test_health_counts_sessions() {
    let server = TestServer::start().await;
    let _anonymous = server.connect().await;
    let _alice = server.login("alice").await;

    let (status, body) = server.get_json("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["connections"], 2);
    assert_eq!(body["online_users"], 1);
    // Only alice's own channel exists.
    assert_eq!(body["channels"], 1);
}

#[tokio::test]
async fn test_presence_endpoints() {
    let server = TestServer::start().await;
    let _alice = server.login("alice").await;
    let _bob = server.login("bob").await;

    let (status, body) = server.get_json("/api/presence").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "online_users": ["alice", "bob"] }));

    let (status, body) = server.get_json("/api/presence/bob").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "user_id": "bob", "online": true }));

    let (status, body) = server.get_json("/api/presence/carol").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_plain_get_on_ws_is_rejected() {
    let server = TestServer::start().await;
    let response = status_of(&server, "/ws").await;
    assert!(response.is_client_error(), "got {response}");
}

async fn status_of(server: &TestServer, uri: &str) -> StatusCode {
    use axum::body::Body;
    use http::Request;
    use tower::ServiceExt;

    server
        .router()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}
