//! Setup authentication.

use duochat_client::ClientError;
use duochat_realtime::message::types::{ServerEvent, SetupPayload};

use crate::helpers::{TestServer, WAIT, ids, test_config, wait_online_exact};

async fn expect_rejection(server: &TestServer, payload: SetupPayload, code: &str) {
    let mut client = server.connect().await;
    client.setup(payload).unwrap();

    match client.next_event(WAIT).await.unwrap() {
        ServerEvent::Error(error) => assert_eq!(error.code, code),
        other => panic!("expected error event, got {other:?}"),
    }
    assert!(matches!(
        client.next_event(WAIT).await,
        Err(ClientError::Closed)
    ));
}

#[tokio::test]
async fn test_missing_token_rejected() {
    let server = TestServer::start().await;
    expect_rejection(&server, SetupPayload::with_id("alice"), "UNAUTHORIZED").await;
    assert!(server.state.realtime.online_users().is_empty());
}

#[tokio::test]
async fn test_forged_token_rejected() {
    let server = TestServer::start().await;
    expect_rejection(&server, SetupPayload::with_token("not-a-jwt"), "UNAUTHORIZED").await;
}

#[tokio::test]
async fn test_claim_mismatch_rejected() {
    let server = TestServer::start().await;
    let payload = SetupPayload {
        id: Some("mallory".into()),
        username: None,
        token: Some(server.token("alice")),
    };
    expect_rejection(&server, payload, "UNAUTHORIZED").await;
    assert!(server.state.realtime.online_users().is_empty());
}

#[tokio::test]
async fn test_token_only_setup() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client
        .setup(SetupPayload::with_token(server.token("alice")))
        .unwrap();
    wait_online_exact(&mut client, &["alice"]).await;
}

#[tokio::test]
async fn test_trusted_setup_when_disabled() {
    let mut config = test_config();
    config.realtime.require_authenticated_setup = false;
    let server = TestServer::with_config(config).await;

    let mut client = server.connect().await;
    client.setup(SetupPayload::with_id("alice")).unwrap();
    wait_online_exact(&mut client, &["alice"]).await;
    assert_eq!(server.state.realtime.online_users(), ids(&["alice"]));

    expect_rejection(&server, SetupPayload::default(), "INVALID_SETUP").await;
    assert_eq!(server.state.realtime.online_users(), ids(&["alice"]));
}
