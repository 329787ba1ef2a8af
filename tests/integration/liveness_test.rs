//! Idle-session reaping.

use std::time::Duration;

use duochat_client::ClientError;

use crate::helpers::{TestServer, test_config, wait_online_exact, wait_until_within};

#[tokio::test]
async fn test_silent_session_is_closed() {
    let mut config = test_config();
    config.realtime.idle_timeout_seconds = 1;
    let server = TestServer::with_config(config).await;

    let mut watcher = server.connect().await;
    let alice = server.login("alice").await;
    wait_online_exact(&mut watcher, &["alice"]).await;

    // Neither side sends anything; both sessions are reaped.
    drop(alice);
    let pool = server.state.realtime.pool.clone();
    wait_until_within(Duration::from_secs(5), || pool.connection_count() == 0).await;
    assert!(server.state.realtime.online_users().is_empty());

    let closed = loop {
        match watcher.next_event(Duration::from_secs(3)).await {
            Ok(_) => continue,
            Err(e) => break e,
        }
    };
    assert!(matches!(closed, ClientError::Closed));
}
