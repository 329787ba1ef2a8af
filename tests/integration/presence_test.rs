//! Presence broadcast over real sessions.

use crate::helpers::{TestServer, ids, last_online, wait_online_exact, wait_until};

#[tokio::test]
async fn test_setup_broadcasts_to_everyone() {
    let server = TestServer::start().await;
    let mut watcher = server.connect().await;

    let mut alice = server.login("alice").await;
    wait_online_exact(&mut watcher, &["alice"]).await;

    let _bob = server.login("bob").await;
    wait_online_exact(&mut watcher, &["alice", "bob"]).await;
    wait_online_exact(&mut alice, &["alice", "bob"]).await;

    assert_eq!(server.state.realtime.online_users(), ids(&["alice", "bob"]));
}

#[tokio::test]
async fn test_disconnect_rebroadcasts() {
    let server = TestServer::start().await;
    let mut alice = server.login("alice").await;
    let bob = server.login("bob").await;
    wait_online_exact(&mut alice, &["alice", "bob"]).await;

    bob.close().await;
    wait_online_exact(&mut alice, &["alice"]).await;
    assert_eq!(server.state.realtime.online_users(), ids(&["alice"]));
}

#[tokio::test]
async fn test_stale_session_close_keeps_identity_online() {
    let server = TestServer::start().await;
    let mut watcher = server.login("watcher").await;
    let first = server.login("alice").await;
    let _second = server.login("alice").await;

    first.close().await;
    let pool = server.state.realtime.pool.clone();
    wait_until(|| pool.connection_count() == 2).await;

    assert_eq!(server.state.realtime.online_users(), ids(&["watcher", "alice"]));
    assert_eq!(last_online(&mut watcher).await, Some(ids(&["watcher", "alice"])));
}

#[tokio::test]
async fn test_last_broadcast_matches_registry() {
    let server = TestServer::start().await;
    let mut watcher = server.connect().await;

    let mut sessions = Vec::new();
    for id in ["a", "b", "c", "d"] {
        sessions.push(server.login(id).await);
    }
    sessions.remove(2).close().await;
    sessions.remove(0).close().await;

    let pool = server.state.realtime.pool.clone();
    wait_until(|| pool.connection_count() == 3).await;

    let expected = server.state.realtime.online_users();
    assert_eq!(expected, ids(&["b", "d"]));
    assert_eq!(last_online(&mut watcher).await, Some(expected));
}
