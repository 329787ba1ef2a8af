//! Typing indicators end to end.

use std::time::Duration;

use duochat_client::TypingDebouncer;
use duochat_realtime::message::types::ServerEvent;

use crate::helpers::{TestServer, WAIT, assert_none};

fn is_typing_signal(event: &ServerEvent) -> bool {
    matches!(event, ServerEvent::Typing | ServerEvent::StopTyping)
}

#[tokio::test]
async fn test_typing_and_stop_relayed() {
    let server = TestServer::start().await;
    let mut alice = server.login("alice").await;
    let mut bob = server.login("bob").await;

    alice.join_chat("bob").unwrap();
    alice.start_typing("bob").unwrap();
    assert_eq!(
        bob.next_matching(WAIT, is_typing_signal).await.unwrap(),
        ServerEvent::Typing
    );

    alice.stop_typing("bob").unwrap();
    assert_eq!(
        bob.next_matching(WAIT, is_typing_signal).await.unwrap(),
        ServerEvent::StopTyping
    );

    assert_none(&mut alice, is_typing_signal).await;
}

#[tokio::test]
async fn test_debouncer_over_the_wire() {
    let server = TestServer::start().await;
    let alice = server.login("alice").await;
    let mut bob = server.login("bob").await;

    let debouncer = TypingDebouncer::with_quiet_interval(alice.sender(), Duration::from_millis(200));
    for _ in 0..4 {
        debouncer.keystroke("bob");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert_eq!(
        bob.next_matching(WAIT, is_typing_signal).await.unwrap(),
        ServerEvent::Typing
    );
    assert_eq!(
        bob.next_matching(WAIT, is_typing_signal).await.unwrap(),
        ServerEvent::StopTyping
    );
    assert_none(&mut bob, is_typing_signal).await;
}
