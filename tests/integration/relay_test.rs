//! Message relay between real sessions.

use serde_json::json;

use duochat_core::types::{MessageRecord, UserId};
use duochat_realtime::message::types::ServerEvent;

use crate::helpers::{TestServer, WAIT, assert_none, wait_online_exact};

fn is_message(event: &ServerEvent) -> bool {
    matches!(event, ServerEvent::MessageReceived(_))
}

#[tokio::test]
async fn test_alice_to_bob() {
    let server = TestServer::start().await;
    let mut alice = server.login("alice").await;
    let mut bob = server.login("bob").await;
    wait_online_exact(&mut alice, &["alice", "bob"]).await;

    alice.join_chat("bob").unwrap();
    alice
        .send_message(MessageRecord::text("alice", "bob", "hi"))
        .unwrap();

    match bob.next_matching(WAIT, is_message).await.unwrap() {
        ServerEvent::MessageReceived(received) => {
            assert_eq!(received.receiver_id(), Some(UserId::from("bob")));
            assert_eq!(received.get("content"), Some(&json!("hi")));
            assert_eq!(received.get("sender"), Some(&json!({ "_id": "alice" })));
        }
        _ => unreachable!(),
    }

    // Alice joined bob's channel but is the sender: no echo.
    assert_none(&mut alice, is_message).await;
}

#[tokio::test]
async fn test_attachment_fields_forwarded() {
    let server = TestServer::start().await;
    let alice = server.login("alice").await;
    let mut bob = server.login("bob").await;

    let record: MessageRecord = serde_json::from_value(json!({
        "_id": "m2",
        "sender": { "_id": "alice", "username": "Alice" },
        "receiver": { "_id": "bob", "username": "Bob" },
        "content": "",
        "fileUrl": "/uploads/1700000000000-plan.pdf",
        "fileType": "application/pdf",
        "fileName": "plan.pdf",
        "createdAt": "2024-05-01T10:00:00.000Z"
    }))
    .unwrap();
    alice.send_message(record.clone()).unwrap();

    match bob.next_matching(WAIT, is_message).await.unwrap() {
        ServerEvent::MessageReceived(received) => assert_eq!(received, record),
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_loose_records_arrive_unchanged() {
    let server = TestServer::start().await;
    let alice = server.login("alice").await;
    let mut bob = server.login("bob").await;

    let raw = [
        r#"{"_id":"m3","sender":{"_id":"alice"},"receiver":{"_id":"bob"},"content":"x","createdAt":1714557600000}"#,
        r#"{"_id":"m4","sender":{"_id":"alice"},"receiver":{"_id":"bob"},"content":null}"#,
        r#"{"_id":"m5","sender":{"username":"Alice"},"receiver":{"_id":"bob"},"content":"x"}"#,
        r#"{"_id":"m6","sender":{"_id":"alice"},"receiver":{"_id":"bob"},"createdAt":"2024-05-01T10:00:00.000Z"}"#,
    ];
    for frame in raw {
        let record: MessageRecord = serde_json::from_str(frame).unwrap();
        alice.send_message(record).unwrap();
    }

    for expected in raw {
        match bob.next_matching(WAIT, is_message).await.unwrap() {
            ServerEvent::MessageReceived(received) => {
                assert_eq!(serde_json::to_string(&received).unwrap(), expected);
            }
            _ => unreachable!(),
        }
    }
}

#[tokio::test]
async fn test_missing_receiver_not_delivered() {
    let server = TestServer::start().await;
    let alice = server.login("alice").await;
    let mut bob = server.login("bob").await;

    let record: MessageRecord =
        serde_json::from_value(json!({ "sender": "alice", "content": "lost" })).unwrap();
    alice.send_message(record).unwrap();

    assert_none(&mut bob, is_message).await;
    assert_eq!(server.state.realtime.metrics.snapshot().messages_relayed, 0);
}

#[tokio::test]
async fn test_offline_receiver_gets_nothing_later() {
    let server = TestServer::start().await;
    let alice = server.login("alice").await;

    alice
        .send_message(MessageRecord::text("alice", "bob", "while you were out"))
        .unwrap();

    // Nothing is queued for bob: he sees the message only by fetching history.
    let mut bob = server.login("bob").await;
    assert_none(&mut bob, is_message).await;
}

#[tokio::test]
async fn test_messages_before_setup_dropped() {
    let server = TestServer::start().await;
    let mut bob = server.login("bob").await;
    let anonymous = server.connect().await;

    anonymous
        .send_message(MessageRecord::text("mallory", "bob", "hello?"))
        .unwrap();

    assert_none(&mut bob, is_message).await;
}
