//! WebSocket upgrade handler.

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use duochat_realtime::connection::ConnectionHandle;
use duochat_realtime::connection::heartbeat::run_heartbeat;

use crate::state::AppState;

/// How long the reader waits for the writer to flush after the session ends.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// GET /ws: WebSocket upgrade
///
/// No credential is checked here; the session identifies itself with the
/// `setup` event.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, socket: WebSocket) {
    let engine = state.realtime.clone();
    let (ws_tx, mut ws_rx) = socket.split();

    let (handle, outbound_rx) = engine.connections.open();
    let conn_id = handle.id;

    let ping = engine.config().ping_interval().map(|period| {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });
    let writer = tokio::spawn(forward_outbound(handle.clone(), outbound_rx, ws_tx, ping));

    let heartbeat = engine
        .heartbeat_config()
        .map(|config| tokio::spawn(run_heartbeat(handle.clone(), config)));

    loop {
        tokio::select! {
            _ = handle.closed() => {
                debug!(conn_id = %conn_id, "Session closed by server");
                break;
            }
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    engine.connections.handle_inbound(&conn_id, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => handle.touch(),
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    }

    // Cleanup
    engine.connections.close(&conn_id);
    if let Some(task) = heartbeat {
        task.abort();
    }
    if time::timeout(WRITER_DRAIN_TIMEOUT, writer).await.is_err() {
        warn!(conn_id = %conn_id, "Outbound writer did not finish in time");
    }

    info!(conn_id = %conn_id, "WebSocket connection ended");
}

/// Drains the session queue into the socket, sending pings on `ping`.
///
/// Once the session is closed, frames already queued are flushed before
/// the close frame.
async fn forward_outbound(
    handle: Arc<ConnectionHandle>,
    mut outbound_rx: mpsc::Receiver<String>,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut ping: Option<Interval>,
) {
    loop {
        tokio::select! {
            frame = outbound_rx.recv() => match frame {
                Some(frame) => {
                    if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                        return;
                    }
                }
                None => break,
            },
            _ = handle.closed() => break,
            _ = next_tick(&mut ping) => {
                if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    return;
                }
            }
        }
    }

    while let Ok(frame) = outbound_rx.try_recv() {
        if ws_tx.send(Message::Text(frame.into())).await.is_err() {
            return;
        }
    }
    let _ = ws_tx.send(Message::Close(None)).await;
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending().await,
    }
}
