//! WebSocket client for the event channel, a thin wrapper over
//! `tokio-tungstenite`.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

use duochat_core::types::MessageRecord;
use duochat_realtime::message::types::{ClientEvent, ServerEvent, SetupPayload};

use crate::error::ClientError;
use crate::typing::TypingEmitter;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One event-channel session.
///
/// Sends are queued to a writer task and never block; server events are
/// buffered by a reader task until [`ChatClient::next_event`] takes them.
#[derive(Debug)]
pub struct ChatClient {
    sender: EventSender,
    inbound: mpsc::UnboundedReceiver<ServerEvent>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

/// Cloneable send half of a [`ChatClient`].
#[derive(Debug, Clone)]
pub struct EventSender {
    outbound: mpsc::UnboundedSender<Message>,
}

impl EventSender {
    /// Queue a raw client event.
    pub fn emit(&self, event: &ClientEvent) -> Result<(), ClientError> {
        let frame = serde_json::to_string(event)?;
        self.outbound
            .send(Message::Text(frame.into()))
            .map_err(|_| ClientError::Closed)
    }

    pub fn start_typing(&self, channel: &str) -> Result<(), ClientError> {
        self.emit(&ClientEvent::Typing(channel.to_string()))
    }

    pub fn stop_typing(&self, channel: &str) -> Result<(), ClientError> {
        self.emit(&ClientEvent::StopTyping(channel.to_string()))
    }
}

impl ChatClient {
    /// Connect to `url` (e.g. `ws://127.0.0.1:5000/ws`).
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (ws, _) = connect_async(url).await?;
        let (sink, stream) = ws.split();

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound) = mpsc::unbounded_channel();

        let writer = tokio::spawn(write_loop(sink, outbound_rx));
        let reader = tokio::spawn(read_loop(stream, inbound_tx));

        debug!(url, "Connected to event channel");
        Ok(Self {
            sender: EventSender { outbound },
            inbound,
            writer,
            reader,
        })
    }

    /// A send handle usable while this client is borrowed for reading.
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Queue a raw client event.
    pub fn emit(&self, event: &ClientEvent) -> Result<(), ClientError> {
        self.sender.emit(event)
    }

    /// Bind this session to an identity.
    pub fn setup(&self, payload: SetupPayload) -> Result<(), ClientError> {
        self.emit(&ClientEvent::Setup(payload))
    }

    /// Join a channel (by convention, a peer's identity).
    pub fn join_chat(&self, channel: &str) -> Result<(), ClientError> {
        self.emit(&ClientEvent::JoinChat(channel.to_string()))
    }

    /// Relay a record the REST layer already persisted.
    pub fn send_message(&self, record: MessageRecord) -> Result<(), ClientError> {
        self.emit(&ClientEvent::NewMessage(record))
    }

    pub fn start_typing(&self, channel: &str) -> Result<(), ClientError> {
        self.sender.start_typing(channel)
    }

    pub fn stop_typing(&self, channel: &str) -> Result<(), ClientError> {
        self.sender.stop_typing(channel)
    }

    /// Wait up to `timeout` for the next server event.
    pub async fn next_event(&mut self, timeout: Duration) -> Result<ServerEvent, ClientError> {
        match tokio::time::timeout(timeout, self.inbound.recv()).await {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(ClientError::Closed),
            Err(_) => Err(ClientError::Timeout(timeout)),
        }
    }

    /// Skip events until one satisfies `matches`, waiting at most `timeout`
    /// overall.
    pub async fn next_matching<F>(
        &mut self,
        timeout: Duration,
        mut matches: F,
    ) -> Result<ServerEvent, ClientError>
    where
        F: FnMut(&ServerEvent) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            let event = self
                .next_event(remaining)
                .await
                .map_err(|e| match e {
                    ClientError::Timeout(_) => ClientError::Timeout(timeout),
                    other => other,
                })?;
            if matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Send a close frame and wait for the writer to finish.
    pub async fn close(self) {
        let _ = self.sender.outbound.send(Message::Close(None));
        drop(self.sender);
        if tokio::time::timeout(Duration::from_secs(5), self.writer)
            .await
            .is_err()
        {
            warn!("Writer did not finish after close");
        }
        self.reader.abort();
    }
}

impl TypingEmitter for EventSender {
    fn emit_typing(&self, channel: &str) {
        if let Err(e) = self.start_typing(channel) {
            warn!(channel, error = %e, "Failed to send typing");
        }
    }

    fn emit_stop_typing(&self, channel: &str) {
        if let Err(e) = self.stop_typing(channel) {
            warn!(channel, error = %e, "Failed to send stop-typing");
        }
    }
}

impl TypingEmitter for ChatClient {
    fn emit_typing(&self, channel: &str) {
        self.sender.emit_typing(channel);
    }

    fn emit_stop_typing(&self, channel: &str) {
        self.sender.emit_stop_typing(channel);
    }
}

async fn write_loop(
    mut sink: futures::stream::SplitSink<WsStream, Message>,
    mut outbound_rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(message) = outbound_rx.recv().await {
        let closing = matches!(message, Message::Close(_));
        if let Err(e) = sink.send(message).await {
            debug!(error = %e, "WebSocket write failed");
            break;
        }
        if closing {
            break;
        }
    }
}

async fn read_loop(
    mut stream: futures::stream::SplitStream<WsStream>,
    inbound_tx: mpsc::UnboundedSender<ServerEvent>,
) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ServerEvent>(text.as_str()) {
                Ok(event) => {
                    if inbound_tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "Ignoring unrecognised server frame"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "WebSocket read failed");
                break;
            }
        }
    }
}
