//! Chat websocket connection
//!
//! One long-lived bidirectional channel per open conversation view,
//! authenticated at connect time with the same bearer token used for REST
//! calls. Delivery is best-effort: `emit` returns once the frame is written,
//! with no server acknowledgment and no retry.

use anyhow::{bail, Context, Result};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::frame::{self, Packet};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

pub struct ChatSocket {
    stream: WsStream,
}

impl ChatSocket {
    /// Connect and complete the open + namespace-connect handshake.
    pub async fn connect(base_url: &str, token: &str) -> Result<Self> {
        let ws_base = base_url
            .replace("https://", "wss://")
            .replace("http://", "ws://");
        let url = format!("{}/socket.io/?EIO=4&transport=websocket", ws_base);

        tracing::info!("Connecting chat socket to {}", url);

        let (stream, response) = connect_async(&url)
            .await
            .context("WebSocket connection failed")?;
        tracing::info!("Chat socket connected (status={})", response.status());

        let mut socket = Self { stream };

        // Engine open frame first, then the namespace connect with our token.
        match socket.next_packet().await? {
            Some(Packet::Open(handshake)) => {
                tracing::debug!("Engine handshake: {}", handshake);
            }
            other => bail!("Expected engine open frame, got {:?}", other),
        }

        let auth = serde_json::json!({ "token": token });
        socket.send_text(&frame::encode_connect(Some(&auth))).await?;

        match socket.next_packet().await? {
            Some(Packet::Connected(ack)) => {
                tracing::debug!("Namespace connected: {}", ack);
            }
            Some(Packet::ConnectError(err)) => {
                bail!("Chat connection refused: {}", err);
            }
            other => bail!("Expected connect ack, got {:?}", other),
        }

        Ok(socket)
    }

    async fn send_text(&mut self, text: &str) -> Result<()> {
        tracing::debug!("WS send: {}", text);
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .context("Failed to send WebSocket message")
    }

    /// Emit an application event. Best-effort: no delivery guarantee.
    pub async fn emit(&mut self, event: &str, payload: &Value) -> Result<()> {
        self.send_text(&frame::encode_event(event, payload)).await
    }

    /// Next parsed packet, answering pings transparently.
    /// Returns `None` when the connection closes.
    async fn next_packet(&mut self) -> Result<Option<Packet>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!("WS recv: {}", text);
                    let packet = frame::parse(&text);

                    if packet == Packet::Ping {
                        self.send_text(frame::PONG).await?;
                        continue;
                    }
                    return Ok(Some(packet));
                }
                Some(Ok(Message::Ping(data))) => {
                    self.stream
                        .send(Message::Pong(data))
                        .await
                        .context("Failed to send pong")?;
                }
                Some(Ok(Message::Close(close))) => {
                    tracing::info!("WebSocket closed: {:?}", close);
                    return Ok(None);
                }
                Some(Ok(other)) => {
                    tracing::debug!("WS frame (ignored): {:?}", other);
                }
                Some(Err(e)) => {
                    return Err(e).context("WebSocket receive error");
                }
                None => {
                    return Ok(None);
                }
            }
        }
    }

    /// Next application event as (name, payload).
    /// Skips everything that is not an event; `None` when the channel closes.
    pub async fn next_event(&mut self) -> Result<Option<(String, Value)>> {
        loop {
            match self.next_packet().await? {
                Some(Packet::Event { name, data }) => return Ok(Some((name, data))),
                Some(Packet::Disconnect) | None => return Ok(None),
                Some(other) => {
                    tracing::debug!("Packet (ignored): {:?}", other);
                }
            }
        }
    }
}
