//! `ChatStream`: one channel's events pushed over a websocket as JSON text
//! frames.

use axum::{
    async_trait,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use courier_chats::{ChannelEvent, EventSink, SinkClosed};
use futures_util::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::middleware::AuthenticatedUser;
use crate::rest::require_id;
use crate::state::GatewayState;

/// Write half of a websocket, fed by a channel subscription.
pub struct WebSocketSink {
    sender: SplitSink<WebSocket, Message>,
}

impl WebSocketSink {
    pub fn new(sender: SplitSink<WebSocket, Message>) -> Self {
        Self { sender }
    }

    async fn close(mut self) {
        let _ = self.sender.close().await;
    }
}

#[async_trait]
impl EventSink for WebSocketSink {
    async fn deliver(&mut self, event: ChannelEvent) -> Result<(), SinkClosed> {
        let text = serde_json::to_string(&event).map_err(|_| SinkClosed)?;
        self.sender
            .send(Message::Text(text))
            .await
            .map_err(|_| SinkClosed)
    }
}

/// Authorize, then upgrade. Refusals are ordinary JSON error responses.
pub async fn chat_stream_handler(
    State(state): State<Arc<GatewayState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(channel_id): Path<String>,
    ws: WebSocketUpgrade,
) -> GatewayResult<Response> {
    require_id("channel_id", &channel_id)?;
    state
        .services
        .channels
        .authorize(&user_id, &channel_id)
        .await?;

    let cancel = state.shutdown.child_token();
    Ok(ws.on_upgrade(move |socket| run_stream(socket, state, user_id, channel_id, cancel)))
}

async fn run_stream(
    socket: WebSocket,
    state: Arc<GatewayState>,
    user_id: String,
    channel_id: String,
    cancel: CancellationToken,
) {
    let (sender, mut receiver) = socket.split();
    let mut sink = WebSocketSink::new(sender);

    // Client frames carry nothing; a close or read error ends the stream.
    let reader_cancel = cancel.clone();
    let reader = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
        reader_cancel.cancel();
    });

    let result = state
        .services
        .channels
        .subscribe(&user_id, &channel_id, &mut sink, cancel.clone())
        .await;

    match result {
        Ok(end) => debug!(%channel_id, %user_id, ?end, "chat stream finished"),
        Err(err) => {
            warn!(%channel_id, %user_id, error = %err, "chat stream failed");
            let public = GatewayError::from(err).to_string();
            let _ = sink.deliver(ChannelEvent::error(public)).await;
        }
    }

    sink.close().await;
    cancel.cancel();
    reader.abort();
}
