//! WebSocket push of watchlist changes.
//!
//! Every connected client receives each [`WatchlistEventEnvelope`] as a JSON
//! text frame tagged by `type` (`added`, `removed`, `reloaded`).

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use reel_core::WatchlistEventEnvelope;

use crate::metrics::{WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_LAG_EVENTS, WS_MESSAGES_SENT};
use crate::state::AppState;

/// Interval between keep-alive pings.
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// WebSocket upgrade handler.
///
/// The subscription is taken before the handshake response is sent, so a
/// client sees every change made after its connection is accepted.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.watchlist().subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, rx))
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, mut rx: broadcast::Receiver<WatchlistEventEnvelope>) {
    let (mut sender, mut receiver) = socket.split();

    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();

    info!("WebSocket client connected");

    // Spawn task to forward watchlist events to this client
    let send_task = tokio::spawn(async move {
        let mut ping = tokio::time::interval(PING_INTERVAL);
        ping.tick().await;

        loop {
            tokio::select! {
                result = rx.recv() => {
                    match result {
                        Ok(envelope) => {
                            if !forward(&mut sender, &envelope).await {
                                debug!("WebSocket send failed, client disconnected");
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("WebSocket client lagged, skipped {} messages", n);
                            WS_LAG_EVENTS.inc();
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            debug!("Watchlist event channel closed");
                            break;
                        }
                    }
                }
                _ = ping.tick() => {
                    if sender.send(Message::Ping(Default::default())).await.is_err() {
                        debug!("WebSocket ping failed, client disconnected");
                        break;
                    }
                }
            }
        }
    });

    // Handle incoming messages from client (ping/pong, close)
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Close(_)) => {
                debug!("WebSocket client requested close");
                break;
            }
            Ok(Message::Text(text)) => {
                // Clients have nothing to say, but log it
                debug!("Received text message: {}", text.as_str());
            }
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket receive error: {}", e);
                break;
            }
        }
    }

    send_task.abort();
    WS_CONNECTIONS_ACTIVE.dec();
    info!("WebSocket client disconnected");
}

/// Send one event. Returns false once the client is gone.
async fn forward(
    sender: &mut SplitSink<WebSocket, Message>,
    envelope: &WatchlistEventEnvelope,
) -> bool {
    let json = match serde_json::to_string(envelope) {
        Ok(json) => json,
        Err(e) => {
            // Not the client's fault, keep the connection
            error!("Failed to serialize watchlist event: {}", e);
            return true;
        }
    };

    WS_MESSAGES_SENT
        .with_label_values(&[envelope.event.kind()])
        .inc();
    sender.send(Message::Text(json.into())).await.is_ok()
}
