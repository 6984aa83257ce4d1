use crate::error::RelayError;
use crate::{AppState, SignalingOutput};
use axum::extract::State;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{Message, WebSocket};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tandem_core::{ClientFrame, ConnectionId, ServerFrame};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection_id = ConnectionId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, connection_id, state))
}

async fn handle_socket(socket: WebSocket, connection_id: ConnectionId, state: Arc<AppState>) {
    info!("New WebSocket connection: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerFrame>();

    state.signaling.add_connection(connection_id, tx);
    state
        .signaling
        .deliver(&connection_id, ServerFrame::Welcome { connection_id })
        .await;

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let json = match frame.encode() {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize frame for {}: {}", connection_id, e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = state.relay.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match ClientFrame::decode(text.as_str()) {
                        Ok(frame) => match relay.dispatch(connection_id, frame).await {
                            Ok(()) => {}
                            Err(RelayError::RelayClosed) => {
                                error!("Relay died while serving {}", connection_id);
                                break;
                            }
                            Err(e) => warn!("Dropped frame from {}: {}", connection_id, e),
                        },
                        Err(e) => warn!("Invalid signaling frame from {}: {}", connection_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    state.signaling.remove_connection(&connection_id);
    if let Err(e) = state.relay.disconnect(connection_id).await {
        error!("Failed to report disconnect of {}: {}", connection_id, e);
    }

    info!("WebSocket disconnected: {}", connection_id);
}
