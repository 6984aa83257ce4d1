use crate::error::EngineError;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tandem_core::{ClientFrame, ServerFrame};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// An open signaling channel: outbound frames, inbound frames, and a close
/// handle. Dropping the inbound sender on the far side ends the session's
/// dispatcher.
pub struct SignalingLink {
    outbound: mpsc::UnboundedSender<ClientFrame>,
    inbound: Option<mpsc::UnboundedReceiver<ServerFrame>>,
    closer: Option<oneshot::Sender<()>>,
}

impl SignalingLink {
    pub fn new(
        outbound: mpsc::UnboundedSender<ClientFrame>,
        inbound: mpsc::UnboundedReceiver<ServerFrame>,
        closer: oneshot::Sender<()>,
    ) -> Self {
        Self {
            outbound,
            inbound: Some(inbound),
            closer: Some(closer),
        }
    }

    pub fn send(&self, frame: ClientFrame) -> Result<(), EngineError> {
        if self.closer.is_none() {
            return Err(EngineError::SignalingSend(format!(
                "link closed, dropped {}",
                frame.topic()
            )));
        }

        self.outbound.send(frame).map_err(|e| {
            EngineError::SignalingSend(format!("channel closed, dropped {}", e.0.topic()))
        })
    }

    pub(crate) fn take_inbound(&mut self) -> Option<mpsc::UnboundedReceiver<ServerFrame>> {
        self.inbound.take()
    }

    /// Frames sent before `close` are still flushed by the transport.
    pub fn close(&mut self) {
        if let Some(closer) = self.closer.take() {
            let _ = closer.send(());
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closer.is_none() || self.outbound.is_closed()
    }
}

#[async_trait]
pub trait SignalingConnector: Send + Sync + 'static {
    async fn open(&self, url: &str) -> Result<SignalingLink, EngineError>;
}

/// WebSocket transport for the relay's `/ws` endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl SignalingConnector for WsConnector {
    async fn open(&self, url: &str) -> Result<SignalingLink, EngineError> {
        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| EngineError::SignalingSend(format!("failed to connect {url}: {e}")))?;
        info!("Signaling connected to {}", url);

        let (mut write, mut read) = ws_stream.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientFrame>();
        let (in_tx, in_rx) = mpsc::unbounded_channel::<ServerFrame>();
        let (close_tx, mut close_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    frame = out_rx.recv() => {
                        let Some(frame) = frame else {
                            debug!("Outbound channel dropped");
                            break;
                        };
                        match frame.encode() {
                            Ok(json) => {
                                if let Err(e) = write.send(Message::Text(json.into())).await {
                                    error!("Failed to send {}: {}", frame.topic(), e);
                                    break;
                                }
                            }
                            Err(e) => warn!("Failed to encode {}: {}", frame.topic(), e),
                        }
                    }

                    msg = read.next() => {
                        match msg {
                            Some(Ok(Message::Text(text))) => match ServerFrame::decode(text.as_str()) {
                                Ok(frame) => {
                                    if in_tx.send(frame).is_err() {
                                        debug!("Inbound receiver dropped");
                                        break;
                                    }
                                }
                                Err(e) => warn!("Ignoring undecodable frame: {}", e),
                            },
                            Some(Ok(Message::Ping(data))) => {
                                if let Err(e) = write.send(Message::Pong(data)).await {
                                    warn!("Failed to send pong: {}", e);
                                }
                            }
                            Some(Ok(Message::Close(_))) => {
                                info!("Relay closed the connection");
                                break;
                            }
                            Some(Err(e)) => {
                                error!("WebSocket error: {}", e);
                                break;
                            }
                            None => {
                                info!("WebSocket stream ended");
                                break;
                            }
                            _ => {}
                        }
                    }

                    _ = &mut close_rx => {
                        // Flush whatever was queued before the close request.
                        while let Ok(frame) = out_rx.try_recv() {
                            if let Ok(json) = frame.encode() {
                                let _ = write.send(Message::Text(json.into())).await;
                            }
                        }
                        let _ = write.send(Message::Close(None)).await;
                        info!("Signaling connection closed");
                        break;
                    }
                }
            }
        });

        Ok(SignalingLink::new(out_tx, in_rx, close_tx))
    }
}
