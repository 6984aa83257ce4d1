use crate::capability::{PeerConnection, RtcBackend};
use crate::engine::TandemEngine;
use crate::error::EngineError;
use crate::events::EngineEvent;
use crate::signaling::SignalingConnector;
use tandem_core::utils::TEXT_CHANNEL_LABEL;
use tracing::{debug, warn};

impl<B: RtcBackend, C: SignalingConnector> TandemEngine<B, C> {
    /// Send `text` on the `webrtc-chat` data channel once it is open. Returns
    /// immediately; a failure is reported through the `error` event.
    pub async fn send_text(&self, text: impl Into<String>) {
        let pc = {
            let inner = self.service.inner.lock().await;
            match inner.pc.clone() {
                Some(pc) => pc,
                None => {
                    self.service.report(inner.invalid("send_text"));
                    return;
                }
            }
        };

        let service = self.service.clone();
        let text = text.into();
        tokio::spawn(async move {
            match pc.send_text(TEXT_CHANNEL_LABEL, text).await {
                Ok(()) => debug!("Text sent on {}", TEXT_CHANNEL_LABEL),
                Err(e) => {
                    warn!("Failed to send text: {}", e);
                    service
                        .events
                        .emit(EngineEvent::Error(EngineError::DataChannel(e.to_string())));
                }
            }
        });
    }
}
