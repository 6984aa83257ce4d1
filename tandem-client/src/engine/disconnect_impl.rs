use crate::capability::{PeerConnection, RtcBackend};
use crate::engine::{EngineInner, EngineService, SessionState, TandemEngine};
use crate::events::EngineEvent;
use crate::signaling::SignalingConnector;
use tandem_core::{ClientFrame, Envelope, Topic};
use tracing::{debug, info, warn};

impl<B: RtcBackend, C: SignalingConnector> TandemEngine<B, C> {
    /// Leave the room and release everything. Calling it again is a no-op.
    pub async fn disconnect(&self) {
        let mut inner = self.service.inner.lock().await;
        self.service.close(&mut inner).await;
    }
}

impl<B: RtcBackend> EngineService<B> {
    pub(super) async fn close(&self, inner: &mut EngineInner<B>) {
        if inner.state == SessionState::Closed {
            debug!("Session already closed");
            return;
        }

        if let (Some(link), Some(room_id), Some(user_id)) =
            (&inner.link, inner.room_id.clone(), inner.user_id.clone())
        {
            let leave = ClientFrame::new(Topic::Leave, Envelope::new(room_id, user_id));
            if let Err(e) = link.send(leave) {
                debug!("Leave not sent: {}", e);
            }
        }

        if let Some(pc) = inner.pc.take() {
            if let Err(e) = pc.close().await {
                warn!("Error closing peer connection: {}", e);
            }
        }
        if let Some(mut link) = inner.link.take() {
            link.close();
        }
        if let Some(stream) = inner.local_stream.take() {
            stream.stop_all();
        }

        inner.peer_tx = None;
        inner.remote_stream = None;
        inner.pending_offer = false;
        inner.state = SessionState::Closed;
        info!("Session closed");

        self.events.emit(EngineEvent::Disconnect);
    }
}
