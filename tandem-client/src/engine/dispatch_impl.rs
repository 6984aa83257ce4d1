use crate::capability::{PeerEvent, PeerEventReceiver, RtcBackend};
use crate::engine::{EngineService, SessionState};
use crate::error::EngineError;
use crate::events::EngineEvent;
use std::sync::Arc;
use tandem_core::{ServerFrame, Topic};
use tokio::sync::mpsc;
use tracing::{debug, info};

impl<B: RtcBackend> EngineService<B> {
    /// Single consumer for signaling frames and peer connection callbacks.
    /// Each item is fully handled, awaited SDP calls included, before the
    /// next one is taken.
    pub(super) async fn run_dispatcher(
        self: Arc<Self>,
        mut inbound: mpsc::UnboundedReceiver<ServerFrame>,
        mut peer_rx: PeerEventReceiver<B::RemoteStream>,
    ) {
        debug!("Dispatcher started");
        let mut inbound_open = true;

        loop {
            tokio::select! {
                frame = inbound.recv(), if inbound_open => match frame {
                    Some(frame) => self.handle_frame(frame).await,
                    None => {
                        inbound_open = false;
                        self.on_signaling_lost().await;
                    }
                },
                Some(event) = peer_rx.recv() => self.handle_peer_event(event).await,
                else => break,
            }

            if self.inner.lock().await.state == SessionState::Closed {
                break;
            }
        }

        info!("Dispatcher stopped");
    }

    async fn handle_frame(&self, frame: ServerFrame) {
        let mut inner = self.inner.lock().await;
        match frame {
            ServerFrame::Welcome { connection_id } => {
                debug!("Relay assigned connection {}", connection_id);
                inner.connection_id = Some(connection_id);
            }
            ServerFrame::Message(event) => self.handle_signal(&mut inner, event).await,
        }
    }

    async fn handle_peer_event(&self, event: PeerEvent<B::RemoteStream>) {
        let mut inner = self.inner.lock().await;
        if inner.state == SessionState::Closed {
            return;
        }

        match event {
            PeerEvent::IceCandidate(candidate) => {
                debug!("Relaying local ICE candidate: {}", candidate.candidate);
                self.send_signal(&inner, Topic::Candidate, Some(candidate.to_value()));
            }
            PeerEvent::Track(stream) => {
                info!("Remote stream received");
                inner.remote_stream = Some(stream.clone());
                self.events.emit(EngineEvent::RemoteStream(stream));
            }
        }
    }

    async fn on_signaling_lost(&self) {
        let inner = self.inner.lock().await;
        if inner.state != SessionState::Closed {
            self.report(EngineError::SignalingSend(
                "signaling channel closed by the relay".into(),
            ));
        }
    }
}
