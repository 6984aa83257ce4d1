use crate::capability::{PeerConnection, RtcBackend};
use crate::engine::{SessionState, TandemEngine};
use crate::error::EngineError;
use crate::events::EngineEvent;
use crate::signaling::SignalingConnector;
use std::sync::Arc;
use tandem_core::{RoomId, Topic, UserId};
use tracing::{error, info};

impl<B: RtcBackend, C: SignalingConnector> TandemEngine<B, C> {
    /// Create the peer connection with every local track attached and
    /// announce ourselves in `room_id`.
    pub async fn connect(&self, room_id: RoomId, user_id: UserId) -> Result<(), EngineError> {
        let service = &self.service;
        let mut inner = service.inner.lock().await;
        if inner.state != SessionState::Initializing {
            return Err(inner.invalid("connect"));
        }
        let Some(peer_tx) = inner.peer_tx.clone() else {
            return Err(inner.invalid("connect"));
        };

        let pc = match service
            .backend
            .create_peer_connection(&service.config.ice_servers, peer_tx)
            .await
        {
            Ok(pc) => Arc::new(pc),
            Err(e) => {
                let err = EngineError::PeerConnection(e.to_string());
                error!("Failed to create peer connection: {}", err);
                service.events.emit(EngineEvent::Error(err.clone()));
                return Err(err);
            }
        };

        if let Some(stream) = &inner.local_stream {
            for track in &stream.tracks {
                if let Err(e) = pc.add_track(track.clone(), &stream.id).await {
                    service.report(EngineError::PeerConnection(e.to_string()));
                }
            }
        }

        info!("Joining room {} as {}", room_id, user_id);
        inner.pc = Some(pc);
        inner.room_id = Some(room_id);
        inner.user_id = Some(user_id);
        inner.state = SessionState::Joining;
        service.send_signal(&inner, Topic::Join, None);

        Ok(())
    }
}
