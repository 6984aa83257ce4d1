use crate::capability::RtcBackend;
use crate::engine::{EngineInner, EngineService, RemotePeer, SessionState};
use crate::role::Role;
use tandem_core::{RelayEvent, SignalType, Topic};
use tracing::{debug, info, warn};

impl<B: RtcBackend> EngineService<B> {
    pub(super) async fn handle_signal(&self, inner: &mut EngineInner<B>, event: RelayEvent) {
        let kind = event.kind;
        if inner.state == SessionState::Closed {
            debug!("Dropping {} received after close", kind);
            return;
        }
        let Some(room_id) = inner.room_id.clone() else {
            debug!("Dropping {} received before connect", kind);
            return;
        };

        let envelope = event.data;
        if inner.is_self(&envelope) {
            debug!("Ignoring self-originated {}", kind);
            return;
        }
        if envelope.room_id != room_id {
            debug!("Ignoring {} for foreign room {}", kind, envelope.room_id);
            return;
        }

        let sender = RemotePeer {
            user_id: envelope.user_id.clone(),
            connection_id: envelope.connection_id,
        };

        match kind {
            SignalType::UserJoin => self.on_peer_join(inner, sender).await,

            SignalType::UserLeft => {
                if inner.is_peer(&sender) {
                    info!("Peer {} left, closing session", sender.user_id);
                    self.close(inner).await;
                } else {
                    debug!("Ignoring user-left for {}", sender.user_id);
                }
            }

            SignalType::Offer => {
                if !self.accept_from(inner, &sender, kind) {
                    return;
                }
                info!("Received OFFER from {}", sender.user_id);
                self.handle_remote_offer(inner, envelope.data).await;
            }

            SignalType::Answer => {
                if !inner.is_peer(&sender) {
                    warn!("Ignoring answer from unpaired user {}", sender.user_id);
                    return;
                }
                info!("Received ANSWER from {}", sender.user_id);
                self.handle_remote_answer(inner, envelope.data).await;
            }

            SignalType::Candidate => {
                if !self.accept_from(inner, &sender, kind) {
                    return;
                }
                self.handle_remote_candidate(inner, envelope.data).await;
            }
        }
    }

    fn accept_from(&self, inner: &mut EngineInner<B>, sender: &RemotePeer, kind: SignalType) -> bool {
        if inner.bind_peer(sender) {
            return true;
        }
        warn!(
            "Ignoring {} from {}: session already paired with {:?}",
            kind,
            sender.user_id,
            inner.peer.as_ref().map(|p| p.user_id.as_str())
        );
        false
    }

    async fn on_peer_join(&self, inner: &mut EngineInner<B>, sender: RemotePeer) {
        if !self.accept_from(inner, &sender, SignalType::UserJoin) {
            return;
        }
        if inner.state == SessionState::Joining {
            inner.state = SessionState::Negotiating;
        }

        match inner.role {
            Some(Role::Offerer) => {
                info!("Peer {} joined, offering", sender.user_id);
                self.create_offer(inner).await;
            }
            Some(Role::Answerer) => {
                // The peer joined after us and never saw our join; announce
                // again so it can make the offer.
                if inner.announced_to.as_ref() == Some(&sender.user_id) {
                    debug!("Already re-announced to {}", sender.user_id);
                    return;
                }
                info!("Peer {} joined, awaiting its offer", sender.user_id);
                inner.announced_to = Some(sender.user_id);
                self.send_signal(inner, Topic::Join, None);
            }
            None => {}
        }
    }
}
