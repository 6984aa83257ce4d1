use crate::capability::{LocalStream, PeerEventSender, RtcBackend};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{EngineEvent, EventKind, EventRegistry};
use crate::role::Role;
use crate::signaling::{SignalingConnector, SignalingLink};
use serde_json::Value;
use std::sync::Arc;
use tandem_core::{ClientFrame, ConnectionId, Envelope, RoomId, Topic, UserId};
use tokio::sync::Mutex;
use tracing::warn;

mod connect_impl;
mod create_offer_impl;
mod disconnect_impl;
mod dispatch_impl;
mod handle_remote_answer_impl;
mod handle_remote_candidate_impl;
mod handle_remote_offer_impl;
mod handle_signal_impl;
mod init_impl;
mod send_text_impl;

/// Negotiation session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Initializing,
    Joining,
    Negotiating,
    Connected,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RemotePeer {
    user_id: UserId,
    connection_id: Option<ConnectionId>,
}

struct EngineInner<B: RtcBackend> {
    state: SessionState,
    link: Option<SignalingLink>,
    local_stream: Option<LocalStream<B::Track>>,
    pc: Option<Arc<B::Connection>>,
    peer_tx: Option<PeerEventSender<B::RemoteStream>>,
    remote_stream: Option<B::RemoteStream>,
    room_id: Option<RoomId>,
    user_id: Option<UserId>,
    connection_id: Option<ConnectionId>,
    peer: Option<RemotePeer>,
    role: Option<Role>,
    pending_offer: bool,
    announced_to: Option<UserId>,
}

impl<B: RtcBackend> EngineInner<B> {
    fn new() -> Self {
        Self {
            state: SessionState::Idle,
            link: None,
            local_stream: None,
            pc: None,
            peer_tx: None,
            remote_stream: None,
            room_id: None,
            user_id: None,
            connection_id: None,
            peer: None,
            role: None,
            pending_offer: false,
            announced_to: None,
        }
    }

    /// Our own broadcasts come back from the relay; match by user or by the
    /// connection id from `welcome`.
    fn is_self(&self, envelope: &Envelope) -> bool {
        if self.user_id.as_ref() == Some(&envelope.user_id) {
            return true;
        }
        envelope.connection_id.is_some() && envelope.connection_id == self.connection_id
    }

    /// Pairs the session with `sender` if unpaired. Returns false for anyone
    /// other than the bound peer.
    fn bind_peer(&mut self, sender: &RemotePeer) -> bool {
        match &mut self.peer {
            Some(peer) if peer.user_id == sender.user_id => {
                if sender.connection_id.is_some() {
                    peer.connection_id = sender.connection_id;
                }
                true
            }
            Some(_) => false,
            None => {
                let Some(local) = self.user_id.as_ref() else {
                    return false;
                };
                self.role = Some(Role::resolve(local, &sender.user_id));
                self.peer = Some(sender.clone());
                true
            }
        }
    }

    fn is_peer(&self, sender: &RemotePeer) -> bool {
        self.peer
            .as_ref()
            .is_some_and(|peer| peer.user_id == sender.user_id)
    }

    fn invalid(&self, operation: &'static str) -> EngineError {
        EngineError::InvalidState {
            operation,
            state: self.state,
        }
    }
}

pub(crate) struct EngineService<B: RtcBackend> {
    backend: B,
    config: EngineConfig,
    inner: Mutex<EngineInner<B>>,
    events: EventRegistry<B::RemoteStream>,
}

impl<B: RtcBackend> EngineService<B> {
    /// Warn and surface `err` through the `error` event.
    fn report(&self, err: EngineError) {
        warn!("{}", err);
        self.events.emit(EngineEvent::Error(err));
    }

    /// Send a frame for the current room and user. Failures are reported and
    /// the session carries on degraded.
    fn send_signal(&self, inner: &EngineInner<B>, topic: Topic, data: Option<Value>) {
        let (Some(room_id), Some(user_id)) = (inner.room_id.clone(), inner.user_id.clone()) else {
            self.report(inner.invalid(topic.as_str()));
            return;
        };

        let mut envelope = Envelope::new(room_id, user_id);
        envelope.data = data;

        let result = match &inner.link {
            Some(link) => link.send(ClientFrame::new(topic, envelope)),
            None => Err(EngineError::SignalingSend(format!(
                "no signaling link for {topic}"
            ))),
        };

        if let Err(e) = result {
            self.report(e);
        }
    }
}

/// Drives one negotiation session per `connect` against a backend and a
/// signaling transport.
pub struct TandemEngine<B: RtcBackend, C: SignalingConnector> {
    service: Arc<EngineService<B>>,
    connector: C,
}

impl<B: RtcBackend, C: SignalingConnector> TandemEngine<B, C> {
    pub fn new(config: EngineConfig, backend: B, connector: C) -> Self {
        let service = Arc::new(EngineService {
            backend,
            config,
            inner: Mutex::new(EngineInner::new()),
            events: EventRegistry::new(),
        });

        Self { service, connector }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.service.config
    }

    /// Replaces any handler already registered for `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&EngineEvent<B::RemoteStream>) + Send + Sync + 'static,
    {
        self.service.events.on(kind, handler);
    }

    pub fn off(&self, kind: EventKind) -> bool {
        self.service.events.off(kind)
    }

    pub async fn state(&self) -> SessionState {
        self.service.inner.lock().await.state
    }

    pub async fn role(&self) -> Option<Role> {
        self.service.inner.lock().await.role
    }

    pub async fn remote_peer(&self) -> Option<UserId> {
        let inner = self.service.inner.lock().await;
        inner.peer.as_ref().map(|peer| peer.user_id.clone())
    }

    pub async fn has_pending_offer(&self) -> bool {
        self.service.inner.lock().await.pending_offer
    }

    /// Assigned by the relay in its `welcome` frame.
    pub async fn connection_id(&self) -> Option<ConnectionId> {
        self.service.inner.lock().await.connection_id
    }

    pub async fn remote_stream(&self) -> Option<B::RemoteStream> {
        self.service.inner.lock().await.remote_stream.clone()
    }
}
