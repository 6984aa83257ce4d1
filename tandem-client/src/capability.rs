use crate::error::BackendError;
use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::{IceCandidate, IceServerConfig, MediaConstraints, SessionDescription};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

/// A locally captured track. After `stop` the track accepts no further media.
pub trait LocalTrack: Send + Sync + 'static {
    fn id(&self) -> String;
    fn kind(&self) -> TrackKind;
    fn stop(&self);
    fn is_stopped(&self) -> bool;
}

/// The tracks returned by one media acquisition, sharing a stream id.
pub struct LocalStream<T> {
    pub id: String,
    pub tracks: Vec<Arc<T>>,
}

impl<T: LocalTrack> LocalStream<T> {
    pub fn new(id: impl Into<String>, tracks: Vec<Arc<T>>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

/// Callbacks raised by a peer connection, delivered in order to the engine's
/// dispatcher.
#[derive(Debug, Clone)]
pub enum PeerEvent<S> {
    IceCandidate(IceCandidate),
    Track(S),
}

pub type PeerEventSender<S> = mpsc::UnboundedSender<PeerEvent<S>>;
pub type PeerEventReceiver<S> = mpsc::UnboundedReceiver<PeerEvent<S>>;

#[async_trait]
pub trait PeerConnection: Send + Sync + 'static {
    type Track: LocalTrack;

    async fn add_track(&self, track: Arc<Self::Track>, stream_id: &str) -> Result<(), BackendError>;

    async fn create_offer(&self) -> Result<SessionDescription, BackendError>;

    async fn create_answer(&self) -> Result<SessionDescription, BackendError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), BackendError>;

    async fn set_remote_description(&self, desc: SessionDescription)
    -> Result<(), BackendError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), BackendError>;

    /// Send `text` on this side's data channel `label` once it is open. The
    /// channel has to exist before the first offer so it is negotiated.
    async fn send_text(&self, label: &str, text: String) -> Result<(), BackendError>;

    async fn close(&self) -> Result<(), BackendError>;
}

/// Media capture and peer connection factory.
#[async_trait]
pub trait RtcBackend: Send + Sync + 'static {
    type Track: LocalTrack;
    type RemoteStream: Clone + Send + Sync + 'static;
    type Connection: PeerConnection<Track = Self::Track>;

    async fn acquire_media(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<LocalStream<Self::Track>, BackendError>;

    async fn create_peer_connection(
        &self,
        ice_servers: &[IceServerConfig],
        events: PeerEventSender<Self::RemoteStream>,
    ) -> Result<Self::Connection, BackendError>;
}
