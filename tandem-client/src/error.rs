use crate::engine::SessionState;
use thiserror::Error;

/// Failure reported by an external capability (peer connection, media source).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<webrtc::Error> for BackendError {
    fn from(e: webrtc::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Errors surfaced through the `error` event and, for `init`/`connect`, returned.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("local media unavailable: {0}")]
    MediaAcquisition(String),

    #[error("signaling channel unavailable: {0}")]
    SignalingSend(String),

    #[error("could not apply session description: {0}")]
    SdpApply(String),

    #[error("ICE candidate rejected: {0}")]
    IceCandidate(String),

    #[error("peer connection failure: {0}")]
    PeerConnection(String),

    #[error("data channel failure: {0}")]
    DataChannel(String),

    #[error("{operation} is not allowed while {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MediaAcquisition,
    SignalingSend,
    SdpApply,
    IceCandidate,
    PeerConnection,
    DataChannel,
    InvalidState,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MediaAcquisition(_) => ErrorKind::MediaAcquisition,
            Self::SignalingSend(_) => ErrorKind::SignalingSend,
            Self::SdpApply(_) => ErrorKind::SdpApply,
            Self::IceCandidate(_) => ErrorKind::IceCandidate,
            Self::PeerConnection(_) => ErrorKind::PeerConnection,
            Self::DataChannel(_) => ErrorKind::DataChannel,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }

    /// Whether the session cannot continue and `connect` must be retried
    /// on a fresh engine.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MediaAcquisition | ErrorKind::PeerConnection
        )
    }
}
