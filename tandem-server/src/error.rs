use tandem_core::{ConnectionId, ProtocolError, SignalType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A disconnect for a connection that never joined (or already left).
    #[error("connection {0} is not a member of any room")]
    NotAMember(ConnectionId),

    #[error("{0} events are membership events and cannot be relayed verbatim")]
    NotRelayable(SignalType),

    #[error("relay event loop has shut down")]
    RelayClosed,
}
