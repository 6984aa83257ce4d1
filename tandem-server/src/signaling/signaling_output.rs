use async_trait::async_trait;
use tandem_core::{ConnectionId, ServerFrame};

/// Where the relay hands frames for a specific connection.
///
/// The WebSocket layer implements this; tests substitute a recorder.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver a frame to one connection. Unknown connections are skipped.
    async fn deliver(&self, connection_id: &ConnectionId, frame: ServerFrame);
}
