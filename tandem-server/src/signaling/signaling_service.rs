use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{ConnectionId, ServerFrame};
use tokio::sync::mpsc;
use tracing::{error, warn};

struct SignalingInner {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<ServerFrame>>,
}

/// Registry of live signaling connections, keyed by the id the relay assigned.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                connections: DashMap::new(),
            }),
        }
    }

    pub fn add_connection(
        &self,
        connection_id: ConnectionId,
        tx: mpsc::UnboundedSender<ServerFrame>,
    ) {
        self.inner.connections.insert(connection_id, tx);
    }

    pub fn remove_connection(&self, connection_id: &ConnectionId) {
        self.inner.connections.remove(connection_id);
    }

    pub fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.inner.connections.contains_key(connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    fn send_frame(&self, connection_id: &ConnectionId, frame: ServerFrame) {
        if let Some(connection) = self.inner.connections.get(connection_id) {
            if let Err(e) = connection.send(frame) {
                error!("Failed to queue frame for {}: {}", connection_id, e);
            }
        } else {
            warn!(
                "Attempted to send frame to disconnected connection {}",
                connection_id
            );
        }
    }
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn deliver(&self, connection_id: &ConnectionId, frame: ServerFrame) {
        self.send_frame(connection_id, frame);
    }
}
