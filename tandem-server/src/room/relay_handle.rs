use crate::error::RelayError;
use crate::room::{Member, RelayCommand};
use tandem_core::{ClientFrame, ConnectionId, Envelope, RoomId, SignalType};
use tokio::sync::{mpsc, oneshot};

/// Cloneable front door to a running [`Relay`](crate::Relay).
#[derive(Clone)]
pub struct RelayHandle {
    command_tx: mpsc::Sender<RelayCommand>,
}

impl RelayHandle {
    pub fn new(command_tx: mpsc::Sender<RelayCommand>) -> Self {
        Self { command_tx }
    }

    /// Validates a decoded client frame and routes it to the matching operation.
    pub async fn dispatch(
        &self,
        connection_id: ConnectionId,
        frame: ClientFrame,
    ) -> Result<(), RelayError> {
        frame.validate()?;

        match frame {
            ClientFrame::Join(envelope) => self.join(connection_id, envelope).await,
            ClientFrame::Leave(envelope) => self.leave(connection_id, envelope).await,
            ClientFrame::Candidate(envelope) => {
                self.relay(connection_id, SignalType::Candidate, envelope)
                    .await
            }
            ClientFrame::Offer(envelope) => {
                self.relay(connection_id, SignalType::Offer, envelope)
                    .await
            }
            ClientFrame::Answer(envelope) => {
                self.relay(connection_id, SignalType::Answer, envelope)
                    .await
            }
        }
    }

    pub async fn join(
        &self,
        connection_id: ConnectionId,
        envelope: Envelope,
    ) -> Result<(), RelayError> {
        self.send(RelayCommand::Join {
            connection_id,
            envelope,
        })
        .await
    }

    pub async fn leave(
        &self,
        connection_id: ConnectionId,
        envelope: Envelope,
    ) -> Result<(), RelayError> {
        self.send(RelayCommand::Leave {
            connection_id,
            envelope,
        })
        .await
    }

    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<(), RelayError> {
        self.send(RelayCommand::Disconnect { connection_id }).await
    }

    /// Rebroadcasts an offer, answer or candidate to the envelope's room.
    pub async fn relay(
        &self,
        connection_id: ConnectionId,
        kind: SignalType,
        envelope: Envelope,
    ) -> Result<(), RelayError> {
        if matches!(kind, SignalType::UserJoin | SignalType::UserLeft) {
            return Err(RelayError::NotRelayable(kind));
        }

        self.send(RelayCommand::Forward {
            connection_id,
            kind,
            envelope,
        })
        .await
    }

    pub async fn member_count(&self, room_id: &RoomId) -> Result<usize, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(RelayCommand::MemberCount {
            room_id: room_id.clone(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| RelayError::RelayClosed)
    }

    pub async fn members(&self, room_id: &RoomId) -> Result<Vec<Member>, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(RelayCommand::Members {
            room_id: room_id.clone(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| RelayError::RelayClosed)
    }

    async fn send(&self, cmd: RelayCommand) -> Result<(), RelayError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| RelayError::RelayClosed)
    }
}
