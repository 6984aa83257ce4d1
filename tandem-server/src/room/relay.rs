use crate::error::RelayError;
use crate::room::{Member, RelayCommand, RelayHandle, RoomRegistry};
use crate::signaling::SignalingOutput;
use std::sync::Arc;
use tandem_core::{ConnectionId, Envelope, RelayEvent, RoomId, ServerFrame, SignalType};
use tokio::sync::mpsc;
use tracing::{debug, info};

const COMMAND_QUEUE: usize = 256;

/// Owns every room and fans events out to the connections subscribed to them.
///
/// All membership changes go through `run`, so commands are applied strictly
/// in the order they were sent.
pub struct Relay {
    registry: RoomRegistry,
    command_rx: mpsc::Receiver<RelayCommand>,
    output: Arc<dyn SignalingOutput>,
}

impl Relay {
    pub fn new(command_rx: mpsc::Receiver<RelayCommand>, output: Arc<dyn SignalingOutput>) -> Self {
        Self {
            registry: RoomRegistry::default(),
            command_rx,
            output,
        }
    }

    /// Starts the relay loop on the current runtime.
    pub fn spawn(output: Arc<dyn SignalingOutput>) -> RelayHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);
        tokio::spawn(Relay::new(command_rx, output).run());
        RelayHandle::new(command_tx)
    }

    pub async fn run(mut self) {
        info!("Relay event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Relay event loop finished");
    }

    async fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Join {
                connection_id,
                envelope,
            } => self.join(connection_id, envelope).await,

            RelayCommand::Leave {
                connection_id,
                envelope,
            } => self.leave(connection_id, envelope).await,

            RelayCommand::Disconnect { connection_id } => self.disconnect(connection_id).await,

            RelayCommand::Forward {
                connection_id,
                kind,
                envelope,
            } => {
                let room_id = envelope.room_id.clone();
                let data = envelope.with_connection(connection_id);
                self.broadcast(&room_id, RelayEvent::new(kind, data)).await;
            }

            RelayCommand::MemberCount { room_id, reply } => {
                let _ = reply.send(self.registry.member_count(&room_id));
            }

            RelayCommand::Members { room_id, reply } => {
                let _ = reply.send(self.registry.members(&room_id));
            }
        }
    }

    async fn join(&mut self, connection_id: ConnectionId, envelope: Envelope) {
        let room_id = envelope.room_id.clone();
        let member = Member::new(connection_id, envelope.user_id.clone());

        if self.registry.join(&room_id, member) {
            info!(
                "User {} joined room {} via {}, members now {}",
                envelope.user_id,
                room_id,
                connection_id,
                self.registry.member_count(&room_id)
            );
        } else {
            debug!(
                "Connection {} re-joined room {}; re-announcing",
                connection_id, room_id
            );
        }

        let data = envelope.with_connection(connection_id);
        self.broadcast(&room_id, RelayEvent::new(SignalType::UserJoin, data))
            .await;
    }

    async fn leave(&mut self, connection_id: ConnectionId, envelope: Envelope) {
        let room_id = envelope.room_id.clone();

        let Some(member) = self.registry.leave(&room_id, &connection_id) else {
            debug!(
                "Ignoring leave of room {} from non-member {}",
                room_id, connection_id
            );
            return;
        };

        info!(
            "User {} left room {}, members now {}",
            member.user_id,
            room_id,
            self.registry.member_count(&room_id)
        );

        let data = envelope.with_connection(connection_id);
        self.broadcast(&room_id, RelayEvent::new(SignalType::UserLeft, data))
            .await;
    }

    async fn disconnect(&mut self, connection_id: ConnectionId) {
        let removed = self.registry.remove_connection(&connection_id);

        if removed.is_empty() {
            debug!("{}", RelayError::NotAMember(connection_id));
            return;
        }

        for (room_id, member) in removed {
            info!(
                "User {} disconnected from room {}, members now {}",
                member.user_id,
                room_id,
                self.registry.member_count(&room_id)
            );

            let data = Envelope::new(room_id.clone(), member.user_id).with_connection(connection_id);
            self.broadcast(&room_id, RelayEvent::new(SignalType::UserLeft, data))
                .await;
        }
    }

    async fn broadcast(&self, room_id: &RoomId, event: RelayEvent) {
        let subscribers = self.registry.subscribers(room_id);
        debug!(
            "Broadcasting {} to {} subscriber(s) of room {}",
            event.kind,
            subscribers.len(),
            room_id
        );

        for connection_id in subscribers {
            self.output
                .deliver(&connection_id, ServerFrame::Message(event.clone()))
                .await;
        }
    }
}
