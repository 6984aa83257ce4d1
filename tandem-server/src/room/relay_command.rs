use crate::room::Member;
use tandem_core::{ConnectionId, Envelope, RoomId, SignalType};
use tokio::sync::oneshot;

/// Commands the relay loop processes, one at a time, in arrival order.
#[derive(Debug)]
pub enum RelayCommand {
    /// A connection asked to join `envelope.room_id`.
    Join {
        connection_id: ConnectionId,
        envelope: Envelope,
    },

    /// A connection asked to leave `envelope.room_id`.
    Leave {
        connection_id: ConnectionId,
        envelope: Envelope,
    },

    /// The transport under a connection went away.
    Disconnect { connection_id: ConnectionId },

    /// Offer, answer or candidate to rebroadcast untouched.
    Forward {
        connection_id: ConnectionId,
        kind: SignalType,
        envelope: Envelope,
    },

    MemberCount {
        room_id: RoomId,
        reply: oneshot::Sender<usize>,
    },

    Members {
        room_id: RoomId,
        reply: oneshot::Sender<Vec<Member>>,
    },
}
