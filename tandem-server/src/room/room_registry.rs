use crate::room::{Member, Room};
use std::collections::HashMap;
use tandem_core::{ConnectionId, RoomId};

/// Room id → members. Owned by the relay loop and never shared.
///
/// Empty rooms are dropped as soon as their last member leaves, so an empty
/// room and an unknown room are indistinguishable.
#[derive(Debug, Default)]
pub(crate) struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
}

impl RoomRegistry {
    /// Returns `false` if the connection was already in the room.
    pub fn join(&mut self, room_id: &RoomId, member: Member) -> bool {
        self.rooms.entry(room_id.clone()).or_default().insert(member)
    }

    pub fn leave(&mut self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<Member> {
        let room = self.rooms.get_mut(room_id)?;
        let removed = room.remove(connection_id);
        if room.is_empty() {
            self.rooms.remove(room_id);
        }
        removed
    }

    /// Removes the connection from every room it is in.
    pub fn remove_connection(&mut self, connection_id: &ConnectionId) -> Vec<(RoomId, Member)> {
        let mut removed = Vec::new();

        for (room_id, room) in self.rooms.iter_mut() {
            if let Some(member) = room.remove(connection_id) {
                removed.push((room_id.clone(), member));
            }
        }

        self.rooms.retain(|_, room| !room.is_empty());
        removed
    }

    pub fn member_count(&self, room_id: &RoomId) -> usize {
        self.rooms.get(room_id).map_or(0, Room::len)
    }

    pub fn members(&self, room_id: &RoomId) -> Vec<Member> {
        self.rooms
            .get(room_id)
            .map(|room| room.members().to_vec())
            .unwrap_or_default()
    }

    /// Connections currently receiving broadcasts for `room_id`.
    pub fn subscribers(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|room| room.members().iter().map(|m| m.connection_id).collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
