// Room bookkeeping: which players belong to which room, and which rooms changed.

use crate::domain::state::{PlayerId, PlayerSnapshot};
use crate::domain::store::EntityStore;
use std::collections::HashMap;
use tracing::info;

/// Room every server starts with; also the fallback for blank room names.
pub const DEFAULT_ROOM: &str = "principal";

#[derive(Debug)]
pub struct Room {
    pub name: String,
    pub created_at_ms: u64,
    // Join order; mirrors `SimPlayer::room` for every listed id.
    members: Vec<PlayerId>,
    // Set by any mutation in the room, cleared when a snapshot is sent.
    dirty: bool,
}

impl Room {
    fn new(name: String, created_at_ms: u64) -> Self {
        Self {
            name,
            created_at_ms,
            members: Vec::new(),
            dirty: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[cfg(test)]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the dirty flag and clears it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Owns every room. Rooms are created lazily and never reclaimed.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the room, creating it if absent.
    pub fn ensure_room(&mut self, name: &str, now_ms: u64) -> &mut Room {
        self.rooms.entry(name.to_string()).or_insert_with(|| {
            info!(room = name, "room created");
            Room::new(name.to_string(), now_ms)
        })
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    /// Adds a member to an existing room. Unknown rooms are ignored; call
    /// `ensure_room` first.
    pub fn add_player(&mut self, room: &str, player_id: PlayerId) {
        if let Some(room) = self.rooms.get_mut(room) {
            if !room.members.contains(&player_id) {
                room.members.push(player_id);
            }
            room.dirty = true;
        }
    }

    /// Removes a member. Unknown rooms and absent members are no-ops.
    pub fn remove_player(&mut self, room: &str, player_id: PlayerId) {
        if let Some(room) = self.rooms.get_mut(room) {
            let before = room.members.len();
            room.members.retain(|id| *id != player_id);
            if room.members.len() != before {
                room.dirty = true;
            }
        }
    }

    pub fn player_count(&self, room: &str) -> usize {
        self.rooms.get(room).map_or(0, |r| r.members.len())
    }

    /// Current member ids, used as the recipient list for room-scoped events.
    pub fn members(&self, room: &str) -> Vec<PlayerId> {
        self.rooms
            .get(room)
            .map(|r| r.members.clone())
            .unwrap_or_default()
    }

    /// Client-visible projection of the room's players, in join order.
    pub fn snapshot(&self, room: &str, store: &EntityStore) -> Vec<PlayerSnapshot> {
        let Some(room) = self.rooms.get(room) else {
            return Vec::new();
        };
        room.members
            .iter()
            .filter_map(|id| store.player(*id))
            .map(PlayerSnapshot::from)
            .collect()
    }

    pub fn mark_dirty(&mut self, room: &str) {
        if let Some(room) = self.rooms.get_mut(room) {
            room.dirty = true;
        }
    }

    /// Names of rooms with members that changed since the last call. Clears
    /// the flag on every room, so empty rooms never queue stale work.
    pub fn take_dirty_rooms(&mut self) -> Vec<String> {
        self.rooms
            .values_mut()
            .filter_map(|room| {
                let dirty = room.take_dirty();
                (dirty && !room.is_empty()).then(|| room.name.clone())
            })
            .collect()
    }

    /// Room names, sorted for stable status output.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rooms.keys().cloned().collect();
        names.sort();
        names
    }
}
