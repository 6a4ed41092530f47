//! Room store
//!
//! Maps room name -> member usernames for every room except the lobby.
//! Rooms are created on first entry and deleted once their last member leaves.

use std::collections::BTreeMap;

use crate::types::LOBBY;

/// A named room's membership
///
/// Members form a set; insertion order is kept for listing.
#[derive(Debug, Default)]
pub struct Room {
    members: Vec<String>,
}

impl Room {
    /// Add a member; returns false if already present
    pub fn add_member(&mut self, username: &str) -> bool {
        if self.contains(username) {
            false
        } else {
            self.members.push(username.to_string());
            true
        }
    }

    /// Remove a member; returns false if they were not present
    pub fn remove_member(&mut self, username: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != username);
        self.members.len() != before
    }

    pub fn contains(&self, username: &str) -> bool {
        self.members.iter().any(|m| m == username)
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// All non-lobby rooms, ordered by name
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: BTreeMap<String, Room>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `username` to `room`, creating the room if needed
    ///
    /// The lobby is never stored, so entering it is a no-op. Re-entry does
    /// not duplicate membership. Returns true if the member was added.
    pub fn enter(&mut self, room: &str, username: &str) -> bool {
        if room == LOBBY {
            return false;
        }
        self.rooms
            .entry(room.to_string())
            .or_default()
            .add_member(username)
    }

    /// Remove `username` from `room`, deleting the room once empty
    ///
    /// Unknown rooms and absent members are a no-op returning false.
    pub fn remove(&mut self, room: &str, username: &str) -> bool {
        let Some(entry) = self.rooms.get_mut(room) else {
            return false;
        };

        let removed = entry.remove_member(username);
        if entry.is_empty() {
            self.rooms.remove(room);
        }
        removed
    }

    /// Rooms with at least one member, with their member counts
    pub fn list_active(&self) -> Vec<(String, usize)> {
        self.rooms
            .iter()
            .filter(|(_, room)| !room.is_empty())
            .map(|(name, room)| (name.clone(), room.member_count()))
            .collect()
    }

    /// Members of `room`; empty for unknown rooms
    pub fn members_of(&self, room: &str) -> Vec<String> {
        self.rooms
            .get(room)
            .map(|r| r.members().to_vec())
            .unwrap_or_default()
    }

    pub fn contains(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }
}
