//! Client registry
//!
//! Table of every connected session, anonymous or not.

use std::collections::HashMap;

use crate::session::Session;
use crate::types::SessionId;

/// All connected sessions: SessionId -> Session
#[derive(Debug, Default)]
pub struct ClientRegistry {
    sessions: HashMap<SessionId, Session>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session; called once per accepted connection
    pub fn register(&mut self, session: Session) {
        self.sessions.insert(session.id, session);
    }

    /// True iff a session holds exactly this (non-empty) username
    pub fn exists(&self, username: &str) -> bool {
        self.find_by_username(username).is_some()
    }

    /// Remove a session by identity; `None` if it was already gone
    pub fn delete(&mut self, id: SessionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Look up a registered session by exact username
    pub fn find_by_username(&self, username: &str) -> Option<&Session> {
        if username.is_empty() {
            return None;
        }
        self.sessions.values().find(|s| s.username == username)
    }

    /// Iterate all sessions, in no particular order
    pub fn list(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    /// Sorted usernames of registered sessions currently in `room`
    pub fn usernames_in(&self, room: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .list()
            .filter(|s| s.is_registered() && s.room == room)
            .map(|s| s.username.clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every session, closing all connections
    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}
