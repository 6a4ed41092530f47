//! Basic type definitions for the chat server
//!
//! - `SessionId`: UUID-based identity of one connection's session
//! - `LOBBY`: the implicit default room

use uuid::Uuid;

/// Name of the default room every session starts in.
///
/// The lobby is never stored in the room store.
pub const LOBBY: &str = "lobby";

/// Unique session identifier (newtype pattern)
///
/// Sessions are removed by identity rather than by username, since an
/// anonymous session has an empty username.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
