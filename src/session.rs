//! Session struct definition
//!
//! Server-side state for one connection: username, current room, ignore list
//! and the outbound channel feeding the connection's writer task.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::SendError;
use crate::types::{SessionId, LOBBY};

/// Connected session
///
/// Dropping a session drops its outbound sender, which ends the writer task
/// and closes the connection.
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this session
    pub id: SessionId,
    /// Username, empty while anonymous
    pub username: String,
    /// Current room, `lobby` by default
    pub room: String,
    /// Usernames this session does not receive broadcasts from, in insertion order
    ignoring: Vec<String>,
    /// Server -> client line channel
    sender: mpsc::Sender<String>,
}

impl Session {
    /// Create a new anonymous session in the lobby
    pub fn new(id: SessionId, sender: mpsc::Sender<String>) -> Self {
        Self {
            id,
            username: String::new(),
            room: LOBBY.to_string(),
            ignoring: Vec::new(),
            sender,
        }
    }

    /// Queue a line for this session's connection
    ///
    /// Never waits: a full queue drops the line.
    pub fn send(&self, line: String) -> Result<(), SendError> {
        self.sender.try_send(line).map_err(|e| match e {
            TrySendError::Full(_) => SendError::Full,
            TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }

    /// Check if this session has registered a username
    pub fn is_registered(&self) -> bool {
        !self.username.is_empty()
    }

    pub fn in_lobby(&self) -> bool {
        self.room == LOBBY
    }

    /// Add a user to the ignore list
    ///
    /// Returns false if the user was already ignored.
    pub fn ignore(&mut self, username: &str) -> bool {
        if self.is_ignoring(username) {
            false
        } else {
            self.ignoring.push(username.to_string());
            true
        }
    }

    pub fn is_ignoring(&self, username: &str) -> bool {
        self.ignoring.iter().any(|u| u == username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_creation() {
        let (tx, _rx) = mpsc::channel(8);
        let session = Session::new(SessionId::new(), tx);

        assert!(!session.is_registered());
        assert!(session.in_lobby());
        assert!(!session.is_ignoring("bob"));
    }

    #[test]
    fn test_ignore_is_a_set() {
        let (tx, _rx) = mpsc::channel(8);
        let mut session = Session::new(SessionId::new(), tx);

        assert!(session.ignore("bob"));
        assert!(session.ignore("carol"));
        assert!(!session.ignore("bob"));

        assert!(session.is_ignoring("bob"));
        assert!(!session.is_ignoring("dave"));
        assert!(session.is_ignoring("carol"));
    }

    #[test]
    fn test_send_full_and_closed() {
        let (tx, mut rx) = mpsc::channel(1);
        let session = Session::new(SessionId::new(), tx);

        assert!(session.send("one".to_string()).is_ok());
        assert!(matches!(
            session.send("two".to_string()),
            Err(SendError::Full)
        ));
        assert_eq!(rx.try_recv().unwrap(), "one");

        drop(rx);
        assert!(matches!(
            session.send("three".to_string()),
            Err(SendError::ChannelClosed)
        ));
    }
}
