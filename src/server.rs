//! ChatServer Actor implementation
//!
//! The single owner of the hub state. Connection tasks never touch the
//! registry or room store directly; they send `ServerCommand`s here and the
//! actor applies them one at a time.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::hub::Hub;
use crate::types::SessionId;

/// Commands sent from connection tasks to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New connection accepted
    Connect {
        session_id: SessionId,
        sender: mpsc::Sender<String>,
    },
    /// One raw line read from a connection
    Line { session_id: SessionId, line: String },
    /// Connection ended (EOF, I/O error or writer closed)
    Disconnect { session_id: SessionId },
    /// Close every session and stop the actor
    Shutdown,
}

/// The main ChatServer actor
pub struct ChatServer {
    hub: Hub,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            hub: Hub::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Processes commands until `Shutdown` arrives or all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            if !self.handle_command(cmd) {
                break;
            }
        }

        self.hub.shutdown();
        info!("ChatServer shutting down");
    }

    /// Process a single command; returns false to stop the loop
    fn handle_command(&mut self, cmd: ServerCommand) -> bool {
        match cmd {
            ServerCommand::Connect { session_id, sender } => {
                self.hub.connect(session_id, sender);
            }
            ServerCommand::Line { session_id, line } => {
                self.hub.handle_line(session_id, &line);
            }
            ServerCommand::Disconnect { session_id } => {
                if !self.hub.disconnect(session_id) {
                    debug!("Session {} already closed", session_id);
                }
            }
            ServerCommand::Shutdown => return false,
        }
        true
    }
}
