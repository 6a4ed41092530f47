//! Command dispatcher
//!
//! `Hub` owns the client registry and room store and applies one command at
//! a time to them. It never awaits: every outbound write is a non-blocking
//! queue push, so a single slow client cannot stall the hub.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::command::{parse_line, Command, GREETING, HELP_TEXT};
use crate::error::CommandError;
use crate::message::{Kind, Scope};
use crate::registry::ClientRegistry;
use crate::room::RoomStore;
use crate::router::{self, Origin};
use crate::session::Session;
use crate::types::{SessionId, LOBBY};

/// Shared chat state plus the protocol state machine
#[derive(Debug, Default)]
pub struct Hub {
    registry: ClientRegistry,
    rooms: RoomStore,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn rooms(&self) -> &RoomStore {
        &self.rooms
    }

    /// Register a freshly accepted connection as an anonymous session
    /// and prompt it to pick a username
    pub fn connect(&mut self, id: SessionId, sender: mpsc::Sender<String>) {
        self.registry.register(Session::new(id, sender));
        debug!("Session {} added, total sessions: {}", id, self.registry.len());
        self.reply(id, GREETING);
    }

    /// Parse and dispatch one raw line from a session
    pub fn handle_line(&mut self, id: SessionId, line: &str) {
        let Some(parsed) = parse_line(line) else {
            return;
        };
        let Some(session) = self.registry.get(id) else {
            return;
        };

        let registered = session.is_registered();
        let command = Command::resolve(parsed, registered);

        let result = if !registered && !command.allowed_anonymously() {
            Err(CommandError::RegistrationRequired)
        } else {
            self.dispatch(id, command)
        };

        if let Err(e) = result {
            debug!("Session {} command rejected: {}", id, e);
            router::reply(&self.registry, id, &e.to_string());
        }
    }

    /// Tear a session down: leave its room, drop it, announce the departure
    ///
    /// Dropping the session closes its connection. Returns false if the
    /// session was already gone, so teardown happens at most once.
    pub fn disconnect(&mut self, id: SessionId) -> bool {
        let Some(session) = self.registry.delete(id) else {
            return false;
        };

        if !session.in_lobby() {
            self.rooms.remove(&session.room, &session.username);
        }

        if session.is_registered() {
            let origin = Origin::of(&session);
            router::deliver(&self.registry, &origin, Kind::Disconnect, "", Scope::ToAll);
        }

        info!(
            "Session {} ('{}') disconnected, {} remaining",
            id,
            session.username,
            self.registry.len()
        );
        true
    }

    /// Drop every session, closing all connections
    pub fn shutdown(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        debug!("Closing {} session(s)", self.registry.len());
        self.registry.clear();
    }

    fn dispatch(&mut self, id: SessionId, command: Command) -> Result<(), CommandError> {
        match command {
            Command::Register(username) => self.register(id, username),
            Command::Message(body) => {
                debug!("Session {} says: {}", id, body);
                self.broadcast(id, Kind::Message, &body, Scope::ToRoom);
                Ok(())
            }
            Command::Quit => {
                self.disconnect(id);
                Ok(())
            }
            Command::Ignore(username) => self.ignore(id, username),
            Command::Enter(room) => self.enter(id, room),
            Command::Leave => self.leave(id),
            Command::Rooms => {
                self.reply(id, &self.rooms_listing());
                Ok(())
            }
            Command::Users(room) => self.users(id, &room),
            Command::Pm(body) => self.private_message(id, &body),
            Command::Help => {
                self.reply(id, HELP_TEXT);
                Ok(())
            }
            Command::Unrecognized(action) => Err(CommandError::Unsupported(action)),
        }
    }

    fn register(&mut self, id: SessionId, username: String) -> Result<(), CommandError> {
        if username.is_empty() || username.contains(char::is_whitespace) {
            return Err(CommandError::InvalidUsername);
        }
        if self.registry.exists(&username) {
            return Err(CommandError::UsernameTaken);
        }

        let Some(session) = self.registry.get_mut(id) else {
            return Ok(());
        };

        let previous = std::mem::replace(&mut session.username, username);
        if !session.in_lobby() {
            self.rooms.remove(&session.room, &previous);
            self.rooms.enter(&session.room, &session.username);
        }

        if previous.is_empty() {
            debug!("Session {} registered as '{}'", id, session.username);
        } else {
            debug!("Session {} renamed '{}' -> '{}'", id, previous, session.username);
        }

        self.broadcast(id, Kind::Connect, "", Scope::ToAll);
        Ok(())
    }

    fn ignore(&mut self, id: SessionId, username: String) -> Result<(), CommandError> {
        if username.is_empty() {
            return Err(CommandError::IgnoreUsage);
        }
        let Some(session) = self.registry.get_mut(id) else {
            return Ok(());
        };

        session.ignore(&username);
        self.broadcast(id, Kind::Ignoring, &username, Scope::ToAll);
        Ok(())
    }

    fn enter(&mut self, id: SessionId, room: String) -> Result<(), CommandError> {
        if room.is_empty() {
            return Err(CommandError::InvalidRoomName);
        }
        let Some(session) = self.registry.get_mut(id) else {
            return Ok(());
        };

        if !session.in_lobby() {
            self.rooms.remove(&session.room, &session.username);
        }
        self.rooms.enter(&room, &session.username);
        debug!("'{}' entered room '{}'", session.username, room);
        session.room = room;

        let room = session.room.clone();
        self.broadcast(id, Kind::Enter, &room, Scope::ToAll);
        Ok(())
    }

    fn leave(&mut self, id: SessionId) -> Result<(), CommandError> {
        let Some(session) = self.registry.get(id) else {
            return Ok(());
        };
        if session.in_lobby() {
            return Err(CommandError::AlreadyInLobby);
        }

        let room = session.room.clone();
        self.broadcast(id, Kind::Leave, &room, Scope::ToAll);

        if let Some(session) = self.registry.get_mut(id) {
            self.rooms.remove(&room, &session.username);
            session.room = LOBBY.to_string();
            debug!("'{}' left room '{}'", session.username, room);
        }
        Ok(())
    }

    fn users(&self, id: SessionId, room: &str) -> Result<(), CommandError> {
        let Some(session) = self.registry.get(id) else {
            return Ok(());
        };

        let names = if room.is_empty() {
            self.registry.usernames_in(&session.room)
        } else if room == LOBBY {
            self.registry.usernames_in(LOBBY)
        } else if self.rooms.contains(room) {
            self.rooms.members_of(room)
        } else {
            return Err(CommandError::NoSuchRoom);
        };

        if names.is_empty() {
            self.reply(id, "no users");
        } else {
            self.reply(id, &names.join(", "));
        }
        Ok(())
    }

    fn private_message(&self, id: SessionId, body: &str) -> Result<(), CommandError> {
        let Some((recipient, message)) = body.split_once(char::is_whitespace) else {
            return Err(CommandError::PmUsage);
        };
        let message = message.trim();
        if message.is_empty() {
            return Err(CommandError::PmUsage);
        }
        let Some(session) = self.registry.get(id) else {
            return Ok(());
        };

        router::send_private(&self.registry, &session.username, recipient, message)?;
        Ok(())
    }

    fn rooms_listing(&self) -> String {
        let active = self.rooms.list_active();
        if active.is_empty() {
            return "no active room".to_string();
        }
        active
            .iter()
            .map(|(name, count)| format!("{}({})", name, count))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn broadcast(&self, id: SessionId, kind: Kind, body: &str, scope: Scope) -> usize {
        let Some(session) = self.registry.get(id) else {
            return 0;
        };
        router::deliver(&self.registry, &Origin::of(session), kind, body, scope)
    }

    fn reply(&self, id: SessionId, text: &str) {
        router::reply(&self.registry, id, text);
    }
}
