//! Message routing
//!
//! Computes recipient sets and queues formatted payloads on each recipient's
//! outbound channel. A failed write to one recipient never stops the rest.

use tracing::{debug, warn};

use crate::error::CommandError;
use crate::message::{format_broadcast, format_private, Kind, Scope};
use crate::registry::ClientRegistry;
use crate::session::Session;
use crate::types::SessionId;

/// Sender identity captured at the time of a delivery
///
/// Detached from the registry so a session that is being torn down can
/// still announce its departure.
#[derive(Debug, Clone)]
pub struct Origin {
    pub username: String,
    pub room: String,
}

impl Origin {
    pub fn of(session: &Session) -> Self {
        Self {
            username: session.username.clone(),
            room: session.room.clone(),
        }
    }
}

/// Broadcast `body` from `origin` to the sessions `scope` selects
///
/// Anonymous sessions neither send nor receive broadcasts. Returns the
/// number of sessions the payload was queued for.
pub fn deliver(
    registry: &ClientRegistry,
    origin: &Origin,
    kind: Kind,
    body: &str,
    scope: Scope,
) -> usize {
    // Anonymous sessions have no voice
    if origin.username.is_empty() {
        return 0;
    }

    let payload = format_broadcast(kind, &origin.username, body);
    let room_scoped = scope == Scope::ToRoom || kind == Kind::Message;

    let mut delivered = 0;
    for recipient in registry.list() {
        if !recipient.is_registered() {
            continue;
        }
        if room_scoped && recipient.room != origin.room {
            continue;
        }
        if recipient.is_ignoring(&origin.username) {
            continue;
        }

        match recipient.send(payload.clone()) {
            Ok(()) => delivered += 1,
            Err(e) => warn!(
                "Dropped {} from '{}' for session {}: {}",
                kind, origin.username, recipient.id, e
            ),
        }
    }

    debug!(
        "Delivered {} from '{}' to {} session(s)",
        kind, origin.username, delivered
    );
    delivered
}

/// Write an unframed line to one session only
///
/// Returns false if the session is gone or its queue rejected the line.
pub fn reply(registry: &ClientRegistry, id: SessionId, text: &str) -> bool {
    let Some(session) = registry.get(id) else {
        return false;
    };

    match session.send(text.to_string()) {
        Ok(()) => true,
        Err(e) => {
            warn!("Dropped reply for session {}: {}", id, e);
            false
        }
    }
}

/// Send a private message to the session registered as `recipient`
///
/// Bypasses room scoping. A recipient that ignores the sender silently
/// receives nothing; `Ok(false)` reports that case to the caller.
pub fn send_private(
    registry: &ClientRegistry,
    sender: &str,
    recipient: &str,
    body: &str,
) -> Result<bool, CommandError> {
    let Some(target) = registry.find_by_username(recipient) else {
        return Err(CommandError::NoSuchUser(recipient.to_string()));
    };

    if target.is_ignoring(sender) {
        debug!("'{}' ignores '{}', private message dropped", recipient, sender);
        return Ok(false);
    }

    match target.send(format_private(sender, body)) {
        Ok(()) => Ok(true),
        Err(e) => {
            warn!("Dropped private message for '{}': {}", recipient, e);
            Ok(false)
        }
    }
}
