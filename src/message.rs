//! Outbound payload formats
//!
//! Every payload is one line of text (help is the one multi-line reply).

use std::fmt;

/// What a broadcast is about; selects the payload format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Chat text, `[<username>] <body>`
    Message,
    Connect,
    Disconnect,
    Ignoring,
    Enter,
    Leave,
}

impl Kind {
    /// Marker used in announcement payloads
    pub fn marker(self) -> &'static str {
        match self {
            Kind::Message => "message",
            Kind::Connect => "connect",
            Kind::Disconnect => "disconnect",
            Kind::Ignoring => "ignoring",
            Kind::Enter => "enter",
            Kind::Leave => "leave",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Recipient set for a broadcast
///
/// Replies to the sender alone are not broadcasts; they go out unframed
/// through `router::reply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Registered sessions in the sender's room
    ToRoom,
    /// Every registered session
    ToAll,
}

/// Format a broadcast payload
///
/// An empty body leaves no trailing space behind.
pub fn format_broadcast(kind: Kind, username: &str, body: &str) -> String {
    let head = match kind {
        Kind::Message => format!("[{}]", username),
        _ => format!("**{}** [{}]", kind, username),
    };
    if body.is_empty() {
        head
    } else {
        format!("{} {}", head, body)
    }
}

/// Format a private message payload
pub fn format_private(sender: &str, body: &str) -> String {
    format!("**pm** [{}] {}", sender, body)
}
