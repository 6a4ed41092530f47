//! Error types for the chat server
//!
//! `AppError` covers fatal, process-level failures. `CommandError` covers
//! recoverable protocol errors whose display text is sent back to the
//! offending client verbatim. `SendError` is a failed write to one session.

use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - the hub is gone)
    #[error("Channel send error")]
    ChannelSend,

    /// Invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Protocol and validation errors
///
/// The `Display` output is the exact reply line written to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("please register using /register <username>")]
    RegistrationRequired,

    #[error("username already taken")]
    UsernameTaken,

    #[error("invalid username")]
    InvalidUsername,

    #[error("invalid room name")]
    InvalidRoomName,

    #[error("already in lobby")]
    AlreadyInLobby,

    #[error("no such room")]
    NoSuchRoom,

    #[error("no such user {0}")]
    NoSuchUser(String),

    #[error("usage: /pm <username> <message>")]
    PmUsage,

    #[error("usage: /ignore <username>")]
    IgnoreUsage,

    /// Unrecognized action
    #[error("**{0}** command not supported")]
    Unsupported(String),
}

/// Message send errors
///
/// Occurs when a payload cannot be queued on a session's outbound channel.
#[derive(Debug, Error)]
pub enum SendError {
    /// The session's outbound queue is full; the payload was dropped
    #[error("Outbound queue full")]
    Full,

    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
