//! Line-oriented multi-user chat server library
//!
//! Clients connect over TCP, pick a username and exchange broadcast,
//! room-scoped and private messages through a small slash-command protocol.
//!
//! # Protocol
//! - `/<action> <body>` runs an explicit command (`/register`, `/enter`,
//!   `/leave`, `/rooms`, `/users`, `/pm`, `/ignore`, `/help`, `/quit`)
//! - any other line registers an anonymous session, or is sent as a chat
//!   message to the sender's current room once registered
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` owns the `Hub` (client registry + room store) and applies
//!   commands one at a time
//! - Each connection runs reader, handler and writer tasks talking to the
//!   actor through channels
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use lobby_chat::{serve, ChatServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:5555").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!     serve(listener, cmd_tx, 64).await;
//! }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod hub;
pub mod message;
pub mod registry;
pub mod room;
pub mod router;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use command::{parse_line, Command, ParsedLine};
pub use config::ServerConfig;
pub use error::{AppError, CommandError, SendError};
pub use handler::{handle_connection, serve};
pub use hub::Hub;
pub use message::{Kind, Scope};
pub use registry::ClientRegistry;
pub use room::{Room, RoomStore};
pub use server::{ChatServer, ServerCommand};
pub use session::Session;
pub use types::{SessionId, LOBBY};
