//! Server configuration
//!
//! Resolved from the command line and environment at startup.

use std::env;

use crate::error::AppError;

/// Default server address
pub const DEFAULT_ADDR: &str = "127.0.0.1:5555";

/// Channel buffer size for hub commands
pub const DEFAULT_COMMAND_BUFFER: usize = 256;

/// Per-session outbound queue capacity
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

const ADDR_VAR: &str = "LOBBY_CHAT_ADDR";
const OUTBOUND_BUFFER_VAR: &str = "LOBBY_CHAT_OUTBOUND_BUFFER";

/// Runtime settings for the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub bind_addr: String,
    /// Capacity of the hub's command inbox
    pub command_buffer: usize,
    /// Capacity of each session's outbound queue
    pub outbound_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_ADDR.to_string(),
            command_buffer: DEFAULT_COMMAND_BUFFER,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

impl ServerConfig {
    /// Load from process arguments and environment
    ///
    /// The first argument wins over `LOBBY_CHAT_ADDR` for the bind address.
    pub fn load() -> Result<Self, AppError> {
        Self::resolve(
            env::args().nth(1),
            env::var(ADDR_VAR).ok(),
            env::var(OUTBOUND_BUFFER_VAR).ok(),
        )
    }

    fn resolve(
        arg_addr: Option<String>,
        env_addr: Option<String>,
        env_outbound: Option<String>,
    ) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(addr) = arg_addr.or(env_addr) {
            config.bind_addr = addr;
        }

        if let Some(raw) = env_outbound {
            config.outbound_buffer = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(AppError::Config(format!(
                        "{} must be a positive integer, got '{}'",
                        OUTBOUND_BUFFER_VAR, raw
                    )))
                }
            };
        }

        Ok(config)
    }
}
