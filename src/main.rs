//! Line-oriented chat server - Entry Point
//!
//! Starts the TCP listener and ChatServer actor, accepting connections
//! until Ctrl-C.

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use lobby_chat::{serve, ChatServer, ServerCommand, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=lobby_chat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lobby_chat=info")),
        )
        .init();

    let config = ServerConfig::load()?;

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Chat server listening on {}", config.bind_addr);

    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer);
    let server = tokio::spawn(ChatServer::new(cmd_rx).run());

    debug!("ChatServer actor started");

    tokio::select! {
        _ = serve(listener, cmd_tx.clone(), config.outbound_buffer) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown requested");
        }
    }

    let _ = cmd_tx.send(ServerCommand::Shutdown).await;
    let _ = server.await;

    Ok(())
}
