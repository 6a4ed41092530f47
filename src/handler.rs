//! TCP connection handler
//!
//! Each connection runs three tasks:
//! - reader: newline-delimited input -> unbounded raw-line queue
//! - handler: raw-line queue -> `ServerCommand::Line` for the hub
//! - writer: session outbound queue -> socket
//!
//! Whichever side finishes first ends the connection. The hub is then told
//! to tear the session down; teardown there is idempotent, so an explicit
//! `quit` followed by the socket closing is cleaned up exactly once.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::server::ServerCommand;
use crate::types::SessionId;

/// Accept connections forever, spawning a handler per connection
pub async fn serve(
    listener: TcpListener,
    cmd_tx: mpsc::Sender<ServerCommand>,
    outbound_buffer: usize,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                debug!("New connection from {}", addr);
                let cmd_tx = cmd_tx.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx, outbound_buffer).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Handle one accepted TCP connection until it closes
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
    outbound_buffer: usize,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let session_id = SessionId::new();
    info!("Session {} connected from {}", session_id, peer_addr);

    let (reader, writer) = stream.into_split();

    // Hub -> client lines
    let (out_tx, out_rx) = mpsc::channel::<String>(outbound_buffer);

    if cmd_tx
        .send(ServerCommand::Connect {
            session_id,
            sender: out_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register session {} - server closed", session_id);
        return Err(AppError::ChannelSend);
    }

    // Reader -> handler raw lines
    let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();

    let read_task = tokio::spawn(read_lines(session_id, reader, line_tx));
    let mut handle_task = tokio::spawn(forward_lines(session_id, line_rx, cmd_tx.clone()));
    let mut write_task = tokio::spawn(write_lines(session_id, writer, out_rx));

    let writer_done = tokio::select! {
        _ = &mut handle_task => {
            debug!("Input closed for {}", session_id);
            false
        }
        _ = &mut write_task => {
            debug!("Output closed for {}", session_id);
            true
        }
    };

    read_task.abort();
    handle_task.abort();

    // Implicit quit; a no-op if the session already quit
    let _ = cmd_tx.send(ServerCommand::Disconnect { session_id }).await;

    // The hub drops the session's sender, letting the writer flush and close
    if !writer_done {
        let _ = write_task.await;
    }

    debug!("Connection for session {} closed", session_id);

    Ok(())
}

/// Read newline-delimited input until EOF or an I/O error
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the
/// session. Dropping `line_tx` on return closes the queue.
async fn read_lines(
    session_id: SessionId,
    reader: OwnedReadHalf,
    line_tx: mpsc::UnboundedSender<String>,
) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                debug!("Session {} reached EOF", session_id);
                break;
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(&['\r', '\n'][..])
                    .to_string();
                if line_tx.send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!("Read error for {}: {}", session_id, e);
                break;
            }
        }
    }
}

/// Hand raw lines to the hub in arrival order
async fn forward_lines(
    session_id: SessionId,
    mut line_rx: mpsc::UnboundedReceiver<String>,
    cmd_tx: mpsc::Sender<ServerCommand>,
) {
    while let Some(line) = line_rx.recv().await {
        if cmd_tx
            .send(ServerCommand::Line { session_id, line })
            .await
            .is_err()
        {
            debug!("Server closed, ending handler for {}", session_id);
            break;
        }
    }
}

/// Write queued lines to the socket, then shut it down once
async fn write_lines(
    session_id: SessionId,
    mut writer: OwnedWriteHalf,
    mut out_rx: mpsc::Receiver<String>,
) {
    while let Some(line) = out_rx.recv().await {
        let mut bytes = line.into_bytes();
        bytes.push(b'\n');
        if let Err(e) = writer.write_all(&bytes).await {
            debug!("Write failed for {}: {}", session_id, e);
            break;
        }
    }

    let _ = writer.shutdown().await;
    debug!("Writer ended for {}", session_id);
}
