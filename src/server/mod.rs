//! Gopher TCP server.
//!
//! Accepts connections, reads one selector per connection, hands it to the
//! pipeline and writes the response followed by the closing `.` line. Each
//! connection runs on its own task; a slow or failing client never holds up
//! the others.

mod framing;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::{MAX_SELECTOR_LENGTH, RESPONSE_TERMINATOR, SELECTOR_READ_TIMEOUT};
use crate::error_handling::InitializationError;
use crate::gophermap::GophermapLine;
use crate::pipeline::GatewayContext;

pub use framing::{needs_terminator, read_selector, SelectorError};

/// A bound Gopher listener plus the shared request context.
pub struct GopherServer {
    listener: TcpListener,
    context: GatewayContext,
}

impl GopherServer {
    /// Binds `address` (`host:port`).
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::BindError` if the socket cannot be bound.
    pub async fn bind(address: &str, context: GatewayContext) -> Result<Self, InitializationError> {
        let listener =
            TcpListener::bind(address)
                .await
                .map_err(|source| InitializationError::BindError {
                    address: address.to_string(),
                    source,
                })?;
        Ok(Self::new(listener, context))
    }

    /// Wraps an already bound listener.
    pub fn new(listener: TcpListener, context: GatewayContext) -> Self {
        Self { listener, context }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves connections until `shutdown` is cancelled.
    ///
    /// Connections already accepted are allowed to finish before this
    /// returns.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
        let local_addr = self
            .local_addr()
            .context("Failed to read listener address")?;
        info!("Gopher server listening on {local_addr}");

        let mut connections = JoinSet::new();
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let context = self.context.clone();
                            connections.spawn(async move {
                                if let Err(e) = handle_connection(stream, peer, &context).await {
                                    warn!("Connection from {peer} failed: {e:#}");
                                }
                            });
                        }
                        // Accept errors (e.g. too many open files) are per-connection
                        Err(e) => warn!("Failed to accept connection: {e}"),
                    }
                }
                Some(finished) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(join_error) = finished {
                        warn!("Connection task panicked: {join_error:?}");
                    }
                }
            }
        }

        let in_flight = connections.len();
        if in_flight > 0 {
            info!("Waiting for {in_flight} connection(s) to finish");
        }
        while let Some(finished) = connections.join_next().await {
            if let Err(join_error) = finished {
                warn!("Connection task panicked: {join_error:?}");
            }
        }
        Ok(())
    }
}

/// Serves a single connection: one selector in, one response out.
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    context: &GatewayContext,
) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let body = match read_selector(&mut reader, MAX_SELECTOR_LENGTH, SELECTOR_READ_TIMEOUT).await {
        Ok(Some(selector)) => {
            debug!("Request from {peer}");
            context.handle_selector(&selector).await
        }
        Ok(None) => {
            debug!("{peer} closed the connection without a selector");
            return Ok(());
        }
        Err(SelectorError::Io(e)) => {
            return Err(e).context("Failed to read selector");
        }
        Err(e) => {
            warn!("Rejecting request from {peer}: {e}");
            GophermapLine::error(e.to_string())
                .to_wire(context.identity())
                .into_bytes()
        }
    };

    write_half
        .write_all(&body)
        .await
        .context("Failed to write response")?;
    if needs_terminator(&body) {
        write_half
            .write_all(RESPONSE_TERMINATOR.as_bytes())
            .await
            .context("Failed to write response terminator")?;
    }
    write_half.shutdown().await.context("Failed to close connection")?;
    Ok(())
}
