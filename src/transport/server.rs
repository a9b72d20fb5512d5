//! WebSocket reply server.
//!
//! The remote end of the harness: every inbound text message is answered
//! with whatever the handler returns. Tests and demos run it as an echo
//! server (`|message| message`).
//!
//! # Connection Flow
//!
//! 1. Bind a TCP listener (port 0 lets the OS pick one)
//! 2. Accept TCP connections in a loop
//! 3. Upgrade each one to WebSocket in its own task
//! 4. Answer each text message with `handler(message)` until the peer closes

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, error, info, trace, warn};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default bind address (all interfaces).
pub const DEFAULT_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default port the recognition endpoint listens on.
pub const DEFAULT_PORT: u16 = 5001;

// ============================================================================
// ReplyServer
// ============================================================================

/// A bound WebSocket server that has not started serving yet.
///
/// # Example
///
/// ```ignore
/// use std::net::{IpAddr, Ipv4Addr};
/// use datacore_tools::transport::ReplyServer;
///
/// let server = ReplyServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
/// let ws_url = server.ws_url();
///
/// tokio::spawn(server.serve(|message| message));
/// // Connection::open(&ws_url)...
/// ```
pub struct ReplyServer {
    /// TCP listener for incoming connections.
    listener: TcpListener,
    /// Address the listener is bound to.
    local_addr: SocketAddr,
}

impl ReplyServer {
    /// Binds a server to the specified address and port.
    ///
    /// Use port 0 to let the OS assign a random available port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(ip: IpAddr, port: u16) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(ip, port)).await?;
        let local_addr = listener.local_addr()?;

        debug!(%local_addr, "Reply server bound");

        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Binds to [`DEFAULT_ADDR`]:[`DEFAULT_PORT`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind_default() -> Result<Self> {
        Self::bind(DEFAULT_ADDR, DEFAULT_PORT).await
    }

    /// Returns the port the server is bound to.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Returns the local socket address.
    #[inline]
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns the URL clients should connect to.
    ///
    /// An unspecified bind address is reported as the loopback address.
    /// Format: `ws://{ip}:{port}/`
    #[must_use]
    pub fn ws_url(&self) -> String {
        let ip = match self.local_addr.ip() {
            IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
            ip => ip,
        };

        format!("ws://{}/", SocketAddr::new(ip, self.port()))
    }

    /// Serves connections until accepting fails.
    ///
    /// Each accepted connection runs in its own task and is answered with
    /// `handler(message)` for every text message it sends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the listener stops accepting.
    pub async fn serve<F>(self, handler: F) -> Result<()>
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);

        info!(port = self.port(), "Reply server listening");

        loop {
            let (stream, peer) = self.listener.accept().await.map_err(|e| {
                error!(error = %e, "Accept failed");
                Error::Io(e)
            })?;

            debug!(%peer, "TCP connection accepted");

            tokio::spawn(run_session(stream, peer, Arc::clone(&handler)));
        }
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// Runs one session and logs how it ended.
async fn run_session<F>(stream: TcpStream, peer: SocketAddr, handler: Arc<F>)
where
    F: Fn(String) -> String + Send + Sync + 'static,
{
    match serve_session(stream, handler.as_ref()).await {
        Ok(replies) => debug!(%peer, replies, "Session closed"),
        Err(Error::WebSocket(WsError::ConnectionClosed | WsError::AlreadyClosed)) => {
            debug!(%peer, "Session closed");
        }
        Err(e) => warn!(%peer, error = %e, "Session ended with error"),
    }
}

/// Upgrades `stream` and answers text messages until the peer closes.
///
/// Returns the number of replies sent.
async fn serve_session<F>(stream: TcpStream, handler: &F) -> Result<usize>
where
    F: Fn(String) -> String,
{
    let mut ws = accept_async(stream).await?;
    let mut replies = 0;

    while let Some(message) = ws.next().await {
        match message? {
            Message::Text(text) => {
                let reply = handler(text.as_str().to_owned());
                ws.send(Message::Text(reply.into())).await?;
                replies += 1;
                trace!(replies, "Reply sent");
            }

            Message::Close(_) => break,

            // Ignore Binary, Ping, Pong
            _ => {}
        }
    }

    Ok(replies)
}

// ============================================================================
// Tests
// ============================================================================
