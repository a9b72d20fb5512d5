//! Outbound WebSocket connection with FIFO reply delivery.
//!
//! # Event Loop
//!
//! Opening a connection spawns a tokio task that owns the socket and handles:
//!
//! - Outgoing messages from [`Connection::send_and_await_reply`]
//! - Incoming text messages, each handed to the oldest waiting caller
//! - Close and error events, which are logged and end the loop
//!
//! # Reply Ordering
//!
//! A waiter is queued right before its message is written, so the waiter
//! queue is in wire order. Every inbound text message resolves the oldest
//! waiter still listening. Concurrent callers on one connection thus
//! receive replies in the order their messages were sent. Messages are not
//! matched by content: a peer that answers out of order, or not at all,
//! shifts every later reply by one.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::ConnectionId;

// ============================================================================
// Types
// ============================================================================

/// Client-side WebSocket stream.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of the client stream.
type WsSink = SplitSink<WsStream, Message>;

/// Channel resolving one parked caller.
type ReplySender = oneshot::Sender<Result<String>>;

/// Parked callers, oldest first.
type WaiterQueue = VecDeque<ReplySender>;

// ============================================================================
// ConnectionState
// ============================================================================

/// Lifecycle state of an opened connection.
///
/// A handle only exists once the handshake has completed, so the
/// connecting phase is the [`Connection::open`] future itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake completed; messages can be sent.
    Open,
    /// Closed by the caller, by the peer, or by a transport error.
    Closed,
}

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Queue a waiter and write a text message.
    Send { text: String, reply_tx: ReplySender },
    /// Send a close frame and stop.
    Close,
}

// ============================================================================
// Connection
// ============================================================================

/// Handle to an open WebSocket connection.
///
/// Cloning is cheap; all clones share the same socket and waiter queue.
/// When the last clone is dropped the event loop closes the socket.
#[derive(Clone)]
pub struct Connection {
    /// Identifier used in log fields.
    id: ConnectionId,
    /// Endpoint this connection was opened against.
    url: Url,
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Parked callers (shared with event loop).
    waiters: Arc<Mutex<WaiterQueue>>,
    /// Lifecycle state (written by event loop).
    state: Arc<Mutex<ConnectionState>>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("url", &self.url.as_str())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Opens a connection to `url`.
    ///
    /// Makes exactly one attempt and resolves once the WebSocket handshake
    /// has completed.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `url` is not a valid `ws://` URL
    /// - [`Error::Connection`] if the peer is unreachable, refuses, or
    ///   fails the handshake
    pub async fn open(url: &str) -> Result<Self> {
        let url = parse_ws_url(url)?;

        debug!(%url, "Connecting");

        let (ws_stream, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::connection(url.as_str(), e.to_string()))?;

        let connection = Self::new(ws_stream, url);

        info!(
            conn = %connection.id,
            url = %connection.url,
            "WebSocket connection established"
        );

        Ok(connection)
    }

    /// Wraps an established stream and spawns its event loop.
    fn new(ws_stream: WsStream, url: Url) -> Self {
        let id = ConnectionId::generate();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let waiters = Arc::new(Mutex::new(WaiterQueue::new()));
        let state = Arc::new(Mutex::new(ConnectionState::Open));

        tokio::spawn(Self::run_event_loop(
            id,
            url.clone(),
            ws_stream,
            command_rx,
            Arc::clone(&waiters),
            Arc::clone(&state),
        ));

        Self {
            id,
            url,
            command_tx,
            waiters,
            state,
        }
    }

    /// Returns the connection identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns the endpoint URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    /// Returns the number of callers still waiting for a reply.
    #[must_use]
    pub fn pending_replies(&self) -> usize {
        self.waiters
            .lock()
            .iter()
            .filter(|reply_tx| !reply_tx.is_closed())
            .count()
    }

    /// Sends `message` and waits for the next reply delivered to this call.
    ///
    /// There is no deadline. If the peer never answers, or closes the
    /// connection after the message was written, this call stays suspended.
    /// Use [`send_and_await_reply_timeout`](Self::send_and_await_reply_timeout)
    /// to bound the wait.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the connection is already closed
    /// - [`Error::Connection`] if the message could not be written
    pub async fn send_and_await_reply(&self, message: impl Into<String>) -> Result<String> {
        let reply_rx = self.enqueue(message.into())?;

        match reply_rx.await {
            Ok(result) => result,
            Err(_) => Err(Error::ConnectionClosed),
        }
    }

    /// Sends `message` and waits at most `reply_timeout` for its reply.
    ///
    /// On timeout the waiter is abandoned; the next inbound message goes to
    /// the following waiter, or is dropped if there is none.
    ///
    /// # Errors
    ///
    /// - [`Error::ReplyTimeout`] if no reply arrives in time
    /// - [`Error::ConnectionClosed`] if the connection is already closed
    /// - [`Error::Connection`] if the message could not be written
    pub async fn send_and_await_reply_timeout(
        &self,
        message: impl Into<String>,
        reply_timeout: Duration,
    ) -> Result<String> {
        let reply_rx = self.enqueue(message.into())?;

        match timeout(reply_timeout, reply_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => Err(Error::reply_timeout(reply_timeout.as_millis() as u64)),
        }
    }

    /// Asks the event loop to send a close frame and stop.
    ///
    /// Callers already waiting for a reply are left waiting.
    pub fn close(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Close);
    }

    /// Hands a message to the event loop and returns the reply channel.
    fn enqueue(&self, text: String) -> Result<oneshot::Receiver<Result<String>>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(ConnectionCommand::Send { text, reply_tx })
            .map_err(|_| Error::ConnectionClosed)?;

        Ok(reply_rx)
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop(
        id: ConnectionId,
        url: Url,
        ws_stream: WsStream,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        waiters: Arc<Mutex<WaiterQueue>>,
        state: Arc<Mutex<ConnectionState>>,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Incoming messages from the peer
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::deliver_reply(id, text.as_str().to_owned(), &waiters);
                        }

                        Some(Ok(Message::Close(frame))) => {
                            debug!(conn = %id, ?frame, "WebSocket closed by remote");
                            // Flush the queued close reply to finish the handshake
                            let _ = ws_write.close().await;
                            break;
                        }

                        Some(Err(e)) => {
                            warn!(conn = %id, error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!(conn = %id, "WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Commands from callers
                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send { text, reply_tx }) => {
                            Self::handle_send_command(
                                id,
                                &url,
                                text,
                                reply_tx,
                                &mut ws_write,
                                &waiters,
                            ).await;
                        }

                        Some(ConnectionCommand::Close) => {
                            debug!(conn = %id, "Close requested");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!(conn = %id, "All handles dropped");
                            let _ = ws_write.close().await;
                            break;
                        }
                    }
                }
            }
        }

        *state.lock() = ConnectionState::Closed;

        let parked = waiters
            .lock()
            .iter()
            .filter(|reply_tx| !reply_tx.is_closed())
            .count();
        if parked > 0 {
            debug!(conn = %id, parked, "Connection closed with callers still waiting");
        }

        debug!(conn = %id, "Event loop terminated");
    }

    /// Queues a waiter, then writes its message.
    async fn handle_send_command(
        id: ConnectionId,
        url: &Url,
        text: String,
        reply_tx: ReplySender,
        ws_write: &mut WsSink,
        waiters: &Arc<Mutex<WaiterQueue>>,
    ) {
        let len = text.len();

        // Queue before writing so a fast reply finds its waiter
        {
            let mut waiters = waiters.lock();
            waiters.retain(|waiter| !waiter.is_closed());
            waiters.push_back(reply_tx);
        }

        if let Err(e) = ws_write.send(Message::Text(text.into())).await {
            warn!(conn = %id, error = %e, "Failed to send message");

            // Only this task touches the queue, so the back entry is ours
            if let Some(reply_tx) = waiters.lock().pop_back() {
                let _ = reply_tx.send(Err(Error::connection(url.as_str(), e.to_string())));
            }
            return;
        }

        trace!(conn = %id, len, "Message sent");
    }

    /// Resolves the oldest live waiter with `text`.
    fn deliver_reply(id: ConnectionId, mut text: String, waiters: &Arc<Mutex<WaiterQueue>>) {
        let mut waiters = waiters.lock();

        while let Some(reply_tx) = waiters.pop_front() {
            match reply_tx.send(Ok(text)) {
                Ok(()) => {
                    trace!(conn = %id, remaining = waiters.len(), "Reply delivered");
                    return;
                }
                // Receiver gone (timed out or dropped): offer to the next one
                Err(unclaimed) => match unclaimed {
                    Ok(returned) => text = returned,
                    Err(_) => return,
                },
            }
        }

        debug!(conn = %id, len = text.len(), "Dropped message with no waiting caller");
    }
}

// ============================================================================
// URL Validation
// ============================================================================

/// Parses and validates a `ws://` endpoint URL.
fn parse_ws_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| Error::config(format!("Invalid WebSocket URL '{raw}': {e}")))?;

    if url.scheme() != "ws" {
        return Err(Error::config(format!(
            "Unsupported URL scheme '{}' in '{raw}': expected ws://",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(Error::config(format!("WebSocket URL '{raw}' has no host")));
    }

    Ok(url)
}

// ============================================================================
// Tests
// ============================================================================
