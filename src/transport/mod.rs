//! WebSocket transport layer.
//!
//! The Connection Harness sends a text message and waits for exactly one
//! reply. The reply server is the other end of that exchange.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                              ┌──────────────────┐
//! │  Caller (Rust)   │                              │  Remote end      │
//! │                  │         WebSocket            │                  │
//! │  Connection      │◄────────────────────────────►│  ReplyServer     │
//! │  (event loop)    │      ws://host:PORT/         │  (handler)       │
//! └──────────────────┘                              └──────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::open` - One connection attempt, resolves when open
//! 2. `Connection::send_and_await_reply` - Send, park until a reply arrives
//! 3. `Connection::close` - Or the peer closes; in-flight waits stay parked
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Outbound connection and event loop |
//! | `server` | Reply server binding and sessions |

// ============================================================================
// Submodules
// ============================================================================

/// Outbound WebSocket connection and event loop.
pub mod connection;

/// WebSocket reply server.
pub mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, ConnectionState};
pub use server::{DEFAULT_ADDR, DEFAULT_PORT, ReplyServer};
