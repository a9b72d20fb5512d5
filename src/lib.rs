//! DataCore tools - WebSocket reply harness and crew asset transformer.
//!
//! Two independent utilities:
//!
//! - **Connection Harness**: open a WebSocket, send a text message, wait
//!   for exactly one reply
//! - **Record Transformer**: filter the crew list by rarity and write a
//!   symbol-to-image-URL map
//!
//! # Quick Start
//!
//! ```no_run
//! use datacore_tools::{Connection, Result, TaggedMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let connection = Connection::open("ws://localhost:5001/").await?;
//!
//!     let message = TaggedMessage::both("https://cdn.example.com/screenshot.png");
//!     let reply = connection.send_and_await_reply(message).await?;
//!     println!("{reply}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`transport`] | [`Connection`] harness and [`ReplyServer`] |
//! | [`transform`] | Crew list to asset map |
//! | [`protocol`] | Tagged message convention |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Tagged text message convention.
pub mod protocol;

/// Crew record filtering and asset map output.
pub mod transform;

/// WebSocket harness and reply server.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::ConnectionId;

// Protocol types
pub use protocol::TaggedMessage;

// Transform types
pub use transform::{AssetMap, CrewRecord, TransformConfig, TransformReport};

// Transport types
pub use transport::{Connection, ConnectionState, ReplyServer};
