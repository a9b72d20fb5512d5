//! Error types for the harness and the transformer.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use datacore_tools::{Connection, Result};
//!
//! async fn example() -> Result<()> {
//!     let connection = Connection::open("ws://localhost:5001/").await?;
//!     let reply = connection.send_and_await_reply("ping").await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::ReplyTimeout`] |
//! | Input | [`Error::Parse`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned for malformed URLs and incomplete transformer configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Connection could not be established, or a message could not be written.
    #[error("Connection to {url} failed: {message}")]
    Connection {
        /// Endpoint URL.
        url: String,
        /// Underlying transport reason.
        message: String,
    },

    /// Connection is closed; no further messages can be sent.
    #[error("Connection closed")]
    ConnectionClosed,

    /// No reply arrived before the deadline.
    #[error("No reply after {timeout_ms}ms")]
    ReplyTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Input document is not valid JSON or does not have the expected shape.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a reply timeout error.
    #[inline]
    pub fn reply_timeout(timeout_ms: u64) -> Self {
        Self::ReplyTimeout { timeout_ms }
    }

    /// Creates a parse error.
    #[inline]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ReplyTimeout { .. })
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionClosed | Self::WebSocket(_)
        )
    }

    /// Returns `true` if the input document could not be understood.
    #[inline]
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_connection_error_display() {
        let err = Error::connection("ws://localhost:5001/", "Connection refused");
        assert_eq!(
            err.to_string(),
            "Connection to ws://localhost:5001/ failed: Connection refused"
        );
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("missing input path");
        assert_eq!(err.to_string(), "Configuration error: missing input path");
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::reply_timeout(250);
        let other_err = Error::ConnectionClosed;

        assert!(timeout_err.is_timeout());
        assert!(!other_err.is_timeout());
        assert_eq!(timeout_err.to_string(), "No reply after 250ms");
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::connection("ws://x/", "refused").is_connection_error());
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(!Error::reply_timeout(1).is_connection_error());
        assert!(!Error::parse("bad").is_connection_error());
    }

    #[test]
    fn test_is_parse_error() {
        assert!(Error::parse("not an array").is_parse_error());
        assert!(!Error::config("x").is_parse_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
