//! Tagged text messages.
//!
//! # Format
//!
//! ```text
//! <TAG><body>
//! ```
//!
//! There is no separator: the tag is matched as a literal prefix.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Ask the recognition endpoint to analyse an image in every mode it knows.
pub const TAG_BOTH: &str = "BOTH";

// ============================================================================
// TaggedMessage
// ============================================================================

/// A command tag concatenated with its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedMessage {
    /// Command tag.
    pub tag: String,
    /// Argument, typically a URL.
    pub body: String,
}

impl TaggedMessage {
    /// Creates a new tagged message.
    #[inline]
    #[must_use]
    pub fn new(tag: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            body: body.into(),
        }
    }

    /// Creates a [`TAG_BOTH`] message for an image URL.
    #[inline]
    #[must_use]
    pub fn both(image_url: impl Into<String>) -> Self {
        Self::new(TAG_BOTH, image_url)
    }

    /// Splits `text` into a message if it starts with `tag`.
    ///
    /// Returns `None` when the prefix does not match.
    #[must_use]
    pub fn parse(text: &str, tag: &str) -> Option<Self> {
        text.strip_prefix(tag).map(|body| Self::new(tag, body))
    }

    /// Renders the wire text.
    #[inline]
    #[must_use]
    pub fn into_text(self) -> String {
        let mut text = self.tag;
        text.push_str(&self.body);
        text
    }
}

impl fmt::Display for TaggedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag, self.body)
    }
}

impl From<TaggedMessage> for String {
    fn from(message: TaggedMessage) -> Self {
        message.into_text()
    }
}

// ============================================================================
// Tests
// ============================================================================
