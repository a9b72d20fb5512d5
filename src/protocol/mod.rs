//! Message conventions layered on top of the harness.
//!
//! The harness treats payloads as opaque text. Callers of the image
//! recognition endpoint prefix each payload with a short command tag
//! directly followed by the argument, e.g. `BOTHhttps://host/image.png`.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `message` | [`TaggedMessage`] composition and parsing |

// ============================================================================
// Submodules
// ============================================================================

/// Tagged text messages.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use message::{TAG_BOTH, TaggedMessage};
