//! Record Transformer.
//!
//! Turns the crew list into a lookup of full-body image URLs for every crew
//! member whose maximum rarity is above a threshold.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CrewRecord`] | One input entry |
//! | [`AssetMap`] | Symbol to URL mapping |
//! | [`TransformConfig`] | Paths, threshold and CDN base |
//! | [`TransformConfigBuilder`] | Fluent configuration builder |
//! | [`TransformReport`] | Counts from a run |
//!
//! # Example
//!
//! ```no_run
//! use datacore_tools::transform::{self, TransformConfig};
//!
//! # fn example() -> datacore_tools::Result<()> {
//! let config = TransformConfig::builder()
//!     .input("crew.json")
//!     .output("assets.json")
//!     .build()?;
//!
//! let report = transform::run(&config)?;
//! println!("{} assets", report.assets_written);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Asset map construction and output.
pub mod assets;

/// Fluent builder for transformer configuration.
pub mod builder;

/// End-to-end run.
pub mod pipeline;

/// Crew records and input loading.
pub mod record;

// ============================================================================
// Re-exports
// ============================================================================

pub use assets::{AssetMap, DEFAULT_CDN_BASE, DEFAULT_RARITY_THRESHOLD, build_asset_map, persist};
pub use builder::{TransformConfig, TransformConfigBuilder};
pub use pipeline::{TransformReport, run};
pub use record::{CrewRecord, load_records, parse_records};
