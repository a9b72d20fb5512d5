//! One-shot load, filter and write run.

// ============================================================================
// Imports
// ============================================================================

use tracing::info;

use crate::error::Result;

use super::assets::{build_asset_map, persist};
use super::builder::TransformConfig;
use super::record::load_records;

// ============================================================================
// TransformReport
// ============================================================================

/// Counts from a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformReport {
    /// Records parsed from the input.
    pub records_read: usize,
    /// Entries written to the output.
    pub assets_written: usize,
}

// ============================================================================
// Run
// ============================================================================

/// Loads the crew list, builds the asset map and writes it.
///
/// Nothing is written unless loading and parsing succeed.
///
/// # Errors
///
/// - [`Error::Io`](crate::Error::Io) if the input cannot be read or the
///   output cannot be written
/// - [`Error::Parse`](crate::Error::Parse) if the input is malformed
pub fn run(config: &TransformConfig) -> Result<TransformReport> {
    let records = load_records(&config.input)?;
    let assets = build_asset_map(&records, config.threshold, &config.cdn_base);
    persist(&assets, &config.output)?;

    let report = TransformReport {
        records_read: records.len(),
        assets_written: assets.len(),
    };

    info!(
        input = %config.input.display(),
        output = %config.output.display(),
        threshold = config.threshold,
        records = report.records_read,
        assets = report.assets_written,
        "Asset map generated"
    );

    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================
