//! Builder pattern for transformer configuration.
//!
//! # Example
//!
//! ```no_run
//! use datacore_tools::TransformConfig;
//!
//! # fn example() -> datacore_tools::Result<()> {
//! let config = TransformConfig::builder()
//!     .input("website/static/structured/crew.json")
//!     .output("data/assets.json")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use url::Url;

use crate::error::{Error, Result};

use super::assets::{DEFAULT_CDN_BASE, DEFAULT_RARITY_THRESHOLD};

// ============================================================================
// TransformConfig
// ============================================================================

/// Validated parameters for one transformer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    /// Crew list to read.
    pub input: PathBuf,
    /// Asset map file to write.
    pub output: PathBuf,
    /// Records must exceed this rarity to be kept.
    pub threshold: u32,
    /// Prefix for every image fragment.
    pub cdn_base: String,
}

impl TransformConfig {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> TransformConfigBuilder {
        TransformConfigBuilder::new()
    }
}

// ============================================================================
// TransformConfigBuilder
// ============================================================================

/// Builder for [`TransformConfig`].
///
/// Threshold and CDN base fall back to [`DEFAULT_RARITY_THRESHOLD`] and
/// [`DEFAULT_CDN_BASE`].
#[derive(Debug, Default, Clone)]
pub struct TransformConfigBuilder {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    threshold: Option<u32>,
    cdn_base: Option<String>,
}

impl TransformConfigBuilder {
    /// Creates a new builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the crew list path.
    #[inline]
    #[must_use]
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Some(path.into());
        self
    }

    /// Sets the output path.
    #[inline]
    #[must_use]
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Sets the rarity threshold.
    #[inline]
    #[must_use]
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Sets the CDN base URL.
    #[inline]
    #[must_use]
    pub fn cdn_base(mut self, base: impl Into<String>) -> Self {
        self.cdn_base = Some(base.into());
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if input or output is not set
    /// - [`Error::Config`] if the CDN base is not an absolute URL
    pub fn build(self) -> Result<TransformConfig> {
        let input = self.input.ok_or_else(|| {
            Error::config("Input path is required. Use .input() to set it.")
        })?;
        let output = self.output.ok_or_else(|| {
            Error::config("Output path is required. Use .output() to set it.")
        })?;

        let cdn_base = self
            .cdn_base
            .unwrap_or_else(|| DEFAULT_CDN_BASE.to_string());
        validate_cdn_base(&cdn_base)?;

        Ok(TransformConfig {
            input,
            output,
            threshold: self.threshold.unwrap_or(DEFAULT_RARITY_THRESHOLD),
            cdn_base,
        })
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Checks that `base` is an absolute URL that can carry a path.
fn validate_cdn_base(base: &str) -> Result<()> {
    let url = Url::parse(base)
        .map_err(|e| Error::config(format!("Invalid CDN base '{base}': {e}")))?;

    if url.cannot_be_a_base() {
        return Err(Error::config(format!(
            "CDN base '{base}' cannot prefix a path"
        )));
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
