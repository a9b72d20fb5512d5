//! Derived asset map: symbol to fully-qualified image URL.
//!
//! # Output Format
//!
//! ```json
//! {"assets":{"kirk_crew":"https://assets.datacore.app/crew_full_body/kirk.png"}}
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

use super::record::CrewRecord;

// ============================================================================
// Constants
// ============================================================================

/// CDN host that serves crew images.
pub const DEFAULT_CDN_BASE: &str = "https://assets.datacore.app/";

/// Records at or below this rarity are left out of the map.
pub const DEFAULT_RARITY_THRESHOLD: u32 = 3;

// ============================================================================
// AssetMap
// ============================================================================

/// Mapping from crew symbol to image URL.
///
/// Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetMap(FxHashMap<String, String>);

impl AssetMap {
    /// Creates an empty map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the URL for `symbol`.
    #[inline]
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.0.get(symbol).map(String::as_str)
    }

    /// Iterates over `(symbol, url)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Borrowed `{"assets": ...}` wrapper used for writing.
#[derive(Serialize)]
struct AssetDocument<'a> {
    assets: &'a AssetMap,
}

// ============================================================================
// Building
// ============================================================================

/// Builds the asset map from `records`.
///
/// Every record whose `max_rarity` is strictly greater than `threshold`
/// (compared as numbers, so `3.5` passes a threshold of 3)
/// contributes `symbol -> cdn_base + image_url_full_body`. The base is
/// prepended verbatim. A repeated symbol keeps the last qualifying record.
#[must_use]
pub fn build_asset_map(records: &[CrewRecord], threshold: u32, cdn_base: &str) -> AssetMap {
    let threshold = f64::from(threshold);
    let assets = records
        .iter()
        .filter(|record| record.max_rarity > threshold)
        .map(|record| {
            (
                record.symbol.clone(),
                format!("{cdn_base}{}", record.image_url_full_body),
            )
        })
        .collect();

    AssetMap(assets)
}

// ============================================================================
// Persisting
// ============================================================================

/// Writes `{"assets": map}` to `output`, replacing any existing file.
///
/// # Errors
///
/// - [`Error::Json`](crate::Error::Json) if serialization fails
/// - [`Error::Io`](crate::Error::Io) if the file cannot be written
pub fn persist(map: &AssetMap, output: impl AsRef<Path>) -> Result<()> {
    let output = output.as_ref();
    let json = serde_json::to_string(&AssetDocument { assets: map })?;

    fs::write(output, json)?;

    debug!(path = %output.display(), count = map.len(), "Asset map written");

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{BTreeSet, HashMap};

    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn sample_records() -> Vec<CrewRecord> {
        vec![
            CrewRecord::new("A", 5, "a.png"),
            CrewRecord::new("B", 2, "b.png"),
        ]
    }

    #[test]
    fn test_build_keeps_only_rarity_above_threshold() {
        let map = build_asset_map(&sample_records(), 3, DEFAULT_CDN_BASE);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("A"), Some("https://assets.datacore.app/a.png"));
        assert_eq!(map.get("B"), None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let records = vec![
            CrewRecord::new("three", 3, "3.png"),
            CrewRecord::new("four", 4, "4.png"),
        ];

        let map = build_asset_map(&records, 3, "base/");

        assert_eq!(map.get("three"), None);
        assert_eq!(map.get("four"), Some("base/4.png"));
    }

    #[test]
    fn test_fractional_rarity_compares_numerically() {
        let json = r#"[
            {"symbol":"whole","max_rarity":5.0,"imageUrlFullBody":"whole.png"},
            {"symbol":"half","max_rarity":3.5,"imageUrlFullBody":"half.png"},
            {"symbol":"exact","max_rarity":3.0,"imageUrlFullBody":"exact.png"}
        ]"#;
        let records = crate::transform::parse_records(json).expect("valid input");

        let map = build_asset_map(&records, 3, "base/");

        assert_eq!(map.get("whole"), Some("base/whole.png"));
        assert_eq!(map.get("half"), Some("base/half.png"));
        assert_eq!(map.get("exact"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_base_is_prepended_verbatim() {
        let records = vec![CrewRecord::new("A", 5, "crew/a.png")];
        let map = build_asset_map(&records, 3, "https://cdn.example.com");

        assert_eq!(map.get("A"), Some("https://cdn.example.comcrew/a.png"));
    }

    #[test]
    fn test_repeated_symbol_keeps_last_qualifying() {
        let records = vec![
            CrewRecord::new("A", 5, "first.png"),
            CrewRecord::new("A", 4, "second.png"),
            CrewRecord::new("A", 1, "ignored.png"),
        ];

        let map = build_asset_map(&records, 3, "");

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("A"), Some("second.png"));
    }

    #[test]
    fn test_empty_input_gives_empty_map() {
        assert!(build_asset_map(&[], 3, DEFAULT_CDN_BASE).is_empty());
    }

    #[test]
    fn test_persist_writes_wrapped_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("assets.json");
        let map = build_asset_map(&sample_records(), 3, DEFAULT_CDN_BASE);

        persist(&map, &output).expect("persist");

        let written = fs::read_to_string(&output).expect("read back");
        assert_eq!(
            written,
            r#"{"assets":{"A":"https://assets.datacore.app/a.png"}}"#
        );
    }

    #[test]
    fn test_persist_overwrites_existing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("assets.json");
        fs::write(&output, "x".repeat(4096)).expect("seed");

        persist(&AssetMap::new(), &output).expect("persist");

        let written: Value =
            serde_json::from_str(&fs::read_to_string(&output).expect("read back")).expect("json");
        assert_eq!(written, json!({ "assets": {} }));
    }

    #[test]
    fn test_persist_into_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("missing").join("assets.json");

        let err = persist(&AssetMap::new(), &output).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    fn arb_record() -> impl Strategy<Value = CrewRecord> {
        ("[A-E]{1,2}", 0u32..=6, "[a-z]{1,6}\\.png")
            .prop_map(|(symbol, rarity, image)| CrewRecord::new(symbol, rarity, image))
    }

    proptest! {
        #[test]
        fn prop_keys_are_exactly_rare_symbols(
            records in prop::collection::vec(arb_record(), 0..40),
        ) {
            let map = build_asset_map(&records, 3, DEFAULT_CDN_BASE);

            let expected: BTreeSet<&str> = records
                .iter()
                .filter(|r| r.max_rarity > 3.0)
                .map(|r| r.symbol.as_str())
                .collect();
            let actual: BTreeSet<&str> = map.iter().map(|(k, _)| k).collect();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn prop_values_are_base_plus_fragment(
            records in prop::collection::hash_map("[a-z]{1,8}", (0u32..=6, "[a-z]{1,6}\\.png"), 0..40),
        ) {
            let records: Vec<CrewRecord> = records
                .into_iter()
                .map(|(symbol, (rarity, image))| CrewRecord::new(symbol, rarity, image))
                .collect();
            let map = build_asset_map(&records, 3, DEFAULT_CDN_BASE);

            let by_symbol: HashMap<&str, &CrewRecord> =
                records.iter().map(|r| (r.symbol.as_str(), r)).collect();
            for (symbol, url) in map.iter() {
                let record = by_symbol[symbol];
                prop_assert!(record.max_rarity > 3.0);
                prop_assert_eq!(url, format!("{DEFAULT_CDN_BASE}{}", record.image_url_full_body));
            }
        }

        #[test]
        fn prop_build_is_idempotent(
            records in prop::collection::vec(arb_record(), 0..40),
            threshold in 0u32..=6,
        ) {
            let first = build_asset_map(&records, threshold, DEFAULT_CDN_BASE);
            let second = build_asset_map(&records, threshold, DEFAULT_CDN_BASE);
            prop_assert_eq!(first, second);
        }
    }
}
