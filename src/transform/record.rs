//! Crew records and input loading.
//!
//! # Format
//!
//! ```json
//! [
//!   { "symbol": "kirk_crew", "max_rarity": 5, "imageUrlFullBody": "crew_full_body/kirk.png", ... },
//!   ...
//! ]
//! ```
//!
//! Only the three fields above are read; every other field is ignored.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

// ============================================================================
// CrewRecord
// ============================================================================

/// One entry of the crew list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewRecord {
    /// Unique crew identifier.
    pub symbol: String,

    /// Highest rarity the crew member can reach. Any JSON number is accepted.
    pub max_rarity: f64,

    /// Full-body image path, relative to the asset CDN.
    #[serde(rename = "imageUrlFullBody")]
    pub image_url_full_body: String,
}

impl CrewRecord {
    /// Creates a new record.
    #[inline]
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        max_rarity: impl Into<f64>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            max_rarity: max_rarity.into(),
            image_url_full_body: image.into(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Reads and parses a crew list from `path`.
///
/// # Errors
///
/// - [`Error::Io`] if the file cannot be read
/// - [`Error::Parse`] if the document is not an array of valid records
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<CrewRecord>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;

    let records = parse_records(&json).map_err(|e| match e {
        Error::Parse { message } => Error::parse(format!("{}: {message}", path.display())),
        other => other,
    })?;

    debug!(path = %path.display(), count = records.len(), "Crew records loaded");

    Ok(records)
}

/// Parses a crew list from a JSON string.
///
/// Every entry must carry `symbol`, `max_rarity` and `imageUrlFullBody`.
///
/// # Errors
///
/// Returns [`Error::Parse`] naming the first offending entry.
pub fn parse_records(json: &str) -> Result<Vec<CrewRecord>> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| Error::parse(format!("invalid JSON: {e}")))?;

    let Value::Array(entries) = document else {
        return Err(Error::parse(format!(
            "expected an array of records, found {}",
            value_kind(&document)
        )));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            CrewRecord::deserialize(entry)
                .map_err(|e| Error::parse(format!("record {index}: {e}")))
        })
        .collect()
}

/// Returns a short name for the JSON type of `value`.
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_valid_records() {
        let json = r#"[
            {"symbol":"A","max_rarity":5,"imageUrlFullBody":"a.png"},
            {"symbol":"B","max_rarity":2,"imageUrlFullBody":"b.png"}
        ]"#;

        let records = parse_records(json).expect("valid input");
        assert_eq!(
            records,
            vec![CrewRecord::new("A", 5, "a.png"), CrewRecord::new("B", 2, "b.png")]
        );
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let json = r#"[{"symbol":"A","name":"Alpha","max_rarity":4,"imageUrlFullBody":"a.png","traits":["x"]}]"#;

        let records = parse_records(json).expect("valid input");
        assert_eq!(records, vec![CrewRecord::new("A", 4, "a.png")]);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_records("[]").expect("valid input").is_empty());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_records(r#"{"symbol":"A"}"#).unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("found an object"));
    }

    #[test]
    fn test_parse_rejects_missing_rarity() {
        let json = r#"[
            {"symbol":"A","max_rarity":5,"imageUrlFullBody":"a.png"},
            {"symbol":"B","imageUrlFullBody":"b.png"}
        ]"#;

        let err = parse_records(json).unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("record 1"));
        assert!(err.to_string().contains("max_rarity"));
    }

    #[test]
    fn test_parse_accepts_fractional_and_negative_rarity() {
        let json = r#"[
            {"symbol":"A","max_rarity":5.0,"imageUrlFullBody":"a.png"},
            {"symbol":"B","max_rarity":3.5,"imageUrlFullBody":"b.png"},
            {"symbol":"C","max_rarity":-1,"imageUrlFullBody":"c.png"}
        ]"#;

        let records = parse_records(json).expect("numeric rarity is valid");
        let rarities: Vec<f64> = records.iter().map(|r| r.max_rarity).collect();
        assert_eq!(rarities, vec![5.0, 3.5, -1.0]);
    }

    #[test]
    fn test_parse_rejects_null_rarity() {
        let json = r#"[{"symbol":"A","max_rarity":null,"imageUrlFullBody":"a.png"}]"#;
        assert!(parse_records(json).unwrap_err().is_parse_error());
    }

    #[test]
    fn test_parse_rejects_non_numeric_rarity() {
        let json = r#"[{"symbol":"A","max_rarity":"five","imageUrlFullBody":"a.png"}]"#;
        assert!(parse_records(json).unwrap_err().is_parse_error());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_records("[{").unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_load_records_from_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"symbol":"A","max_rarity":5,"imageUrlFullBody":"a.png"}}]"#
        )
        .expect("write");

        let records = load_records(file.path()).expect("load");
        assert_eq!(records, vec![CrewRecord::new("A", 5, "a.png")]);
    }

    #[test]
    fn test_load_records_names_file_on_parse_error() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "42").expect("write");

        let err = load_records(file.path()).unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_load_records_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_records(dir.path().join("crew.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
