use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::ChronicleRecord;

/// Errors that can occur while loading the chronicles index.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The index file does not exist at the configured path.
    #[error("Could not find chronicles index at {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Failed to read chronicles index: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in chronicles index: {0}")]
    Parse(#[from] serde_json::Error),

    /// The top-level JSON value is not an array.
    #[error("Chronicles index must be a JSON array, found {0}")]
    NotAnArray(&'static str),
}

/// Reads and decodes the chronicles index at `path`.
///
/// # Errors
///
/// - [`LoadError::MissingInput`] if the file does not exist
/// - [`LoadError::Io`] for any other read failure
/// - [`LoadError::Parse`] / [`LoadError::NotAnArray`] if the content is not a JSON array
pub fn load_chronicles(path: &Path) -> Result<Vec<ChronicleRecord>, LoadError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::MissingInput(path.to_path_buf()));
        }
        Err(e) => return Err(LoadError::Io(e)),
    };
    let records = parse_chronicles(&content)?;
    tracing::debug!(path = %path.display(), records = records.len(), "Loaded chronicles index");
    Ok(records)
}

/// Decodes a chronicles index from a JSON string.
///
/// Array elements that are not JSON objects are skipped with a warning.
/// Objects always decode; fields of the wrong type are treated as absent.
pub fn parse_chronicles(content: &str) -> Result<Vec<ChronicleRecord>, LoadError> {
    let entries = match serde_json::from_str::<Value>(content)? {
        Value::Array(entries) => entries,
        other => return Err(LoadError::NotAnArray(json_kind(&other))),
    };

    let mut records = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            tracing::warn!(
                position,
                kind = json_kind(&entry),
                "Skipping chronicles index entry that is not an object"
            );
            continue;
        }
        match ChronicleRecord::deserialize(entry) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(position, error = %e, "Skipping undecodable chronicle entry");
            }
        }
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
