//! JSON rendering for outline results.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::DocumentResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a result to JSON.
pub fn to_json(result: &DocumentResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result),
        JsonFormat::Compact => serde_json::to_string(result),
    };

    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a result to a JSON value, e.g. for schema validation.
pub fn to_value(result: &DocumentResult) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(result)?)
}

/// Parse a result from JSON.
pub fn from_json(json: &str) -> Result<DocumentResult> {
    serde_json::from_str(json).map_err(|e| Error::Render(format!("JSON parse error: {}", e)))
}

/// Write a result as JSON to a file, replacing any existing content.
pub fn write_json<P: AsRef<Path>>(
    result: &DocumentResult,
    path: P,
    format: JsonFormat,
) -> Result<()> {
    let mut json = to_json(result, format)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
