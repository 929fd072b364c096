//! JSON Schema validation of outline output.
//!
//! Validation is advisory: a mismatch is reported and logged, but output is
//! still written. Without a schema every document counts as valid.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::DocumentResult;

use super::json::to_value;

/// Locations searched for an output schema when none is given explicitly.
pub const DEFAULT_SCHEMA_PATHS: &[&str] = &[
    "schema/output_schema.json",
    "sample_dataset/schema/output_schema.json",
    "/app/schema/output_schema.json",
];

/// Schema describing the `{title, outline}` output document.
pub const OUTLINE_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "properties": {
    "title": { "type": "string" },
    "outline": {
      "type": "array",
      "items": {
        "type": "object",
        "properties": {
          "level": { "type": "string", "enum": ["H1", "H2", "H3", "H4", "H5", "H6"] },
          "text": { "type": "string" },
          "page": { "type": "integer", "minimum": 0 }
        },
        "required": ["level", "text", "page"]
      }
    }
  },
  "required": ["title", "outline"]
}"#;

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Whether the document conforms (always true when skipped)
    pub valid: bool,
    /// Whether validation was skipped for lack of a schema
    pub skipped: bool,
    /// Human-readable violations, each prefixed with its JSON pointer
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Report for a document that was not validated.
    pub fn skipped() -> Self {
        Self {
            valid: true,
            skipped: true,
            errors: Vec::new(),
        }
    }
}

/// A compiled JSON Schema, cheap to clone and share across threads.
#[derive(Clone)]
pub struct SchemaValidator {
    validator: Arc<jsonschema::Validator>,
    source: Option<PathBuf>,
}

impl SchemaValidator {
    /// Compile a schema from a JSON value.
    pub fn from_value(schema: &Value) -> Result<Self> {
        let validator =
            jsonschema::validator_for(schema).map_err(|e| Error::Schema(e.to_string()))?;
        Ok(Self {
            validator: Arc::new(validator),
            source: None,
        })
    }

    /// Compile a schema from JSON text.
    pub fn from_json(schema: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(schema).map_err(|e| Error::Schema(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Load and compile a schema file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut validator = Self::from_json(&text)?;
        validator.source = Some(path.to_path_buf());
        Ok(validator)
    }

    /// The built-in outline schema.
    pub fn outline() -> Result<Self> {
        Self::from_json(OUTLINE_SCHEMA)
    }

    /// Load the first schema file that exists among `paths`.
    ///
    /// Returns `Ok(None)` when none exists; a file that exists but does not
    /// compile is an error.
    pub fn discover<I, P>(paths: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();
            if path.is_file() {
                log::debug!("using schema {}", path.display());
                return Self::from_file(path).map(Some);
            }
        }
        Ok(None)
    }

    /// File the schema was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Validate an arbitrary JSON value.
    pub fn validate_value(&self, instance: &Value) -> ValidationReport {
        let errors: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| {
                let pointer = e.instance_path.to_string();
                if pointer.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", pointer, e)
                }
            })
            .collect();

        ValidationReport {
            valid: errors.is_empty(),
            skipped: false,
            errors,
        }
    }

    /// Validate an outline result.
    pub fn validate(&self, result: &DocumentResult) -> Result<ValidationReport> {
        Ok(self.validate_value(&to_value(result)?))
    }
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Validate a result against an optional schema.
///
/// No schema means validation is skipped and the result counts as valid.
pub fn validate_result(
    schema: Option<&SchemaValidator>,
    result: &DocumentResult,
) -> Result<ValidationReport> {
    match schema {
        Some(validator) => validator.validate(result),
        None => Ok(ValidationReport::skipped()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry};
    use serde_json::json;

    #[test]
    fn test_outline_schema_accepts_results() {
        let validator = SchemaValidator::outline().unwrap();
        let result = DocumentResult::new(
            "Guide",
            vec![OutlineEntry {
                level: HeadingLevel::H3,
                text: "Setup".to_string(),
                page: 2,
            }],
        );
        let report = validator.validate(&result).unwrap();
        assert!(report.valid);
        assert!(!report.skipped);
        assert!(validator.validate(&DocumentResult::failed()).unwrap().valid);
    }

    #[test]
    fn test_mismatch_reports_errors() {
        let validator = SchemaValidator::outline().unwrap();
        let report = validator.validate_value(&json!({
            "title": 5,
            "outline": [{ "level": "H9", "text": "x", "page": 1 }]
        }));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().any(|e| e.starts_with("/title")));
    }

    #[test]
    fn test_missing_schema_skips() {
        let report = validate_result(None, &DocumentResult::failed()).unwrap();
        assert!(report.valid);
        assert!(report.skipped);
    }

    #[test]
    fn test_invalid_schema_is_error() {
        assert!(matches!(
            SchemaValidator::from_json("{ not json"),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            SchemaValidator::from_value(&json!({ "type": 12 })),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_discover_and_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(SchemaValidator::discover([&missing]).unwrap().is_none());

        let path = dir.path().join("schema.json");
        std::fs::write(&path, OUTLINE_SCHEMA).unwrap();
        let found = SchemaValidator::discover([&missing, &path]).unwrap().unwrap();
        assert_eq!(found.source(), Some(path.as_path()));
    }

    #[test]
    fn test_default_paths_relative_before_absolute() {
        assert_eq!(
            DEFAULT_SCHEMA_PATHS,
            &[
                "schema/output_schema.json",
                "sample_dataset/schema/output_schema.json",
                "/app/schema/output_schema.json",
            ]
        );
    }
}
