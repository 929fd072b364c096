//! Rendering module: JSON output and schema validation.

mod json;
mod schema;

pub use json::{from_json, to_json, to_value, write_json, JsonFormat};
pub use schema::{
    validate_result, SchemaValidator, ValidationReport, DEFAULT_SCHEMA_PATHS, OUTLINE_SCHEMA,
};
