//! Structured error types for labelsheet.
//!
//! Composition and layout are total functions and never fail. Errors only
//! come from the edges: reading JSON, configuration snapshots with the wrong
//! shape, file access in the CLI, and pre-generation validation.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type returned by all fallible labelsheet functions.
#[derive(Debug, Error)]
pub enum LabelError {
    /// Input failed to parse as JSON, or didn't match the `RunConfig` schema.
    #[error("Failed to parse configuration: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A snapshot field holds the wrong kind of value.
    #[error("Invalid configuration: field `{field}` must be {expected}")]
    Shape { field: String, expected: &'static str },

    /// A file could not be read or written.
    #[error("Cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Inputs were rejected before generation.
    #[error("{}", .0.join("\n"))]
    Invalid(Vec<String>),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl LabelError {
    pub(crate) fn shape(field: impl Into<String>, expected: &'static str) -> Self {
        LabelError::Shape {
            field: field.into(),
            expected,
        }
    }
}

impl From<serde_json::Error> for LabelError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the run configuration schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input, is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        LabelError::Parse { source: e, hint }
    }
}
