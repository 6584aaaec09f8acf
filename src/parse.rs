//! # Lenient Parsing
//!
//! Every numeric field a person types into the form (uniformity count, vial
//! multipliers, start cell) goes through one primitive, [`int_or`]. It never
//! fails: blank or unparsable text yields the caller's default.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Parse free text as an integer, falling back to `default`.
///
/// The text is trimmed; empty text yields `default`. Otherwise it is read as
/// a floating-point literal and truncated toward zero, so `"2.9"` is 2 and
/// `"-1.5"` is -1. Non-finite or unparsable values yield `default`.
pub fn int_or(text: &str, default: i64) -> i64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return default;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => truncate_or(v, default),
        Err(_) => default,
    }
}

fn truncate_or(v: f64, default: i64) -> i64 {
    if v.is_finite() && v.abs() < i64::MAX as f64 {
        v.trunc() as i64
    } else {
        default
    }
}

/// Append a unit to a bare numeric quantity.
///
/// Empty input stays empty. Text that already contains a letter is assumed
/// to carry its own unit and is returned trimmed but otherwise untouched.
pub fn format_with_unit(value: &str, unit: &str) -> String {
    let v = value.trim();
    if v.is_empty() {
        return String::new();
    }
    if v.chars().any(|c| c.is_ascii_alphabetic()) {
        return v.to_string();
    }
    format!("{v}{unit}")
}

/// A number as it arrives from a form or a JSON snapshot: either a real
/// JSON number or text that still has to go through [`int_or`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberText {
    Int(i64),
    Float(f64),
    Text(String),
}

impl NumberText {
    /// Resolve to an integer with the lenient rule.
    pub fn to_int(&self, default: i64) -> i64 {
        match self {
            NumberText::Int(v) => *v,
            NumberText::Float(v) => truncate_or(*v, default),
            NumberText::Text(s) => int_or(s, default),
        }
    }
}

impl Default for NumberText {
    fn default() -> Self {
        NumberText::Text(String::new())
    }
}

impl From<i64> for NumberText {
    fn from(v: i64) -> Self {
        NumberText::Int(v)
    }
}

impl From<&str> for NumberText {
    fn from(s: &str) -> Self {
        NumberText::Text(s.to_string())
    }
}

impl fmt::Display for NumberText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberText::Int(v) => write!(f, "{v}"),
            NumberText::Float(v) => write!(f, "{v}"),
            NumberText::Text(s) => f.write_str(s),
        }
    }
}
