//! Scalar attribute values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single attribute value.
///
/// Feature services hand back loosely typed attribute bags; this is the
/// closed set of scalar kinds the engine represents. Anything a layer
/// reports deserializes into one of these variants, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null (also used for absent values at render time)
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer-valued number
    Int(i64),
    /// Floating-point number (also integers too large for `i64`)
    Float(f64),
    /// Free text
    Text(String),
}

impl fmt::Display for FieldValue {
    /// Renders the value as cell text: null becomes the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}
