//! Row flattening and tabular text serialization.
//!
//! Feature attributes arrive as arbitrary-keyed JSON objects that differ
//! from layer to layer. This module flattens them into plain rows and
//! encodes sets of rows, possibly with heterogeneous key sets, into CSV
//! text with deterministic column ordering.

mod csv;
mod filename;
mod value;

pub use csv::{preview_columns, to_csv};
pub use filename::safe_filename;
pub use value::FieldValue;

use crate::remote::Feature;
use std::collections::BTreeMap;

/// One flattened feature: field name to scalar value.
///
/// Keys vary per source layer; nothing downstream may assume a shared
/// schema across rows.
pub type Row = BTreeMap<String, FieldValue>;

/// Reserved discriminator column used when rows from multiple layers are
/// combined into one table.
pub const LAYER_COLUMN: &str = "__layer";

/// Flatten features to their attribute rows.
///
/// A feature without attributes flattens to an empty row rather than an
/// error.
pub fn flatten_features(features: Vec<Feature>) -> Vec<Row> {
    features.into_iter().map(|f| f.attributes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_preserves_order_and_handles_missing_attributes() {
        let features: Vec<Feature> = serde_json::from_str(
            r#"[
                {"attributes": {"NAME": "one"}},
                {},
                {"attributes": {"NAME": "three"}}
            ]"#,
        )
        .unwrap();

        let rows = flatten_features(features);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["NAME"], FieldValue::Text("one".to_string()));
        assert!(rows[1].is_empty());
        assert_eq!(rows[2]["NAME"], FieldValue::Text("three".to_string()));
    }
}
