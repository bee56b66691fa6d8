//! CSV encoding for heterogeneous row sets.

use super::Row;
use std::collections::BTreeSet;

/// Encode rows as CSV text.
///
/// The column set is the union of keys across all rows: different source
/// layers carry different fields, and a combined export concatenates rows
/// from many layers into one table. Columns named in `preferred_first`
/// come first (in the order given, skipping any not present in the union),
/// followed by the remaining columns in lexicographic order.
///
/// Cells are stringified with null/absent as the empty string; a value
/// containing a comma, quote, or line break is quoted with inner quotes
/// doubled. An empty row set produces an empty string, never a header
/// with no body.
pub fn to_csv(rows: &[Row], preferred_first: &[&str]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut union: BTreeSet<&str> = BTreeSet::new();
    for row in rows {
        for key in row.keys() {
            union.insert(key.as_str());
        }
    }

    let mut columns: Vec<&str> = Vec::with_capacity(union.len());
    for key in preferred_first {
        if union.remove(*key) {
            columns.push(*key);
        }
    }
    columns.extend(union);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(encode_line(columns.iter().map(|c| c.to_string())));
    for row in rows {
        lines.push(encode_line(columns.iter().map(|c| cell_text(row, c))));
    }
    lines.join("\n")
}

/// Pick the columns for a bounded on-screen preview table: the first
/// `max_fields` columns of the first row.
pub fn preview_columns(rows: &[Row], max_fields: usize) -> Vec<String> {
    match rows.first() {
        Some(row) => row.keys().take(max_fields).cloned().collect(),
        None => Vec::new(),
    }
}

fn cell_text(row: &Row, column: &str) -> String {
    match row.get(column) {
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

fn encode_line(cells: impl Iterator<Item = String>) -> String {
    cells
        .map(|cell| escape_cell(&cell))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_cell(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
