//! Table schema inference.
//!
//! The dataset has no declared schema: columns are always inferred from the
//! first row. Later rows are never consulted, so a row missing a column renders
//! a blank cell and extra keys are ignored.

use serde_json::Value;

use crate::session::TableRow;

/// Derives the ordered column list from `rows[0]`.
///
/// Returns an empty list when there are no rows or the first row is not an
/// object.
pub fn derive_columns(rows: &[TableRow]) -> Vec<String> {
    rows.first()
        .map(|first| first.keys().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Header label shown for a column.
pub fn header_label(column: &str) -> String {
    column.to_uppercase()
}

/// Display text for the cell of `row` under `column`.
pub fn cell_text(row: &TableRow, column: &str) -> String {
    match row.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
