//! Normalized sheet rows.

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;

use crate::common::generate_content_hash;

/// Column holding the product key after header normalization.
pub const PART_NO: &str = "part_no";

/// First data row of a worksheet (row 1 holds the headers).
pub const FIRST_DATA_ROW: usize = 2;

/// A sheet row with normalized headers and trimmed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    pub row_number: usize,
    pub sheet_name: String,
    pub fields: IndexMap<String, String>,
}

impl ProductRecord {
    pub fn new(row_number: usize, sheet_name: impl Into<String>, fields: IndexMap<String, String>) -> Self {
        Self {
            row_number,
            sheet_name: sheet_name.into(),
            fields,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Part number, or `""` when the column is missing.
    pub fn part_no(&self) -> &str {
        self.get(PART_NO).unwrap_or("")
    }
}

/// `"Part No"` → `part_no`, `" Ship-Weight "` → `ship_weight`.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace([' ', '-'], "_")
}

/// True when every cell of the row is blank.
pub fn is_blank_row<'a>(values: impl IntoIterator<Item = &'a String>) -> bool {
    values.into_iter().all(|v| v.trim().is_empty())
}

/// Normalize headers and trim values, keeping column order.
pub fn normalize_fields(raw: &IndexMap<String, String>) -> IndexMap<String, String> {
    raw.iter()
        .map(|(key, value)| (normalize_header(key), value.trim().to_string()))
        .collect()
}

/// Order-insensitive fingerprint of a set of records, used to detect edits.
pub fn products_fingerprint(records: &[ProductRecord]) -> Result<String> {
    let mut sorted: Vec<&ProductRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.part_no()
            .cmp(b.part_no())
            .then(a.row_number.cmp(&b.row_number))
    });
    Ok(generate_content_hash(&sorted)?)
}
