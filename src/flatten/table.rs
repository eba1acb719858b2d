use crate::error::FlattenError;
use crate::flatten::extractor::{value_kind, JsonFlattener};
use crate::flatten::types::{FlattenedRow, KeySet};
use serde_json::Value;

/// A rectangular view over a batch of flattened tuples
///
/// The header is the sorted union of every tuple's paths. Each row holds
/// exactly one field per header key, empty where the tuple has no value.
#[derive(Debug, Clone, Default)]
pub struct Table {
    keys: KeySet,
    rows: Vec<FlattenedRow>,
}

impl Table {
    /// Parse a query response and flatten every tuple in it
    pub fn from_json(text: &str, flattener: &JsonFlattener) -> Result<Self, FlattenError> {
        let value: Value = serde_json::from_str(text)?;

        let tuples = match value {
            Value::Array(tuples) => tuples,
            other => {
                return Err(FlattenError::Shape(format!(
                    "expected a JSON array of tuples, found {}",
                    value_kind(&other)
                )))
            }
        };

        Self::from_tuples(&tuples, flattener)
    }

    /// Flatten already-parsed tuples, keeping their order
    pub fn from_tuples(tuples: &[Value], flattener: &JsonFlattener) -> Result<Self, FlattenError> {
        let mut keys = KeySet::new();
        let mut rows = Vec::with_capacity(tuples.len());

        for (idx, tuple) in tuples.iter().enumerate() {
            let row = flattener.flatten(tuple).map_err(|e| match e {
                FlattenError::Shape(msg) => FlattenError::Shape(format!("tuple {}: {}", idx, msg)),
                other => other,
            })?;
            keys.extend_from(&row);
            rows.push(row);
        }

        Ok(Table { keys, rows })
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    pub fn rows(&self) -> &[FlattenedRow] {
        &self.rows
    }

    /// Header keys joined by tabs, newline-terminated
    pub fn header_line(&self) -> String {
        let mut line = self.keys.iter().collect::<Vec<_>>().join("\t");
        line.push('\n');
        line
    }

    /// One field per header key, joined by tabs, newline-terminated
    pub fn row_line(&self, row: &FlattenedRow) -> String {
        let mut line = self
            .keys
            .iter()
            .map(|key| row.field_text(key))
            .collect::<Vec<_>>()
            .join("\t");
        line.push('\n');
        line
    }

    /// Render the whole table as tab-separated text
    pub fn to_tsv(&self) -> String {
        let mut out = self.header_line();
        for row in &self.rows {
            out.push_str(&self.row_line(row));
        }
        out
    }
}
