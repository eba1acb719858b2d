use crate::error::FlattenError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One tuple reduced to its leaf values, keyed by composite path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlattenedRow {
    entries: BTreeMap<String, Value>,
}

impl FlattenedRow {
    pub fn new() -> Self {
        FlattenedRow::default()
    }

    /// Record a leaf value. Containers are never stored here.
    pub fn insert(&mut self, path: String, value: Value) {
        debug_assert!(!value.is_object() && !value.is_array());
        self.entries.insert(path, value);
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.entries.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Text written into the table cell for `path`: empty when the path is
    /// absent or null.
    pub fn field_text(&self, path: &str) -> String {
        match self.entries.get(path) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => sanitize_field(s),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => sanitize_field(&other.to_string()),
        }
    }
}

/// Tabs and line breaks would shift columns, so they collapse to a space.
fn sanitize_field(text: &str) -> String {
    if text.contains(['\t', '\n', '\r']) {
        text.replace(['\t', '\n', '\r'], " ")
    } else {
        text.to_string()
    }
}

/// Sorted union of all flattened paths seen across a batch of tuples
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet(BTreeSet<String>);

impl KeySet {
    pub fn new() -> Self {
        KeySet::default()
    }

    /// Add every path of `row`; paths already present are left alone.
    pub fn extend_from(&mut self, row: &FlattenedRow) {
        for path in row.paths() {
            if !self.0.contains(path) {
                self.0.insert(path.to_string());
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    /// Paths in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Configuration for flattening tuples into table rows
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Separator placed between a parent path and an object key
    pub separator: String,

    /// Maximum container nesting below the tuple itself
    pub max_depth: usize,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            separator: String::from("."),
            max_depth: 100,
        }
    }
}

impl FlattenConfig {
    /// Reject separators that would let two different documents share a
    /// path, or split a path across table columns
    pub fn validate(&self) -> Result<(), FlattenError> {
        if self.separator.is_empty() {
            return Err(FlattenError::Config("separator must not be empty".to_string()));
        }
        if self.separator.contains(['[', ']', '"', '\\', '\t', '\n', '\r']) {
            return Err(FlattenError::Config(format!(
                "separator {:?} must not contain brackets, quotes, backslashes, tabs or line breaks",
                self.separator
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_text() {
        let mut row = FlattenedRow::new();
        row.insert("s".to_string(), json!("hello"));
        row.insert("n".to_string(), json!(2.5));
        row.insert("i".to_string(), json!(7));
        row.insert("b".to_string(), json!(false));
        row.insert("z".to_string(), Value::Null);

        assert_eq!(row.field_text("s"), "hello");
        assert_eq!(row.field_text("n"), "2.5");
        assert_eq!(row.field_text("i"), "7");
        assert_eq!(row.field_text("b"), "false");
        assert_eq!(row.field_text("z"), "");
        assert_eq!(row.field_text("missing"), "");
    }

    #[test]
    fn test_field_text_strips_separators() {
        let mut row = FlattenedRow::new();
        row.insert("note".to_string(), json!("line one\nline\ttwo\r"));

        assert_eq!(row.field_text("note"), "line one line two ");
    }

    #[test]
    fn test_config_validation() {
        assert!(FlattenConfig::default().validate().is_ok());

        for separator in ["", "[", "]", "\"", "\\", "\t", "a\nb", "\r"] {
            let config = FlattenConfig {
                separator: separator.to_string(),
                ..FlattenConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(FlattenError::Config(_))),
                "separator {:?} should be rejected",
                separator
            );
        }

        let config = FlattenConfig {
            separator: String::from("__"),
            ..FlattenConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_key_set_sorted_and_deduplicated() {
        let mut first = FlattenedRow::new();
        first.insert("b".to_string(), json!(1));
        first.insert("a".to_string(), json!(2));

        let mut second = FlattenedRow::new();
        second.insert("c".to_string(), json!(3));
        second.insert("a".to_string(), json!(4));

        let mut keys = KeySet::new();
        keys.extend_from(&first);
        keys.extend_from(&second);

        assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(keys.len(), 3);
        assert!(keys.contains("c"));
    }
}
