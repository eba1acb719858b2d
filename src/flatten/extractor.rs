use crate::error::FlattenError;
use crate::flatten::types::{FlattenConfig, FlattenedRow};
use serde_json::{Map, Value};

/// Flattens one tuple (a JSON object) into path → leaf entries
///
/// Object keys join their parent with the configured separator (`a.x`),
/// array elements append an index (`a[0]`). Keys that are empty or that
/// contain the separator, brackets, quotes, tabs or line breaks are written
/// bracket-quoted (`["a.b"]`, `["x\ty"]`) so two different documents never
/// share a path and a path never spans two table columns.
pub struct JsonFlattener {
    config: FlattenConfig,
}

impl JsonFlattener {
    pub fn new(config: FlattenConfig) -> Self {
        JsonFlattener { config }
    }

    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    /// Flatten a single tuple. Anything other than a JSON object is rejected.
    pub fn flatten(&self, tuple: &Value) -> Result<FlattenedRow, FlattenError> {
        let Value::Object(obj) = tuple else {
            return Err(FlattenError::Shape(format!(
                "expected a JSON object, found {}",
                value_kind(tuple)
            )));
        };

        let mut row = FlattenedRow::new();
        self.flatten_object(obj, "", 0, &mut row)?;
        Ok(row)
    }

    /// Recursively walk a JSON value, recording leaves under `path`
    fn flatten_value(
        &self,
        value: &Value,
        path: &str,
        depth: usize,
        row: &mut FlattenedRow,
    ) -> Result<(), FlattenError> {
        match value {
            Value::Object(obj) => self.flatten_object(obj, path, depth + 1, row),
            Value::Array(arr) => self.flatten_array(arr, path, depth + 1, row),
            scalar => {
                row.insert(path.to_string(), scalar.clone());
                Ok(())
            }
        }
    }

    fn flatten_object(
        &self,
        obj: &Map<String, Value>,
        path: &str,
        depth: usize,
        row: &mut FlattenedRow,
    ) -> Result<(), FlattenError> {
        self.check_depth(path, depth)?;

        for (key, value) in obj.iter() {
            let child = self.join_key(path, key);
            self.flatten_value(value, &child, depth, row)?;
        }

        Ok(())
    }

    fn flatten_array(
        &self,
        arr: &[Value],
        path: &str,
        depth: usize,
        row: &mut FlattenedRow,
    ) -> Result<(), FlattenError> {
        self.check_depth(path, depth)?;

        for (idx, item) in arr.iter().enumerate() {
            let child = format!("{}[{}]", path, idx);
            self.flatten_value(item, &child, depth, row)?;
        }

        Ok(())
    }

    fn check_depth(&self, path: &str, depth: usize) -> Result<(), FlattenError> {
        if depth > self.config.max_depth {
            return Err(FlattenError::Shape(format!(
                "nesting under '{}' exceeds {} levels",
                path, self.config.max_depth
            )));
        }
        Ok(())
    }

    /// Build the path of `key` below `parent`
    fn join_key(&self, parent: &str, key: &str) -> String {
        if self.needs_quoting(key) {
            format!("{}[\"{}\"]", parent, escape_key(key))
        } else if parent.is_empty() {
            key.to_string()
        } else {
            format!("{}{}{}", parent, self.config.separator, key)
        }
    }

    fn needs_quoting(&self, key: &str) -> bool {
        key.is_empty()
            || (!self.config.separator.is_empty() && key.contains(self.config.separator.as_str()))
            || key.contains(['[', ']', '"', '\t', '\n', '\r'])
    }
}

/// Escape a key for the bracket-quoted form. Control characters become
/// two-character escapes so a path never spans columns or lines.
fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len() + 2);
    for ch in key.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl Default for JsonFlattener {
    fn default() -> Self {
        JsonFlattener::new(FlattenConfig::default())
    }
}

/// Human-readable name of a JSON value's type, for error messages
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(row: &FlattenedRow) -> Vec<&str> {
        row.paths().collect()
    }

    #[test]
    fn test_flat_object() {
        let row = JsonFlattener::default()
            .flatten(&json!({"name": "Alice", "age": 30}))
            .unwrap();

        assert_eq!(paths(&row), vec!["age", "name"]);
        assert_eq!(row.get("name").unwrap(), "Alice");
        assert_eq!(row.get("age").unwrap(), 30);
    }

    #[test]
    fn test_nested_object() {
        let row = JsonFlattener::default()
            .flatten(&json!({"a": {"x": 1, "y": 2}}))
            .unwrap();

        assert_eq!(paths(&row), vec!["a.x", "a.y"]);
        assert_eq!(row.get("a.x").unwrap(), 1);
        assert_eq!(row.get("a.y").unwrap(), 2);
    }

    #[test]
    fn test_array_elements_get_their_own_paths() {
        let row = JsonFlattener::default()
            .flatten(&json!({"a": [10, 20]}))
            .unwrap();

        assert_eq!(paths(&row), vec!["a[0]", "a[1]"]);
        assert_eq!(row.get("a[0]").unwrap(), 10);
        assert_eq!(row.get("a[1]").unwrap(), 20);
    }

    #[test]
    fn test_mixed_nesting() {
        let row = JsonFlattener::default()
            .flatten(&json!({
                "user": {
                    "posts": [
                        {"id": 10, "tags": ["rust", "json"]},
                        {"id": 11}
                    ]
                },
                "matrix": [[1, 2], [3]]
            }))
            .unwrap();

        assert_eq!(row.get("user.posts[0].id").unwrap(), 10);
        assert_eq!(row.get("user.posts[0].tags[1]").unwrap(), "json");
        assert_eq!(row.get("user.posts[1].id").unwrap(), 11);
        assert_eq!(row.get("matrix[0][1]").unwrap(), 2);
        assert_eq!(row.get("matrix[1][0]").unwrap(), 3);
        assert_eq!(row.len(), 6);
    }

    #[test]
    fn test_empty_containers_produce_no_leaves() {
        let row = JsonFlattener::default()
            .flatten(&json!({"a": {}, "b": [], "c": 1}))
            .unwrap();

        assert_eq!(paths(&row), vec!["c"]);
    }

    #[test]
    fn test_null_is_a_leaf() {
        let row = JsonFlattener::default()
            .flatten(&json!({"a": null}))
            .unwrap();

        assert_eq!(paths(&row), vec!["a"]);
        assert!(row.get("a").unwrap().is_null());
    }

    #[test]
    fn test_keys_containing_separator_are_quoted() {
        let row = JsonFlattener::default()
            .flatten(&json!({"a.b": 1, "a": {"b": 2, "c\"d": 3}, "": 4}))
            .unwrap();

        assert_eq!(row.get("[\"a.b\"]").unwrap(), 1);
        assert_eq!(row.get("a.b").unwrap(), 2);
        assert_eq!(row.get("a[\"c\\\"d\"]").unwrap(), 3);
        assert_eq!(row.get("[\"\"]").unwrap(), 4);
    }

    #[test]
    fn test_control_characters_in_keys_are_escaped() {
        let row = JsonFlattener::default()
            .flatten(&json!({"x\ty": 1, "a": {"new\nline": 2, "cr\r": 3}, "back\\slash\t": 4}))
            .unwrap();

        assert_eq!(row.get("[\"x\\ty\"]").unwrap(), 1);
        assert_eq!(row.get("a[\"new\\nline\"]").unwrap(), 2);
        assert_eq!(row.get("a[\"cr\\r\"]").unwrap(), 3);
        assert_eq!(row.get("[\"back\\\\slash\\t\"]").unwrap(), 4);
        assert!(row.paths().all(|p| !p.contains(['\t', '\n', '\r'])));
    }

    #[test]
    fn test_custom_separator() {
        let config = FlattenConfig {
            separator: String::from("/"),
            ..FlattenConfig::default()
        };
        let row = JsonFlattener::new(config)
            .flatten(&json!({"a": {"b": [true]}}))
            .unwrap();

        assert_eq!(paths(&row), vec!["a/b[0]"]);
    }

    #[test]
    fn test_non_object_tuple_rejected() {
        let flattener = JsonFlattener::default();

        for value in [json!([1, 2]), json!("text"), json!(3), json!(null)] {
            let err = flattener.flatten(&value).unwrap_err();
            assert!(matches!(err, FlattenError::Shape(_)));
        }
    }

    #[test]
    fn test_depth_limit() {
        let config = FlattenConfig {
            max_depth: 1,
            ..FlattenConfig::default()
        };
        let flattener = JsonFlattener::new(config);

        assert!(flattener.flatten(&json!({"a": {"b": 1}})).is_ok());

        let err = flattener.flatten(&json!({"a": {"b": {"c": 1}}})).unwrap_err();
        assert!(matches!(err, FlattenError::Shape(_)));
    }
}
