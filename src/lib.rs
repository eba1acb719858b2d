//! # AsterixDB notebook interpreter
//!
//! Sends AQL and SQL++ paragraphs to an AsterixDB cluster over its HTTP
//! query endpoints and renders the JSON response for a notebook host,
//! either as an HTML tree view or as a flattened tab-separated table.
//!
//! ## Modules
//!
//! - **flatten**: Reduce an array of JSON tuples to a rectangular table
//! - **client**: Blocking HTTP client for the `/aql` and `/sqlpp` endpoints
//! - **interpreter**: Paragraph handling, `%flat` directive, error responses
//! - **config**: Host/port settings read from interpreter properties
//!
//! ## Quick Start
//!
//! ### Flattening a result
//!
//! ```rust
//! use asterix_interpreter::flatten_json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let response = r#"[
//!     {"id": 1, "user": {"name": "Alice"}, "tags": ["a", "b"]},
//!     {"id": 2, "user": {"name": "Bob"}}
//! ]"#;
//!
//! let table = flatten_json(response)?;
//! assert_eq!(
//!     table,
//!     "id\ttags[0]\ttags[1]\tuser.name\n1\ta\tb\tAlice\n2\t\t\tBob\n"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ### Running a paragraph
//!
//! ```no_run
//! use asterix_interpreter::{Dialect, Interpreter};
//! use std::collections::HashMap;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut props = HashMap::new();
//! props.insert("asterixdb.host".to_string(), "localhost".to_string());
//!
//! let interpreter = Interpreter::from_properties(Dialect::SqlPp, &props)?;
//! interpreter.open()?;
//! let result = interpreter.interpret("%flat SELECT VALUE u FROM Users u;", "paragraph-1");
//! println!("{}", result.body);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::io::{Read, Write};

pub mod client;
pub mod config;
pub mod error;
pub mod flatten;
pub mod interpreter;
pub mod render;

// Re-export commonly used types for convenience
pub use client::{AsterixClient, Dialect, QueryExecutor};
pub use config::ClientConfig;
pub use error::{ClientError, FlattenError};
pub use flatten::{FlattenConfig, FlattenedRow, JsonFlattener, KeySet, Table, TableWriter};
pub use interpreter::{Code, InterpreterResult, Interpreter, ResultType};

/// Flatten a JSON array of tuples into tab-separated text with the default
/// path convention
pub fn flatten_json(text: &str) -> Result<String, FlattenError> {
    let table = Table::from_json(text, &JsonFlattener::default())?;
    Ok(table.to_tsv())
}

/// Read a JSON array of tuples and write it out as a table
pub fn flatten_stream<R: Read, W: Write>(
    mut reader: R,
    writer: &mut TableWriter<W>,
    config: FlattenConfig,
) -> Result<()> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .context("Failed to read input")?;

    config.validate()?;
    let flattener = JsonFlattener::new(config);
    let table = Table::from_json(&text, &flattener)?;
    writer.write_table(&table)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_json_missing_field() {
        let tsv = flatten_json(r#"[{"a":1,"b":2}, {"a":3}]"#).unwrap();

        assert_eq!(tsv, "a\tb\n1\t2\n3\t\n");
    }

    #[test]
    fn test_flatten_json_rejects_non_array() {
        assert!(matches!(
            flatten_json(r#""not an array""#),
            Err(FlattenError::Shape(_))
        ));
        assert!(matches!(flatten_json("not an array"), Err(FlattenError::Parse(_))));
    }

    #[test]
    fn test_flatten_stream() {
        let input = r#"[{"a": {"b": 1}}, {"a": {"c": "x"}}]"#.as_bytes();
        let mut writer = TableWriter::new(Vec::new());

        let config = FlattenConfig {
            separator: String::from("_"),
            ..FlattenConfig::default()
        };
        flatten_stream(input, &mut writer, config).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(output, "a_b\ta_c\n1\t\n\tx\n");
    }

    #[test]
    fn test_flatten_stream_rejects_empty_separator() {
        let input = r#"[{"a": {"bc": 1}}, {"ab": {"c": 2}}]"#.as_bytes();
        let mut writer = TableWriter::new(Vec::new());

        let config = FlattenConfig {
            separator: String::new(),
            ..FlattenConfig::default()
        };
        let err = flatten_stream(input, &mut writer, config).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FlattenError>(),
            Some(FlattenError::Config(_))
        ));
        assert!(writer.into_inner().is_empty());
    }
}
