//! JSON flattening - turn query result tuples into a tab-separated table
//!
//! Every tuple (a JSON object) is walked down to its leaf values, each
//! keyed by a composite path such as `user.address.city` or `tags[0]`.
//! The sorted union of all paths becomes the table header, and every
//! tuple becomes one row aligned to that header.

pub mod types;
pub mod extractor;
pub mod table;
pub mod writer;

pub use types::{FlattenConfig, FlattenedRow, KeySet};
pub use extractor::JsonFlattener;
pub use table::Table;
pub use writer::TableWriter;
