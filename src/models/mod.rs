//! Data models for the shell.
//!
//! - [`DataTree`]: contents of the data view, an ordered list of named items
//!   each holding an ordered key/value map
//! - [`DataRow`]: one flattened row as rendered by the UI

pub mod data_tree;

pub use data_tree::{DataItem, DataRow, DataTree};
