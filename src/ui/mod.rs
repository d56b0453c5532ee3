//! Terminal rendering.
//!
//! - [`table`]: the per-node topic/channel table

pub mod table;

pub use table::{render, render_error, table_rows, TableRow, COLUMNS, PLACEHOLDER};
