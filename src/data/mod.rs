//! Value parsing and formatting shared by the configuration layer and
//! the renderer.
//!
//! - [`duration`]: Parsing of interval/timeout strings (e.g., "1s", "500ms", "1m30s")
//! - [`humanize`]: Thousands-grouped number formatting for table cells

pub mod duration;
pub mod humanize;

pub use duration::{format_duration, parse_duration, DurationError};
pub use humanize::comma;
