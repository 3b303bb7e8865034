//! Output formatting module
//!
//! Provides output formats for the run summary.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
