//! Output formatting module
//!
//! Renders batch results for the terminal or for machines.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
