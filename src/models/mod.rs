//! Data models for visual regression runs
//!
//! This module contains the structures shared by the scraper, the executor
//! and the output formatters.

mod report;
mod run;

pub use report::ScrapedReport;
pub use run::{BatchSummary, RunOutcome, TestRun};
