//! Scraped report for a single test script

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Counters accumulated from every report-card line in a script's output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub dubious: u64,
    pub skipped: u64,
}

/// Structured view of one runner invocation's output
///
/// Every field defaults to empty or zero. An all-empty report is a valid
/// result: the script executed but nothing was visually compared.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedReport {
    /// Screenshots that had no baseline and were saved as the new reference
    pub baseline: Vec<String>,
    /// Screenshots that matched their baseline
    pub passes: Vec<String>,
    /// Diff artifacts saved for screenshots that did not match
    pub failures: Vec<String>,
    /// Elapsed time from the last report card, 0 if none was printed
    pub duration_seconds: f64,
    pub counts: ReportCounts,
}

impl ScrapedReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// True when no pass, failure or baseline line was recognized
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty() && self.failures.is_empty() && self.baseline.is_empty()
    }
}

impl fmt::Display for ScrapedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} baselined in {}s",
            self.passes.len(),
            self.failures.len(),
            self.baseline.len(),
            self.duration_seconds
        )?;
        if self.counts.dubious > 0 || self.counts.skipped > 0 {
            write!(
                f,
                " ({} dubious, {} skipped)",
                self.counts.dubious, self.counts.skipped
            )?;
        }
        Ok(())
    }
}
