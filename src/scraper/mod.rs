//! Runner output scraper
//!
//! Turns the ANSI-colored console output of one `casperjs test` invocation
//! into a [`ScrapedReport`]. Pure: no I/O, same input gives the same report.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ScrapedReport;

/// Substring the runner prints when a script throws outside an assertion
pub const FATAL_ERROR_MARKER: &str = "error: ";

static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[.*?m").expect("valid regex"));

static PASS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"PASS No changes found for screenshot (.*)$").expect("valid regex")
});

static FAILURE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Failure! Saved to (.*)$").expect("valid regex"));

static REPORT_CARD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(PASS|FAIL) (\d+) tests? executed in ([^,]+)s, (\d+) passed, (\d+) failed, (\d+) dubious, (\d+) skipped.$",
    )
    .expect("valid regex")
});

static NEW_BASELINE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^New screenshot at (.*)$").expect("valid regex"));

/// A recognized line of runner output
#[derive(Clone, Debug, PartialEq)]
pub enum LineMatch {
    /// Screenshot matched its baseline
    Pass(String),
    /// Diff artifact saved for a mismatching screenshot
    Failure(String),
    /// Summary line printed at the end of a test suite
    ReportCard {
        duration_seconds: Option<f64>,
        dubious: u64,
        skipped: u64,
    },
    /// First capture of a screenshot, saved as its baseline
    NewBaseline(String),
}

impl LineMatch {
    /// Classify a single, already trimmed and uncolored line.
    ///
    /// Patterns are tried in a fixed order: pass, failure, report card,
    /// new baseline.
    pub fn parse(line: &str) -> Option<Self> {
        if let Some(caps) = PASS_LINE.captures(line) {
            return Some(LineMatch::Pass(caps[1].to_string()));
        }
        if let Some(caps) = FAILURE_LINE.captures(line) {
            return Some(LineMatch::Failure(caps[1].to_string()));
        }
        if let Some(caps) = REPORT_CARD_LINE.captures(line) {
            return Some(LineMatch::ReportCard {
                duration_seconds: caps[3].trim().parse().ok(),
                dubious: caps[6].parse().unwrap_or(0),
                skipped: caps[7].parse().unwrap_or(0),
            });
        }
        if let Some(caps) = NEW_BASELINE_LINE.captures(line) {
            return Some(LineMatch::NewBaseline(caps[1].to_string()));
        }
        None
    }

    fn apply(self, report: &mut ScrapedReport) {
        match self {
            LineMatch::Pass(shot) => report.passes.push(shot),
            LineMatch::Failure(shot) => report.failures.push(shot),
            LineMatch::ReportCard {
                duration_seconds,
                dubious,
                skipped,
            } => {
                if let Some(secs) = duration_seconds {
                    report.duration_seconds = secs;
                }
                report.counts.dubious = report.counts.dubious.saturating_add(dubious);
                report.counts.skipped = report.counts.skipped.saturating_add(skipped);
            }
            LineMatch::NewBaseline(shot) => report.baseline.push(shot),
        }
    }
}

/// Remove terminal color sequences (`ESC [ ... m`)
pub fn strip_ansi(output: &str) -> String {
    ANSI_ESCAPE.replace_all(output, "").into_owned()
}

/// True if the output carries the runner's runtime-error marker
pub fn has_fatal_error(output: &str) -> bool {
    output.contains(FATAL_ERROR_MARKER)
}

/// Scrape raw runner output into a report.
///
/// Lines that match none of the known patterns are ignored.
pub fn scrape_output(output: &str) -> ScrapedReport {
    let mut report = ScrapedReport::new();

    for line in strip_ansi(output).split('\n') {
        if let Some(matched) = LineMatch::parse(line.trim()) {
            matched.apply(&mut report);
        }
    }

    report
}
