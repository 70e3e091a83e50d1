//! Output formatters for batch results
//!
//! Provides Table, JSON and one-line summary output.

#![allow(dead_code)]

use std::str::FromStr;

use crate::models::{BatchSummary, RunOutcome, TestRun};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Summary,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Ok(OutputFormat::JsonPretty),
            "summary" => Ok(OutputFormat::Summary),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a finished batch
    pub fn format_batch(&self, summary: &BatchSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_batch_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Summary => self.format_batch_brief(summary),
        }
    }

    /// Outcome label padded to the column width before any color is added
    fn format_outcome(&self, outcome: RunOutcome) -> String {
        let label = format!("{:<8}", format!("{} {}", outcome.symbol(), outcome));
        if !self.colorize {
            return label;
        }
        match outcome {
            RunOutcome::CompletedOk => format!("\x1b[32m{label}\x1b[0m"),
            RunOutcome::CompletedWithFailures | RunOutcome::Crashed => {
                format!("\x1b[31m{label}\x1b[0m")
            }
            RunOutcome::Pending | RunOutcome::Running => format!("\x1b[33m{label}\x1b[0m"),
        }
    }

    fn format_run_row(&self, run: &TestRun) -> String {
        let (passes, failures, baseline, duration) = run
            .report
            .as_ref()
            .map(|r| (r.passes.len(), r.failures.len(), r.baseline.len(), r.duration_seconds))
            .unwrap_or_default();

        format!(
            "{:<40} {} {:>5} {:>5} {:>5} {:>8.2}s",
            truncate(&run.script.display().to_string(), 40),
            self.format_outcome(run.outcome),
            passes,
            failures,
            baseline,
            duration
        )
    }

    fn format_batch_table(&self, summary: &BatchSummary) -> String {
        let mut output = String::new();

        output.push_str("\n┌──────────────────────────────────────────────────────────────────────────────┐\n");
        output.push_str("│ Visual Regression Results                                                    │\n");
        output.push_str("└──────────────────────────────────────────────────────────────────────────────┘\n");
        output.push_str(&format!(
            "{:<40} {:<8} {:>5} {:>5} {:>5} {:>9}\n",
            "Script", "Status", "Pass", "Fail", "New", "Duration"
        ));

        for run in &summary.runs {
            output.push_str(&self.format_run_row(run));
            output.push('\n');
        }

        let failures = if self.colorize && summary.failures > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failures)
        } else {
            summary.failures.to_string()
        };

        output.push_str("────────────────────────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "Scripts: {} | Failed screenshots: {} | Duration: {}ms\n",
            summary.total, failures, summary.duration_ms
        ));

        output
    }

    fn format_batch_brief(&self, summary: &BatchSummary) -> String {
        if summary.is_empty() {
            return "No test scripts found".to_string();
        }
        let verdict = if summary.is_success() { "PASS" } else { "FAIL" };
        format!(
            "{}: {} scripts, {} failed screenshots in {}ms",
            verdict, summary.total, summary.failures, summary.duration_ms
        )
    }
}

fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        return s.to_string();
    }
    let tail: String = s.chars().skip(count - (max - 1)).collect();
    format!("…{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScrapedReport;
    use crate::scraper::strip_ansi;

    fn summary() -> BatchSummary {
        let mut ok = TestRun::new("home_test.js", "");
        ok.start();
        ok.complete(ScrapedReport {
            passes: vec!["home_0.png".to_string()],
            duration_seconds: 1.5,
            ..Default::default()
        });

        let mut bad = TestRun::new("nav_test.js", "");
        bad.start();
        bad.complete(ScrapedReport {
            failures: vec!["nav_0.diff.png".to_string()],
            ..Default::default()
        });

        BatchSummary::new(vec![ok, bad], 1, 2400)
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("TABLE".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert_eq!("json-pretty".parse::<OutputFormat>(), Ok(OutputFormat::JsonPretty));
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_table_without_color() {
        let text = ResultFormatter::new(OutputFormat::Table)
            .no_color()
            .format_batch(&summary());

        assert!(text.contains("home_test.js"));
        assert!(text.contains("✓ PASS"));
        assert!(text.contains("✗ FAIL"));
        assert!(text.contains("Scripts: 2 | Failed screenshots: 1 | Duration: 2400ms"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_colored_rows_keep_column_alignment() {
        let summary = summary();
        let plain = ResultFormatter::new(OutputFormat::Table).no_color();
        let colored = ResultFormatter::new(OutputFormat::Table);

        for run in &summary.runs {
            let colored_row = colored.format_run_row(run);
            assert!(colored_row.contains('\x1b'));
            assert_eq!(strip_ansi(&colored_row), plain.format_run_row(run));
        }

        let row = plain.format_run_row(&summary.runs[0]);
        assert_eq!(row[..40].trim_end(), "home_test.js");
        assert!(row[41..].starts_with("✓ PASS   "));
    }

    #[test]
    fn test_json() {
        let text = ResultFormatter::new(OutputFormat::Json).format_batch(&summary());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["runs"][1]["outcome"], "completed_with_failures");
        assert_eq!(value["runs"][0]["report"]["duration_seconds"], 1.5);
    }

    #[test]
    fn test_brief() {
        let formatter = ResultFormatter::new(OutputFormat::Summary);
        assert_eq!(
            formatter.format_batch(&summary()),
            "FAIL: 2 scripts, 1 failed screenshots in 2400ms"
        );
        assert_eq!(
            formatter.format_batch(&BatchSummary::empty()),
            "No test scripts found"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "…ghij");
    }
}
