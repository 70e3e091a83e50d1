//! Per-script run records and the batch summary

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::ScrapedReport;

/// Lifecycle of a single script invocation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Pending,
    Running,
    /// Exited and scraped with no visual failures
    CompletedOk,
    /// Exited and scraped with at least one visual failure in its report
    CompletedWithFailures,
    /// Printed a runtime error; the batch was aborted
    Crashed,
}

impl RunOutcome {
    pub fn symbol(&self) -> &'static str {
        match self {
            RunOutcome::Pending => "·",
            RunOutcome::Running => "…",
            RunOutcome::CompletedOk => "✓",
            RunOutcome::CompletedWithFailures => "✗",
            RunOutcome::Crashed => "!",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunOutcome::CompletedOk | RunOutcome::CompletedWithFailures | RunOutcome::Crashed
        )
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Pending => write!(f, "PENDING"),
            RunOutcome::Running => write!(f, "RUNNING"),
            RunOutcome::CompletedOk => write!(f, "PASS"),
            RunOutcome::CompletedWithFailures => write!(f, "FAIL"),
            RunOutcome::Crashed => write!(f, "CRASH"),
        }
    }
}

/// One discovered script and the command that runs it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestRun {
    pub script: PathBuf,
    pub command: String,
    pub outcome: RunOutcome,
    pub report: Option<ScrapedReport>,
}

impl TestRun {
    pub fn new(script: impl Into<PathBuf>, command: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            command: command.into(),
            outcome: RunOutcome::Pending,
            report: None,
        }
    }

    /// Pending -> Running. Any other state is left untouched.
    pub fn start(&mut self) {
        if self.outcome == RunOutcome::Pending {
            self.outcome = RunOutcome::Running;
        }
    }

    /// Running -> CompletedOk / CompletedWithFailures
    pub fn complete(&mut self, report: ScrapedReport) {
        if self.outcome != RunOutcome::Running {
            return;
        }
        self.outcome = if report.has_failures() {
            RunOutcome::CompletedWithFailures
        } else {
            RunOutcome::CompletedOk
        };
        self.report = Some(report);
    }

    /// Running -> Crashed
    pub fn crash(&mut self) {
        if self.outcome == RunOutcome::Running {
            self.outcome = RunOutcome::Crashed;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn failure_count(&self) -> usize {
        self.report.as_ref().map_or(0, ScrapedReport::failure_count)
    }

    /// File name of the script, used as a short label in log lines
    pub fn file_name(&self) -> String {
        file_label(&self.script)
    }
}

impl fmt::Display for TestRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.outcome.symbol(), self.script.display())?;
        if let Some(report) = &self.report {
            write!(f, " - {report}")?;
        }
        Ok(())
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Outcome of one orchestrator invocation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub failures: usize,
    pub duration_ms: u64,
    pub finished_at: DateTime<Utc>,
    pub runs: Vec<TestRun>,
}

impl BatchSummary {
    pub fn new(runs: Vec<TestRun>, failures: usize, duration_ms: u64) -> Self {
        Self {
            total: runs.len(),
            failures,
            duration_ms,
            finished_at: Utc::now(),
            runs,
        }
    }

    /// Summary for a batch that found nothing to run
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// True iff no screenshot failed across the whole batch
    pub fn is_success(&self) -> bool {
        self.failures == 0
    }

    pub fn failed_runs(&self) -> impl Iterator<Item = &TestRun> {
        self.runs
            .iter()
            .filter(|r| r.outcome == RunOutcome::CompletedWithFailures)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Visual regression batch")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for run in &self.runs {
            writeln!(f, "  {run}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Scripts: {} | Failed screenshots: {} | Duration: {}ms",
            self.total, self.failures, self.duration_ms
        )
    }
}
