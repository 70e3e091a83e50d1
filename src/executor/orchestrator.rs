//! Batch orchestration
//!
//! Discovers scripts, launches them, and turns each completion into log
//! lines plus an update of the shared [`ExecutionBatch`].

#![allow(dead_code)]

use futures::stream::{FuturesUnordered, StreamExt};
use std::time::Instant;

use super::batch::{Completion, ExecutionBatch};
use super::command::{build_command, PathOverlay};
use super::process::{CapturedOutput, CommandRunner, Invocation, ShellRunner};
use super::ExecutorError;
use crate::config::VisualTestConfig;
use crate::discovery::{GlobDiscovery, ScriptDiscovery};
use crate::models::{BatchSummary, ScrapedReport, TestRun};
use crate::scraper::{has_fatal_error, scrape_output};
use crate::utils::Logger;

/// Runs every discovered test script and aggregates the verdict
pub struct Orchestrator<R = ShellRunner, D = GlobDiscovery> {
    runner: R,
    discovery: D,
}

impl Orchestrator {
    /// Shell subprocesses and glob discovery
    pub fn new() -> Self {
        Self {
            runner: ShellRunner,
            discovery: GlobDiscovery,
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner, D: ScriptDiscovery> Orchestrator<R, D> {
    pub fn with_parts(runner: R, discovery: D) -> Self {
        Self { runner, discovery }
    }

    /// Run the whole batch described by `config`.
    ///
    /// `on_complete` fires once, after the last run has been handled, with
    /// `true` iff no screenshot failed. It is dropped without firing when no
    /// scripts are found or when the batch aborts.
    ///
    /// A runtime error printed by any script aborts the batch immediately
    /// with [`ExecutorError::Fatal`]; children still running are killed.
    pub async fn run_all(
        &self,
        config: &VisualTestConfig,
        logger: &dyn Logger,
        on_complete: Option<Completion>,
    ) -> Result<BatchSummary, ExecutorError> {
        let started = Instant::now();

        logger.debug("Prepending library bin directories to the child PATH");
        let overlay = PathOverlay::from_libraries(&config.libraries)?;

        logger.debug(&format!(
            "Globbing files: [[ {}/{} ]]",
            config.test_directory.display(),
            config.test_pattern
        ));
        let scripts = self
            .discovery
            .discover(&config.test_directory, &config.test_pattern)
            .map_err(|e| ExecutorError::Discovery(format!("{e:#}")))?;

        if scripts.is_empty() {
            logger.info(&format!(
                "No test files found in [[ {} ]]",
                config.test_directory.display()
            ));
            return Ok(BatchSummary::empty());
        }

        let mut runs: Vec<TestRun> = scripts
            .into_iter()
            .map(|script| {
                let command = build_command(&script, &config.execution_options);
                TestRun::new(script, command)
            })
            .collect();

        let mut ctx = BatchContext::new(config, logger, runs.len(), on_complete);

        if config.synchronous {
            for run in runs.iter_mut() {
                let invocation = launch(run, &overlay, logger, true);
                let result = self.runner.run(&invocation).await;
                ctx.settle(run, result)?;
            }
        } else {
            let mut pending = FuturesUnordered::new();
            for (index, run) in runs.iter_mut().enumerate() {
                let invocation = launch(run, &overlay, logger, false);
                let runner = &self.runner;
                pending.push(async move { (index, runner.run(&invocation).await) });
            }

            while let Some((index, result)) = pending.next().await {
                ctx.settle(&mut runs[index], result)?;
            }
        }

        let failures = ctx.batch.failures();
        let duration_ms = started.elapsed().as_millis() as u64;
        logger.debug(&format!("Batch finished in {duration_ms}ms"));
        Ok(BatchSummary::new(runs, failures, duration_ms))
    }
}

fn launch(run: &mut TestRun, overlay: &PathOverlay, logger: &dyn Logger, sync: bool) -> Invocation {
    run.start();
    logger.info(&format!("Starting [[ {} ]]...", run.script.display()));
    logger.debug(&format!(
        "Before executing{}:\n[[ {} ]]",
        if sync { " (synchronously)" } else { "" },
        run.command
    ));
    Invocation::new(run.command.clone()).with_env("PATH", overlay.value())
}

/// Per-batch state touched by every completion
struct BatchContext<'a> {
    config: &'a VisualTestConfig,
    logger: &'a dyn Logger,
    batch: ExecutionBatch,
    completion: Option<Completion>,
}

impl<'a> BatchContext<'a> {
    fn new(
        config: &'a VisualTestConfig,
        logger: &'a dyn Logger,
        total: usize,
        completion: Option<Completion>,
    ) -> Self {
        Self {
            config,
            logger,
            batch: ExecutionBatch::new(total),
            completion,
        }
    }

    fn settle(
        &mut self,
        run: &mut TestRun,
        result: Result<CapturedOutput, ExecutorError>,
    ) -> Result<(), ExecutorError> {
        match result {
            Ok(captured) => self.handle_completion(run, &captured),
            Err(e) => {
                run.crash();
                self.logger.error(&format!(
                    "Could not launch [[ {} ]]: {}",
                    run.script.display(),
                    e
                ));
                Err(e)
            }
        }
    }

    /// Shared by both execution modes
    fn handle_completion(
        &mut self,
        run: &mut TestRun,
        captured: &CapturedOutput,
    ) -> Result<(), ExecutorError> {
        let logger = self.logger;
        logger.debug(&format!("After executing [[ {} ]]", run.command));

        let output = captured.combined();

        if has_fatal_error(&output) {
            run.crash();
            logger.error(&format!(
                "Encountered error in [[ {} ]]:\n{}\n",
                run.script.display(),
                output
            ));
            return Err(ExecutorError::Fatal {
                script: run.script.clone(),
                output,
            });
        }

        let report = scrape_output(&output);

        if self.config.verbose {
            logger.info(&format!(
                "Verbose output for [[ {} ]]:\n{}\n",
                run.script.display(),
                output
            ));
        } else {
            log_report(run, &report, logger);
        }

        let failures = report.failure_count();
        run.complete(report);

        if let Some(all_passed) = self.batch.record(failures) {
            logger.debug(&format!(
                "All {} scripts finished, {} failed screenshots",
                self.batch.total(),
                self.batch.failures()
            ));
            if let Some(completion) = self.completion.take() {
                completion.fire(all_passed);
            }
        }

        Ok(())
    }
}

fn log_report(run: &TestRun, report: &ScrapedReport, logger: &dyn Logger) {
    let name = run.file_name();

    for image in &report.baseline {
        logger.success(&format!("{name}: Baselined [[ {image} ]]"));
    }

    for image in &report.failures {
        logger.error(&format!("{name}: Failed [[ {image} ]]"));
    }

    if report.has_failures() {
        return;
    }

    if !report.passes.is_empty() {
        logger.success(&format!(
            "[[ {} ]]: All tests passed in {}s",
            run.script.display(),
            report.duration_seconds
        ));
    } else if report.baseline.is_empty() {
        logger.info(&format!(
            "[[ {} ]]: Executed, but no visual tests ran (run again with --verbose to see the raw casperjs output)",
            run.script.display()
        ));
    }
}
