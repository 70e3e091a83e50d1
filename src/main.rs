//! PhantomCSS Runner - visual regression batches for CasperJS scripts
//!
//! Discovers PhantomCSS test scripts, runs each one through `casperjs test`
//! with the bundled PhantomJS/PhantomCSS/CasperJS binaries on the child's
//! search path, scrapes the console output, and reports per-screenshot
//! results plus a single pass/fail verdict for the batch.
//!
//! ## Usage
//!
//! ```bash
//! # Run every test script concurrently
//! phantomcss-runner test
//!
//! # Rebuild all baselines, one script at a time
//! phantomcss-runner test --rebaseline --sync
//!
//! # Drop stale diff/fail images, pass flags through to casperjs
//! phantomcss-runner test --clean -o --ignore-ssl-errors=true
//!
//! # Write an example test and settings file
//! phantomcss-runner init
//! ```
//!
//! Exit status is 0 when every screenshot passed (or nothing ran), 2 when
//! at least one screenshot failed, and 1 on any error.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tokio::sync::oneshot::error::RecvError;
use tracing::{error, info, warn};

mod cleanup;
mod cli;
mod config;
mod discovery;
mod executor;
mod models;
mod output;
mod scaffold;
mod scraper;
mod utils;

use cleanup::CleanMode;
use cli::{Args, Command, ConfigAction};
use config::{ConfigFile, EnvConfig, VisualTestConfig};
use executor::{Completion, ExecutorError, Orchestrator};
use models::BatchSummary;
use output::{OutputFormat, ResultFormatter};
use utils::{init_logger, LogLevel, TracingLogger};

/// Every screenshot passed, or nothing ran
const EXIT_PASSED: u8 = 0;

/// The batch completed with failed screenshots
const EXIT_FAILURES: u8 = 2;

/// A script hit a runtime error; the process stops at once
const EXIT_FATAL: i32 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = LogLevel::from_str(&args.log_level).unwrap_or_else(|e| {
        eprintln!("{e}, falling back to info");
        LogLevel::Info
    });
    init_logger(level);

    match dispatch(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;

    match args.command {
        Command::Test(test_args) => run_tests(config, test_args).await,
        Command::Clean(clean_args) => {
            let mode = if clean_args.rebaseline {
                CleanMode::Rebaseline
            } else {
                CleanMode::Failures
            };
            run_clean(&config, mode)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Init => {
            let logger = TracingLogger::default();
            scaffold::generate(&config, &logger)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config(config_args) => {
            manage_config(&config, config_args.action)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Defaults, then file, then `PHANTOMCSS_*` environment
fn load_config(args: &Args) -> Result<VisualTestConfig> {
    let env = EnvConfig::load();
    let explicit = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(PathBuf::from));

    let mut config = ConfigFile::resolve(explicit.as_deref())?.phantomcss;
    if env.has_any() {
        tracing::debug!("Applying PHANTOMCSS_* environment overrides");
        config.apply_env(&env);
    }
    Ok(config)
}

async fn run_tests(mut config: VisualTestConfig, args: cli::TestArgs) -> Result<ExitCode> {
    if let Some(dir) = args.dir {
        config = config.with_test_directory(dir);
    }
    if let Some(pattern) = args.pattern {
        config = config.with_pattern(pattern);
    }
    if args.verbose {
        config = config.verbose(true);
    }
    if args.sync {
        config = config.synchronous(true);
    }
    for option in args.options {
        config = config.with_option(option);
    }

    let formatter = args
        .format
        .as_deref()
        .map(OutputFormat::from_str)
        .transpose()
        .map_err(anyhow::Error::msg)?
        .map(ResultFormatter::new);

    for problem in config.errors() {
        warn!("{problem}");
    }

    if args.rebaseline {
        run_clean(&config, CleanMode::Rebaseline)?;
    } else if args.clean {
        run_clean(&config, CleanMode::Failures)?;
    }

    let logger = TracingLogger::default();
    let (completion, verdict) = Completion::channel();

    let summary = match Orchestrator::new()
        .run_all(&config, &logger, Some(completion))
        .await
    {
        Ok(summary) => summary,
        // The failing script's output has already been logged.
        Err(e) => match hard_stop_status(&e) {
            Some(code) => std::process::exit(code),
            None => return Err(e.into()),
        },
    };

    if let Some(formatter) = formatter {
        println!("{}", formatter.format_batch(&summary));
    }

    exit_status(&summary, verdict.await).map(ExitCode::from)
}

/// Status that must end the process immediately instead of unwinding
fn hard_stop_status(error: &ExecutorError) -> Option<i32> {
    error.is_fatal().then_some(EXIT_FATAL)
}

/// Map a finished batch and its completion verdict onto the exit status
fn exit_status(summary: &BatchSummary, verdict: Result<bool, RecvError>) -> Result<u8> {
    if summary.is_empty() {
        return Ok(EXIT_PASSED);
    }

    match verdict {
        Ok(true) => {
            info!("All visual tests passed");
            Ok(EXIT_PASSED)
        }
        Ok(false) => {
            warn!(
                "{} screenshot(s) failed across {} script(s)",
                summary.failures, summary.total
            );
            Ok(EXIT_FAILURES)
        }
        Err(_) => anyhow::bail!("Batch finished without reporting a verdict"),
    }
}

fn run_clean(config: &VisualTestConfig, mode: CleanMode) -> Result<()> {
    let logger = TracingLogger::default();
    let removed = cleanup::clean_screenshots(&config.screenshot_directory, mode, &logger)?;
    info!(
        "Removed {removed} file(s) from {}",
        config.screenshot_directory.display()
    );
    Ok(())
}

fn manage_config(config: &VisualTestConfig, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        ConfigAction::Validate => {
            config.validate()?;
            println!("Configuration is valid");
        }
        ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            ConfigFile::example().save(&path)?;
            println!("Wrote example configuration to {}", path.display());
        }
        ConfigAction::Env => {
            config::print_env_help();
        }
    }
    Ok(())
}
