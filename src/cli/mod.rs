//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Visual regression test runner for CasperJS + PhantomCSS scripts
#[derive(Parser, Debug)]
#[command(name = "phantomcss-runner")]
#[command(version)]
#[command(about = "Run PhantomCSS visual regression tests and aggregate the results")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./phantomcss.yaml and friends)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the visual regression tests
    Test(TestArgs),

    /// Remove generated screenshots
    Clean(CleanArgs),

    /// Write an example test into the test directory
    Init,

    /// Inspect or create configuration
    Config(ConfigArgs),
}

/// Arguments for test command
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Rebuild every baseline screenshot
    #[arg(short, long)]
    pub rebaseline: bool,

    /// Clean the .diff and .fail screenshots from earlier comparisons
    #[arg(short, long)]
    pub clean: bool,

    /// Dump the raw casperjs output to the console
    #[arg(short, long)]
    pub verbose: bool,

    /// Run test scripts one at a time
    #[arg(short, long)]
    pub sync: bool,

    /// Directory containing the test scripts
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Glob pattern selecting test scripts
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Extra flag passed to casperjs (repeatable)
    #[arg(short = 'o', long = "option", allow_hyphen_values = true)]
    pub options: Vec<String>,

    /// Print a batch summary (table, json, json-pretty, summary)
    #[arg(short, long)]
    pub format: Option<String>,
}

/// Arguments for clean command
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Remove every screenshot, baselines included
    #[arg(short, long)]
    pub rebaseline: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as YAML
    Show,

    /// Check that configured paths exist
    Validate,

    /// Write an example configuration file
    Init {
        /// Destination path
        #[arg(default_value = "phantomcss.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the environment variables that override configuration
    Env,
}
