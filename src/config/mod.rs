//! Configuration module
//!
//! Run settings for a visual regression batch, with defaults, validation,
//! file loading and environment overrides.

#![allow(dead_code)]

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::ConfigFile;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Install locations of the three tools the runner needs on its search path
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryPaths {
    /// CasperJS home (provides the `casperjs` executable)
    pub casperjs: PathBuf,

    /// PhantomCSS home (the visual diff library)
    pub phantomcss: PathBuf,

    /// PhantomJS home (the headless browser)
    pub phantomjs: PathBuf,
}

impl Default for LibraryPaths {
    fn default() -> Self {
        Self {
            casperjs: PathBuf::from("./node_modules/phantomcss/node_modules/casperjs"),
            phantomcss: PathBuf::from("./node_modules/phantomcss"),
            phantomjs: PathBuf::from("./node_modules/phantomcss/node_modules/phantomjs"),
        }
    }
}

impl LibraryPaths {
    /// `(name, path)` pairs, for validation and display
    pub fn entries(&self) -> [(&'static str, &Path); 3] {
        [
            ("casperjs", self.casperjs.as_path()),
            ("phantomcss", self.phantomcss.as_path()),
            ("phantomjs", self.phantomjs.as_path()),
        ]
    }
}

/// Settings for one orchestrator invocation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualTestConfig {
    /// Directory searched for test scripts
    pub test_directory: PathBuf,

    /// Glob (with brace groups) selecting scripts under `test_directory`
    pub test_pattern: String,

    /// Root of baseline, diff and failure screenshots
    pub screenshot_directory: PathBuf,

    /// Dump raw runner output instead of summarized log lines
    pub verbose: bool,

    /// Run scripts one at a time instead of all at once
    pub synchronous: bool,

    /// Flags appended, in order, to every `casperjs test` invocation
    pub execution_options: Vec<String>,

    pub libraries: LibraryPaths,
}

impl Default for VisualTestConfig {
    fn default() -> Self {
        Self {
            test_directory: PathBuf::from("assets/javascripts/tests/visual"),
            test_pattern: "**/*{test,spec}.{js,coffee}".to_string(),
            screenshot_directory: PathBuf::from(".phantomcss/screenshots"),
            verbose: false,
            synchronous: false,
            execution_options: Vec::new(),
            libraries: LibraryPaths::default(),
        }
    }
}

impl VisualTestConfig {
    pub fn with_test_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.test_directory = dir.into();
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.test_pattern = pattern.into();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn synchronous(mut self, synchronous: bool) -> Self {
        self.synchronous = synchronous;
        self
    }

    pub fn with_option(mut self, flag: impl Into<String>) -> Self {
        self.execution_options.push(flag.into());
        self
    }

    pub fn with_libraries(mut self, libraries: LibraryPaths) -> Self {
        self.libraries = libraries;
        self
    }

    /// Apply environment overrides on top of this config
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(dir) = &env.test_directory {
            self.test_directory = PathBuf::from(dir);
        }
        if let Some(pattern) = &env.test_pattern {
            self.test_pattern = pattern.clone();
        }
        if let Some(dir) = &env.screenshot_directory {
            self.screenshot_directory = PathBuf::from(dir);
        }
        if let Some(verbose) = env.verbose {
            self.verbose = verbose;
        }
        if let Some(synchronous) = env.synchronous {
            self.synchronous = synchronous;
        }
        if let Some(options) = &env.execution_options {
            self.execution_options = options.clone();
        }
    }

    /// Collect every validation problem
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, path) in self.libraries.entries() {
            if !path.exists() {
                errors.push(format!(
                    "libraries.{name}: path does not exist: {}",
                    path.display()
                ));
            }
        }

        if !self.test_directory.exists() {
            errors.push(format!(
                "test_directory: path does not exist: {}",
                self.test_directory.display()
            ));
        }

        if self.test_pattern.trim().is_empty() {
            errors.push("test_pattern: must not be empty".to_string());
        }

        errors
    }

    /// Validate configuration, reporting all problems at once
    pub fn validate(&self) -> Result<()> {
        let errors = self.errors();
        if !errors.is_empty() {
            anyhow::bail!("Invalid configuration:\n  {}", errors.join("\n  "));
        }
        Ok(())
    }
}
