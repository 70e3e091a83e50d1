//! Runner command line and child search path

#![allow(dead_code)]

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

use super::ExecutorError;
use crate::config::LibraryPaths;

/// Executable resolved through the PATH overlay
pub const RUNNER_EXECUTABLE: &str = "casperjs";

/// Subcommand that runs a script in test mode
pub const RUNNER_SUBCOMMAND: &str = "test";

/// `casperjs test "<script>" <options...>`, single-space separated
pub fn build_command(script: &Path, options: &[String]) -> String {
    let mut parts = vec![
        RUNNER_EXECUTABLE.to_string(),
        RUNNER_SUBCOMMAND.to_string(),
        format!("\"{}\"", script.display()),
    ];
    parts.extend(options.iter().filter(|o| !o.is_empty()).cloned());
    parts.join(" ")
}

/// `PATH` value handed to every child of a batch.
///
/// The `bin` directories of phantomjs, phantomcss and casperjs are placed in
/// front of the inherited search path. Computed once per batch and passed to
/// each child explicitly; the host process environment is left untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathOverlay {
    value: OsString,
}

impl PathOverlay {
    /// Overlay against the current directory and the host `PATH`
    pub fn from_libraries(libraries: &LibraryPaths) -> Result<Self, ExecutorError> {
        let cwd = std::env::current_dir()
            .map_err(|e| ExecutorError::PathOverlay(format!("no working directory: {e}")))?;
        Self::build(libraries, &cwd, std::env::var_os("PATH"))
    }

    pub fn build(
        libraries: &LibraryPaths,
        base_dir: &Path,
        inherited: Option<OsString>,
    ) -> Result<Self, ExecutorError> {
        let mut entries: Vec<PathBuf> = [
            &libraries.phantomjs,
            &libraries.phantomcss,
            &libraries.casperjs,
        ]
        .into_iter()
        .map(|lib| resolve(base_dir, lib).join("bin"))
        .collect();

        if let Some(path) = inherited {
            entries.extend(
                std::env::split_paths(&path).filter(|p| !p.as_os_str().is_empty()),
            );
        }

        let value = std::env::join_paths(entries)
            .map_err(|e| ExecutorError::PathOverlay(e.to_string()))?;

        Ok(Self { value })
    }

    pub fn value(&self) -> &OsStr {
        &self.value
    }

    pub fn entries(&self) -> Vec<PathBuf> {
        std::env::split_paths(&self.value).collect()
    }
}

/// Make `path` absolute against `base`, dropping `.` components
fn resolve(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
