//! Screenshot cleanup
//!
//! Deletes generated screenshots before a run: every image when rebuilding
//! baselines, or only diff and failure artifacts.

use anyhow::Result;
use std::path::Path;

use crate::discovery::find_files;
use crate::utils::Logger;

/// Every screenshot, baselines included
pub const REBASELINE_PATTERN: &str = "**/*.png";

/// Diff and failure artifacts from earlier comparisons
pub const CLEAN_PATTERN: &str = "**/*.{diff,fail}.png";

/// Which artifacts to remove
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CleanMode {
    Rebaseline,
    Failures,
}

impl CleanMode {
    pub fn pattern(self) -> &'static str {
        match self {
            CleanMode::Rebaseline => REBASELINE_PATTERN,
            CleanMode::Failures => CLEAN_PATTERN,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CleanMode::Rebaseline => "Clearing old baseline",
            CleanMode::Failures => "Clearing failures and diffs",
        }
    }
}

/// Patterns that could match outside the target directory
pub fn is_unsafe_pattern(pattern: &str) -> bool {
    pattern.starts_with('/') || pattern.starts_with("..")
}

/// Delete files matching `pattern` under `directory`.
///
/// Returns how many files were removed. An unsafe pattern removes nothing.
/// A file that cannot be removed is logged and skipped.
pub fn clean(directory: &Path, pattern: &str, logger: &dyn Logger) -> Result<usize> {
    let pattern = pattern.trim();

    if is_unsafe_pattern(pattern) {
        logger.warn(&format!(
            "Will not clean unsafe glob pattern; [[ {} ]] will find files outside of the target directory ({})",
            pattern,
            directory.display()
        ));
        return Ok(0);
    }

    logger.debug(&format!(
        "Globbing files: [[ {}/{} ]]",
        directory.display(),
        pattern
    ));

    let mut removed = 0;
    for path in find_files(directory, pattern)? {
        match std::fs::remove_file(&path) {
            Ok(()) => {
                removed += 1;
                logger.debug(&format!("Unlinked: [[ {} ]]", path.display()));
            }
            Err(e) => logger.error(&format!(
                "Unlink failed: [[ ({:?}) {} ]]",
                e.kind(),
                path.display()
            )),
        }
    }

    Ok(removed)
}

/// Run the preset cleanup for `mode`
pub fn clean_screenshots(directory: &Path, mode: CleanMode, logger: &dyn Logger) -> Result<usize> {
    logger.info(mode.description());
    clean(directory, mode.pattern(), logger)
}
