//! Test script discovery
//!
//! Resolves a directory plus glob pattern into the list of scripts to run.
//! Brace groups such as `*{test,spec}.{js,coffee}` are expanded up front
//! because the `glob` crate only understands `*`, `?`, `**` and `[...]`.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Source of test scripts for a batch
pub trait ScriptDiscovery {
    fn discover(&self, directory: &Path, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// Filesystem discovery backed by `glob`
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobDiscovery;

impl ScriptDiscovery for GlobDiscovery {
    fn discover(&self, directory: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        find_files(directory, pattern)
    }
}

/// Files under `directory` matching `pattern`, de-duplicated and sorted
pub fn find_files(directory: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();

    for expanded in expand_braces(pattern.trim()) {
        let full = directory.join(&expanded);
        let full = full
            .to_str()
            .with_context(|| format!("Non UTF-8 glob path: {}", full.display()))?;

        let entries =
            glob::glob(full).with_context(|| format!("Invalid glob pattern: {full}"))?;

        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    found.insert(path);
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path {}: {}", e.path().display(), e),
            }
        }
    }

    Ok(found.into_iter().collect())
}

/// Expand shell-style brace groups into plain glob patterns.
///
/// Unbalanced braces are left as-is.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some((open, close)) = find_brace_group(pattern) else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let body = &pattern[open + 1..close];
    let suffix = &pattern[close + 1..];

    split_alternatives(body)
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{prefix}{alt}{suffix}")))
        .collect()
}

/// Byte offsets of the first balanced top-level `{...}` group
fn find_brace_group(pattern: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut open = None;

    for (i, c) in pattern.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    open = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return open.map(|o| (o, i));
                }
            }
            _ => {}
        }
    }

    None
}

/// Split a group body on commas that are not inside a nested group
fn split_alternatives(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}
