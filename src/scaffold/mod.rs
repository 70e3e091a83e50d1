//! Example test scaffolding
//!
//! Writes a runnable PhantomCSS test and its JSON settings into the test
//! directory so a new project has something to execute.

use anyhow::{Context, Result};
use serde_json::json;
use std::path::{Component, Path, PathBuf};

use crate::config::VisualTestConfig;
use crate::utils::Logger;

pub const SETTINGS_FILE: &str = "config.json";
pub const EXAMPLE_TEST_FILE: &str = "example_test.js";

const EXAMPLE_URL: &str = "http://getbootstrap.com/examples/navbar/";

const EXAMPLE_TEST: &str = r#"var phantomcss = require('phantomcss');
var config = require('./config.json');

phantomcss.init(config.init);

casper
  .start(config.url)
  .viewport(config.viewport.width, config.viewport.height);

casper.then(function() {
  phantomcss.screenshot('body', 'navbar/dropdown/closed');
});

casper.then(function() {
  casper.click('#navbar .dropdown > a');
  phantomcss.screenshot('body', 'navbar/dropdown/open');
});

casper.then(function() {
  phantomcss.compareSession();
});

casper.then(function() {
  casper.test.done();
});

casper.run(function() {
  phantom.exit(phantomcss.getExitStatus());
});
"#;

/// Settings document read by the example test
pub fn settings_json(config: &VisualTestConfig) -> serde_json::Value {
    let cwd = std::env::current_dir().unwrap_or_default();
    let screenshots = &config.screenshot_directory;

    json!({
        "url": EXAMPLE_URL,
        "viewport": { "width": 1200, "height": 600 },
        "init": {
            "libraryRoot": relative_to(&cwd, &config.libraries.phantomcss),
            "screenshotRoot": screenshots,
            "failedComparisonsRoot": screenshots.join("failures"),
            "addLabelToFailedImage": false,
            "outputSettings": { "transparency": 0.5 }
        }
    })
}

/// Write the settings and example test into the test directory
pub fn generate(config: &VisualTestConfig, logger: &dyn Logger) -> Result<Vec<PathBuf>> {
    let directory = &config.test_directory;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create directory: {}", directory.display()))?;

    let settings = serde_json::to_string_pretty(&settings_json(config))
        .context("Failed to serialize example settings")?;

    let mut written = Vec::new();
    for (name, contents) in [(SETTINGS_FILE, settings.as_str()), (EXAMPLE_TEST_FILE, EXAMPLE_TEST)] {
        let path = directory.join(name);
        logger.debug(&format!("Before write to [[ {} ]]", path.display()));

        if let Err(e) = std::fs::write(&path, contents) {
            logger.error(&format!("Could not write to [[ {} ]]: {}", path.display(), e));
            return Err(e).with_context(|| format!("Failed to write {}", path.display()));
        }

        logger.success(&format!("Created file [[ {} ]]", path.display()));
        written.push(path);
    }

    Ok(written)
}

/// `path` relative to `base` when it lives below it, without `.` components
fn relative_to(base: &Path, path: &Path) -> PathBuf {
    let path = if path.is_absolute() {
        path.strip_prefix(base).unwrap_or(path)
    } else {
        path
    };
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::logger::testing::{RecordingLogger, Severity};
    use tempfile::tempdir;

    #[test]
    fn test_relative_to() {
        let base = Path::new("/work/project");
        assert_eq!(
            relative_to(base, Path::new("/work/project/node_modules/phantomcss")),
            PathBuf::from("node_modules/phantomcss")
        );
        assert_eq!(
            relative_to(base, Path::new("./node_modules/phantomcss")),
            PathBuf::from("node_modules/phantomcss")
        );
        assert_eq!(
            relative_to(base, Path::new("/opt/phantomcss")),
            PathBuf::from("/opt/phantomcss")
        );
    }

    #[test]
    fn test_settings_json() {
        let settings = settings_json(&VisualTestConfig::default());
        assert_eq!(settings["viewport"]["width"], 1200);
        assert_eq!(settings["init"]["libraryRoot"], "node_modules/phantomcss");
        assert_eq!(settings["init"]["screenshotRoot"], ".phantomcss/screenshots");
    }

    #[test]
    fn test_generate_writes_both_files() {
        let dir = tempdir().unwrap();
        let config = VisualTestConfig::default().with_test_directory(dir.path().join("visual"));
        let logger = RecordingLogger::new();

        let written = generate(&config, &logger).unwrap();

        assert_eq!(written.len(), 2);
        let test = std::fs::read_to_string(dir.path().join("visual").join(EXAMPLE_TEST_FILE)).unwrap();
        assert!(test.contains("phantomcss.compareSession()"));

        let settings: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("visual").join(SETTINGS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(settings["url"], EXAMPLE_URL);
        assert_eq!(logger.messages(Severity::Success).len(), 2);
    }

    #[test]
    fn test_generated_example_is_discovered_by_default_pattern() {
        let dir = tempdir().unwrap();
        let config = VisualTestConfig::default().with_test_directory(dir.path());
        generate(&config, &RecordingLogger::new()).unwrap();

        let found = crate::discovery::find_files(dir.path(), &config.test_pattern).unwrap();
        assert_eq!(found, vec![dir.path().join(EXAMPLE_TEST_FILE)]);
    }
}
