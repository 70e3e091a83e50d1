//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "PHANTOMCSS";

/// Overrides read from `PHANTOMCSS_*` variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Test directory from PHANTOMCSS_TEST_DIR
    pub test_directory: Option<String>,
    /// Script pattern from PHANTOMCSS_PATTERN
    pub test_pattern: Option<String>,
    /// Screenshot root from PHANTOMCSS_SCREENSHOT_DIR
    pub screenshot_directory: Option<String>,
    /// Verbose from PHANTOMCSS_VERBOSE
    pub verbose: Option<bool>,
    /// Synchronous execution from PHANTOMCSS_SYNC
    pub synchronous: Option<bool>,
    /// Whitespace-separated runner flags from PHANTOMCSS_OPTIONS
    pub execution_options: Option<Vec<String>>,
    /// Config file from PHANTOMCSS_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            test_directory: get_env("TEST_DIR"),
            test_pattern: get_env("PATTERN"),
            screenshot_directory: get_env("SCREENSHOT_DIR"),
            verbose: get_env_bool("VERBOSE"),
            synchronous: get_env_bool("SYNC"),
            execution_options: get_env("OPTIONS")
                .map(|v| v.split_whitespace().map(str::to_string).collect()),
            config_file: get_env("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.test_directory.is_some()
            || self.test_pattern.is_some()
            || self.screenshot_directory.is_some()
            || self.verbose.is_some()
            || self.synchronous.is_some()
            || self.execution_options.is_some()
            || self.config_file.is_some()
    }
}

fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| parse_bool(&v))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

/// Print all PHANTOMCSS environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_TEST_DIR        Directory searched for test scripts");
    println!("  {ENV_PREFIX}_PATTERN         Script glob pattern (brace groups allowed)");
    println!("  {ENV_PREFIX}_SCREENSHOT_DIR  Screenshot root used by clean/rebaseline");
    println!("  {ENV_PREFIX}_VERBOSE         Dump raw runner output (true/false)");
    println!("  {ENV_PREFIX}_SYNC            Run scripts one at a time (true/false)");
    println!("  {ENV_PREFIX}_OPTIONS         Extra casperjs flags, whitespace separated");
    println!("  {ENV_PREFIX}_CONFIG          Path to configuration file");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_SYNC=true");
    println!("  phantomcss-runner test");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.test_directory.is_none());
        assert!(!config.has_any());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("1"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("enabled"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("nope"));
    }

    #[test]
    fn test_has_any() {
        let with_sync = EnvConfig {
            synchronous: Some(false),
            ..Default::default()
        };
        assert!(with_sync.has_any());
    }
}
