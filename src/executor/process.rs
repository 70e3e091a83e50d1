//! Subprocess invocation

#![allow(dead_code)]

use std::ffi::{OsStr, OsString};
use std::future::Future;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::ExecutorError;

/// A shell command line plus the environment overrides for its child
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub command_line: String,
    pub env: Vec<(String, OsString)>,
}

impl Invocation {
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl AsRef<OsStr>) -> Self {
        self.env.push((key.into(), value.as_ref().to_os_string()));
        self
    }

    pub fn env_value(&self, key: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }
}

/// Everything a finished child printed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the child was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        text.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stdout.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        text
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a command line to completion and captures its output.
///
/// A non-zero exit is not an error here; only a failure to launch is.
pub trait CommandRunner {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<CapturedOutput, ExecutorError>>;
}

/// Runs command lines through the platform shell
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CapturedOutput, ExecutorError> {
        let mut command = shell(&invocation.command_line);
        command
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = command
            .output()
            .await
            .map_err(|source| ExecutorError::Spawn {
                command: invocation.command_line.clone(),
                source,
            })?;

        let captured = CapturedOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        if !captured.success() {
            debug!(
                "`{}` exited with {:?}",
                invocation.command_line, captured.exit_code
            );
        }

        Ok(captured)
    }
}

#[cfg(windows)]
fn shell(command_line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", command_line]);
    command
}

#[cfg(not(windows))]
fn shell(command_line: &str) -> Command {
    let mut command = Command::new("sh");
    command.args(["-c", command_line]);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_output() {
        let out = CapturedOutput {
            stdout: "line one".to_string(),
            stderr: "warning".to_string(),
            exit_code: Some(0),
        };
        assert_eq!(out.combined(), "line one\nwarning");
        assert!(out.success());

        let only_stdout = CapturedOutput {
            stdout: "a\n".to_string(),
            ..Default::default()
        };
        assert_eq!(only_stdout.combined(), "a\n");
        assert!(!only_stdout.success());
    }

    #[test]
    fn test_invocation_env() {
        let inv = Invocation::new("casperjs test \"a.js\"")
            .with_env("PATH", "/one")
            .with_env("PATH", "/two");
        assert_eq!(inv.env_value("PATH"), Some(OsStr::new("/two")));
        assert_eq!(inv.env_value("HOME"), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_captures_output_and_exit_code() {
        let inv = Invocation::new("printf 'New screenshot at /tmp/a.png\\n'; echo oops >&2; exit 3");
        let out = tokio_test::assert_ok!(ShellRunner.run(&inv).await);

        assert_eq!(out.stdout, "New screenshot at /tmp/a.png\n");
        assert_eq!(out.stderr, "oops\n");
        assert_eq!(out.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_passes_env() {
        let inv = Invocation::new("printf '%s' \"$PHANTOMCSS_RUNNER_PROBE\"")
            .with_env("PHANTOMCSS_RUNNER_PROBE", "overlay");
        let out = ShellRunner.run(&inv).await.unwrap();
        assert_eq!(out.stdout, "overlay");
        assert!(std::env::var_os("PHANTOMCSS_RUNNER_PROBE").is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_executable_is_not_a_launch_error() {
        let inv = Invocation::new("definitely-not-a-casperjs-binary test \"x.js\"");
        let out = ShellRunner.run(&inv).await.unwrap();
        assert!(!out.success());
    }
}
