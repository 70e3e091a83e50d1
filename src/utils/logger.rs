//! Logging utilities
//!
//! Subscriber setup plus the leveled [`Logger`] the executor reports through.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Prefix attached to every message emitted by [`TracingLogger`]
pub const LOG_PREFIX: &str = "phantomcss";

/// Log level configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Initialize the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_logger(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("phantomcss_runner={}", level.to_tracing_level()))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Leveled sink for user-facing progress messages.
///
/// `success` has no tracing equivalent, so it is its own method rather than
/// a `Level`.
pub trait Logger {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// [`Logger`] backed by `tracing` events
#[derive(Clone, Debug)]
pub struct TracingLogger {
    prefix: String,
}

impl TracingLogger {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(LOG_PREFIX)
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!("{}: {}", self.prefix, message);
    }

    fn info(&self, message: &str) {
        tracing::info!("{}: {}", self.prefix, message);
    }

    fn success(&self, message: &str) {
        tracing::info!("{}: ✓ {}", self.prefix, message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}: {}", self.prefix, message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}: {}", self.prefix, message);
    }
}
