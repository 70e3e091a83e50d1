//! Shared helpers

pub mod logger;

pub use logger::{init_logger, LogLevel, Logger, TracingLogger};
