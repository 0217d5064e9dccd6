//! Logging for WhatsFlowing
//!
//! Stages report problems through a [`LogSink`] owned by the host. The
//! production sink forwards to `tracing`; [`MemoryLogSink`] keeps messages in
//! memory so a harness can inspect what a stage reported.

use std::sync::{Mutex, PoisonError};

use tracing_subscriber::EnvFilter;

use crate::error::{WhatsFlowingError, WhatsFlowingResult};

/// Severity of a captured log message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

/// Destination for messages emitted by a stage
pub trait LogSink: Send + Sync {
    fn warn(&self, message: &str);

    fn info(&self, message: &str);

    fn debug(&self, message: &str);
}

/// Log sink that forwards to the global `tracing` subscriber
#[derive(Debug, Clone)]
pub struct TracingLogSink {
    stage: String,
}

impl TracingLogSink {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
        }
    }
}

impl LogSink for TracingLogSink {
    fn warn(&self, message: &str) {
        tracing::warn!(stage = %self.stage, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(stage = %self.stage, "{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!(stage = %self.stage, "{}", message);
    }
}

/// Log sink that records every message in memory
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }

    /// All messages logged at the given level, oldest first
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn warn_messages(&self) -> Vec<String> {
        self.messages(LogLevel::Warn)
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemoryLogSink {
    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn debug(&self, message: &str) {
        self.push(LogLevel::Debug, message);
    }
}

/// Initialize console logging
///
/// `RUST_LOG` takes precedence over `level` when it is set.
pub fn init_logging(level: &str) -> WhatsFlowingResult<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| WhatsFlowingError::Config(format!("failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_separates_levels() {
        let sink = MemoryLogSink::new();
        sink.warn("disk full");
        sink.info("started");
        sink.debug("detail");
        sink.warn("disk still full");

        assert_eq!(sink.warn_messages(), vec!["disk full", "disk still full"]);
        assert_eq!(sink.messages(LogLevel::Info), vec!["started"]);
        assert_eq!(sink.messages(LogLevel::Debug), vec!["detail"]);
    }

    #[test]
    fn test_memory_sink_clear() {
        let sink = MemoryLogSink::new();
        sink.warn("gone");
        sink.clear();
        assert!(sink.warn_messages().is_empty());
    }

    #[test]
    fn test_init_logging_twice_is_config_error() {
        let _ = init_logging("warn");
        let err = init_logging("debug").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("failed to initialize logging"));
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        let sink = TracingLogSink::new("WhatsFlowing");
        sink.warn("no subscriber installed");
        sink.info("still fine");
        sink.debug("still fine");
    }
}
