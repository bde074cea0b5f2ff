//! Best-effort failure reporting
//!
//! The engine reports swallowed failures (a dispatch that blew up, a cron job
//! that failed, a plugin that could not subscribe) through [`Logger`] so the
//! reporting path can be swapped out. Production code uses [`TracingLogger`].

use parking_lot::Mutex;
use serde_json::{Map, Value};

/// Structured context attached to a log entry
pub type LogContext = Map<String, Value>;

/// Build a [`LogContext`] from key/value pairs
pub fn log_context<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> LogContext {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// The logging capability consumed by the engine
pub trait Logger: Send + Sync {
    fn error(&self, message: &str, context: &LogContext);
}

/// Forwards to `tracing::error!`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, message: &str, context: &LogContext) {
        let context = Value::Object(context.clone());
        tracing::error!(context = %context, "{message}");
    }
}

/// A recorded log entry
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub message: String,
    pub context: LogContext,
}

/// Keeps every entry in memory, also forwarding it to `tracing`
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn error(&self, message: &str, context: &LogContext) {
        TracingLogger.error(message, context);
        self.entries.lock().push(LogEntry {
            message: message.to_string(),
            context: context.clone(),
        });
    }
}
