//! Diagnostics reporting.
//!
//! Every user-facing diagnostic goes through a [`Logger`]. A host can inject
//! a callback to route them into its own UI; without one, they are emitted as
//! `tracing` events under the `kumiki` target.

use crate::error::NavigationError;
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Log,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Log => "log",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives every diagnostic when injected into a [`Logger`].
pub type LoggingCallback = Box<dyn Fn(LogLevel, &str)>;

#[derive(Default)]
pub struct Logger {
    callback: Option<LoggingCallback>,
}

impl Logger {
    pub fn new() -> Self {
        Self { callback: None }
    }

    pub fn with_callback(callback: LoggingCallback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn set_callback(&mut self, callback: Option<LoggingCallback>) {
        self.callback = callback;
    }

    pub fn emit(&self, level: LogLevel, message: &str) {
        match &self.callback {
            Some(callback) => callback(level, message),
            None => match level {
                LogLevel::Log => tracing::info!(target: "kumiki", "{message}"),
                LogLevel::Warn => tracing::warn!(target: "kumiki", "{message}"),
                LogLevel::Error => tracing::error!(target: "kumiki", "{message}"),
            },
        }
    }

    pub fn log(&self, message: &str) {
        self.emit(LogLevel::Log, message);
    }

    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }

    /// Reports a failed action at the severity the error carries.
    pub fn report(&self, error: &NavigationError) {
        self.emit(error.level(), &error.to_string());
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
