//! Leveled logging capability used by the sync engine
//!
//! The engine never writes output itself. It logs through a [`Logger`],
//! which the binary backs with `tracing` and tests can back with a recorder.

use std::fmt;
use std::sync::Arc;

/// Message severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = match self {
            Level::Error => "err!",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "dbug",
            Level::Trace => "trce",
        };
        f.write_str(short)
    }
}

pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn trace(&self, message: &str) {
        self.log(Level::Trace, message);
    }
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn log(&self, level: Level, message: &str) {
        (**self).log(level, message);
    }
}

impl<L: Logger + ?Sized> Logger for &L {
    fn log(&self, level: Level, message: &str) {
        (**self).log(level, message);
    }
}

/// Forwards every message to the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Error => tracing::error!("{}", message),
            Level::Warn => tracing::warn!("{}", message),
            Level::Info => tracing::info!("{}", message),
            Level::Debug => tracing::debug!("{}", message),
            Level::Trace => tracing::trace!("{}", message),
        }
    }
}

/// Adds a fixed `[name] ` prefix before handing messages to `inner`
#[derive(Debug, Clone)]
pub struct Prefixed<L> {
    name: String,
    inner: L,
}

impl<L: Logger> Prefixed<L> {
    pub fn new(name: impl Into<String>, inner: L) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: Logger> Logger for Prefixed<L> {
    fn log(&self, level: Level, message: &str) {
        self.inner.log(level, &format!("[{}] {}", self.name, message));
    }
}
