//! Observability sink for per-file events.
//!
//! The classifier and the safe mover never log on their own; they report to an
//! [`EventSink`] handed to them by the caller. The binary uses [`TracingSink`],
//! tests use [`RecordingSink`] to assert on what was reported.

use std::cell::RefCell;

/// Receives informational, warning and error events from the core.
pub trait EventSink {
    /// A file was moved, or would be moved in a dry run.
    fn info(&self, message: &str);
    /// Something was recovered locally, e.g. a collision rename.
    fn warn(&self, message: &str);
    /// A file was left in place because its move failed.
    fn error(&self, message: &str);
}

/// Forwards every event to the `tracing` subscriber installed by the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Severity of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Keeps every event in memory, in the order it was reported.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<(Level, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events recorded so far.
    pub fn events(&self) -> Vec<(Level, String)> {
        self.events.borrow().clone()
    }

    /// Messages recorded at the given level.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|(lvl, _)| *lvl == level)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        self.events.borrow_mut().push((level, message.to_string()));
    }
}

impl EventSink for RecordingSink {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}
