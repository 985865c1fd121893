//! Append-only activity log shown to the operator.

use std::sync::{Mutex, PoisonError};

/// Destination for operator-facing log messages.
pub trait LogSink: Send + Sync {
    fn append(&self, message: &str);
}

/// Accumulated plain-text console output.
///
/// Entries are separated by a single newline. Nothing is ever removed.
#[derive(Debug, Default, Clone)]
pub struct ConsoleLog {
    text: String,
    entries: Vec<String>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: &str) {
        if !self.entries.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(message);
        self.entries.push(message.to_string());
    }

    /// Full accumulated text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Appended messages in order. A multi-line message is one entry.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of `push` calls so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LogSink for Mutex<ConsoleLog> {
    fn append(&self, message: &str) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}
