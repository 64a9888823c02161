//! Destinations for assertion messages.

use std::cell::RefCell;

/// Receives formatted assertion messages.
pub trait OutputSink {
    fn write(&self, message: &str);
}

/// Writes messages to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn write(&self, message: &str) {
        println!("{}", message);
    }
}

/// Forwards messages to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OutputSink for LogSink {
    fn write(&self, message: &str) {
        log::info!("{}", message);
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: RefCell<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages written so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl OutputSink for MemorySink {
    fn write(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl OutputSink for SilentSink {
    fn write(&self, _message: &str) {}
}
