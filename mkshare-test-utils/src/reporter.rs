//! A [`Reporter`] that remembers every message.

use std::cell::RefCell;

use mkshare_core::{Reporter, FAILURE_EXIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Notice,
    Debug,
    Error,
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: RefCell<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.borrow().clone()
    }

    /// Messages at `level`, in order.
    pub fn at(&self, level: Level) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.at(level).iter().any(|m| m.contains(needle))
    }

    fn push(&self, level: Level, msg: &str) {
        self.messages.borrow_mut().push((level, msg.to_owned()));
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }

    fn notice(&self, msg: &str) {
        self.push(Level::Notice, msg);
    }

    fn debug(&self, msg: &str) {
        self.push(Level::Debug, msg);
    }

    fn error(&self, msg: &str) -> u8 {
        self.push(Level::Error, msg);
        FAILURE_EXIT
    }
}
