//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use std::cell::RefCell;
use std::rc::Rc;

use workflow_canvas::ActivitySink;

/// Records every activity entry the session reports, without a capacity limit.
///
/// Clones share the same record, so a test can keep one while the session
/// owns another.
#[derive(Default, Clone)]
pub struct ActivityTracker {
    /// (message, icon, color)
    pub entries: Rc<RefCell<Vec<(String, String, String)>>>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in the order they were recorded.
    pub fn messages(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|(m, _, _)| m.clone()).collect()
    }

    pub fn last(&self) -> Option<(String, String, String)> {
        self.entries.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Clear all recorded entries.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl ActivitySink for ActivityTracker {
    fn record(&mut self, message: &str, icon: &str, color: &str) {
        self.entries
            .borrow_mut()
            .push((message.to_string(), icon.to_string(), color.to_string()));
    }
}
