//! Activity feed collaborator.
//!
//! The editor reports user-visible events through [`ActivitySink`]. Rendering
//! the feed is the host's job; [`ActivityLog`] is a bounded in-memory sink a
//! host can read from.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Icon tags used by the editor's activity entries.
pub mod icons {
    pub const CREATE: &str = "fas fa-plus";
    pub const REMOVE: &str = "fas fa-trash";
    pub const SAVE: &str = "fas fa-save";
    pub const RUN: &str = "fas fa-play";
    pub const RUN_ALL: &str = "fas fa-play-circle";
    pub const CONNECT: &str = "fas fa-link";
}

/// Colour tags used by the editor's activity entries.
pub mod colors {
    pub const BLUE: &str = "text-blue-400";
    pub const RED: &str = "text-red-400";
    pub const GREEN: &str = "text-green-400";
    pub const TEAL: &str = "text-teal-400";
}

/// Receives activity entries from the editor.
pub trait ActivitySink {
    fn record(&mut self, message: &str, icon: &str, color: &str);
}

/// A sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ActivitySink for NullSink {
    fn record(&mut self, _message: &str, _icon: &str, _color: &str) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityEntry {
    pub message: String,
    pub icon: String,
    pub color: String,
}

/// Newest-first activity feed holding at most `capacity` entries.
#[derive(Clone, Debug)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(10)
    }
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl ActivitySink for ActivityLog {
    fn record(&mut self, message: &str, icon: &str, color: &str) {
        tracing::info!(target: "workflow_canvas::activity", %message, "activity");
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(ActivityEntry {
            message: message.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        });
        self.entries.truncate(self.capacity);
    }
}

/// Lets a host keep a handle on the log while the session writes to it.
impl<S: ActivitySink> ActivitySink for Rc<RefCell<S>> {
    fn record(&mut self, message: &str, icon: &str, color: &str) {
        self.borrow_mut().record(message, icon, color);
    }
}
