//! # Event Log
//!
//! Append-only record of the events a module emitted. Consumers and tests read
//! it back; operators drain it into an external sink.

use parking_lot::Mutex;

/// Thread-safe, append-only event record.
#[derive(Debug)]
pub struct EventLog<E> {
    entries: Mutex<Vec<E>>,
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Clone> EventLog<E> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event.
    pub fn emit(&self, event: E) {
        self.entries.lock().push(event);
    }

    /// Append several events in order.
    pub fn extend(&self, events: impl IntoIterator<Item = E>) {
        self.entries.lock().extend(events);
    }

    /// Copy of every event emitted so far.
    pub fn snapshot(&self) -> Vec<E> {
        self.entries.lock().clone()
    }

    /// Take every event, leaving the log empty.
    pub fn drain(&self) -> Vec<E> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
