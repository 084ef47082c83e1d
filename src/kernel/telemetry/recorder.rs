use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::adapter::{Metadata, Sink, SinkError};
use super::metrics::{compute_snapshot, EngagementSnapshot};
use crate::kernel::lock;

const MAX_EVENTS: usize = 10_000;

/// One `(action, metadata)` call as a sink saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub action: String,
    pub metadata: Metadata,
}

impl RecordedCall {
    pub fn value(&self) -> Option<f64> {
        self.metadata.get("value").and_then(|v| v.as_f64())
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

/// In-memory sink keeping the most recent calls.
///
/// Oldest calls are dropped past the capacity. Can be switched to
/// "not loaded" to stand in for a backend whose script has not executed yet.
#[derive(Debug)]
pub struct EventRecorder {
    name: String,
    buffer: Mutex<VecDeque<RecordedCall>>,
    capacity: usize,
    available: AtomicBool,
}

impl EventRecorder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, MAX_EVENTS)
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            buffer: Mutex::new(VecDeque::with_capacity(capacity.min(MAX_EVENTS))),
            capacity: capacity.max(1),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().iter().cloned().collect()
    }

    /// Calls for one action, in arrival order.
    pub fn calls_for(&self, action: &str) -> Vec<RecordedCall> {
        self.lock()
            .iter()
            .filter(|c| c.action == action)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Aggregates what has been recorded so far. Assumes the collector shape.
    pub fn snapshot(&self) -> EngagementSnapshot {
        compute_snapshot(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<RecordedCall>> {
        lock(&self.buffer)
    }
}

impl Sink for EventRecorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn send(&self, action: &str, metadata: Metadata) -> Result<(), SinkError> {
        if !self.is_available() {
            return Err(SinkError::Unavailable);
        }
        let mut buffer = self.lock();
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(RecordedCall {
            action: action.to_string(),
            metadata,
        });
        Ok(())
    }
}
