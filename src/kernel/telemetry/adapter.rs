use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::event::TelemetryEvent;

/// What a backend receives alongside the action name.
pub type Metadata = Map<String, Value>;

#[derive(Debug, Error)]
pub enum SinkError {
    /// The backend is not loaded or cannot be reached right now. Not a failure.
    #[error("sink unavailable")]
    Unavailable,
    #[error("failed to encode metadata: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("transport error: {0}")]
    Transport(String),
}

/// A black-box analytics backend accepting `(action, metadata)`.
pub trait Sink: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the backend is loaded. Unavailable sinks are skipped without a call to `send`.
    fn is_available(&self) -> bool {
        true
    }

    fn send(&self, action: &str, metadata: Metadata) -> Result<(), SinkError>;
}

/// The call shape a sink expects its metadata in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkShape {
    /// `(action, {category, label, value, ...properties})`
    Collector,
    /// gtag-style `(action, {event_category, event_label, value, ...properties})`
    TagManager,
}

impl SinkShape {
    /// Builds the metadata object for this shape.
    /// Absent fields are omitted. Normalized fields win over colliding property keys.
    pub fn translate(&self, event: &TelemetryEvent) -> Metadata {
        let (category_key, label_key) = match self {
            SinkShape::Collector => ("category", "label"),
            SinkShape::TagManager => ("event_category", "event_label"),
        };

        let mut metadata = event.properties.clone().unwrap_or_default();
        metadata.insert(category_key.to_string(), Value::from(event.category.as_str()));

        match &event.label {
            Some(label) => {
                metadata.insert(label_key.to_string(), Value::from(label.as_str()));
            }
            None => {
                metadata.remove(label_key);
            }
        }

        match event.value {
            Some(value) => {
                metadata.insert("value".to_string(), number(value));
            }
            None => {
                metadata.remove("value");
            }
        }

        metadata
    }
}

// Whole numbers go out as integers so `75` is not reported as `75.0`.
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[derive(Clone)]
struct SinkBinding {
    shape: SinkShape,
    sink: Arc<dyn Sink>,
}

/// Fans one event out to every configured sink.
///
/// Stateless and cheap to clone; trackers hold their own copy.
#[derive(Clone, Default)]
pub struct EventSinkAdapter {
    bindings: Arc<Vec<SinkBinding>>,
}

impl EventSinkAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, shape: SinkShape, sink: Arc<dyn Sink>) -> Self {
        Arc::make_mut(&mut self.bindings).push(SinkBinding { shape, sink });
        self
    }

    pub fn sink_count(&self) -> usize {
        self.bindings.len()
    }

    /// Best-effort delivery. Never fails, never retries.
    pub fn emit(&self, event: &TelemetryEvent) {
        debug!(action = %event.action, label = ?event.label, value = ?event.value, "emit");

        for binding in self.bindings.iter() {
            let name = binding.sink.name();
            if !binding.sink.is_available() {
                trace!(sink = name, action = %event.action, "sink not loaded, skipping");
                continue;
            }

            let metadata = binding.shape.translate(event);
            match binding.sink.send(&event.action, metadata) {
                Ok(()) => {}
                Err(SinkError::Unavailable) => {
                    trace!(sink = name, action = %event.action, "sink unavailable, skipping");
                }
                Err(e) => {
                    warn!(sink = name, action = %event.action, "dropping event: {}", e);
                }
            }
        }
    }
}

impl fmt::Debug for EventSinkAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.bindings.iter().map(|b| (b.sink.name(), b.shape)))
            .finish()
    }
}
