//! Engagement telemetry: the normalized event, the sink fan-out, and a local recorder.
//!
//! # DELIVERY INVARIANT
//! Emission is best-effort and fire-and-forget. Nothing in this module
//! returns an error to the page that is being instrumented.

pub mod adapter;
pub mod event;
pub mod metrics;
pub mod recorder;

pub use adapter::{EventSinkAdapter, Metadata, Sink, SinkError, SinkShape};
pub use event::TelemetryEvent;
pub use recorder::{EventRecorder, RecordedCall};
