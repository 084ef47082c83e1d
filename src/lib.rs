pub mod catalog;
pub mod kernel;
pub mod outputs;

pub use catalog::{EventCatalog, NamedEvent};
pub use kernel::cancel::TrackerHandle;
pub use kernel::config::TrackerConfig;
pub use kernel::host::{PageHost, ScrollMetrics, Visibility};
pub use kernel::instrument::{Instrumentation, PageSession};
pub use kernel::telemetry::{EventSinkAdapter, Sink, SinkShape, TelemetryEvent};
