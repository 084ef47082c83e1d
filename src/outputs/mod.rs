//! Concrete sinks.

pub mod deferred;
pub mod http;
pub mod log;

pub use deferred::DeferredSink;
pub use http::{CollectRequest, HttpCollectorSink};
pub use log::TracingSink;
