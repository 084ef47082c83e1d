use tracing::info;

use crate::kernel::telemetry::{Metadata, Sink, SinkError};

/// Writes every call to the `tracing` log. Useful in development and demos.
#[derive(Debug, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn name(&self) -> &str {
        "tracing"
    }

    fn send(&self, action: &str, metadata: Metadata) -> Result<(), SinkError> {
        let metadata = serde_json::to_string(&metadata)?;
        info!(target: "beacon::events", action, %metadata, "telemetry");
        Ok(())
    }
}
