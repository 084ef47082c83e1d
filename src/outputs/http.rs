use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::kernel::telemetry::{Metadata, Sink, SinkError};

const TIMEOUT_MS: u64 = 2_000;

/// Wire body posted to the collector.
#[derive(Debug, Serialize)]
pub struct CollectRequest<'a> {
    pub action: &'a str,
    pub metadata: &'a Metadata,
}

impl<'a> CollectRequest<'a> {
    pub fn new(action: &'a str, metadata: &'a Metadata) -> Self {
        Self { action, metadata }
    }
}

/// Posts `{action, metadata}` as JSON to a collector endpoint.
///
/// Requests are spawned and never awaited by the caller. Failures are
/// logged by the spawned task and otherwise dropped.
#[derive(Debug, Clone)]
pub struct HttpCollectorSink {
    // `None` when the HTTP client could not be built; the sink is then unavailable.
    client: Option<Client>,
    endpoint: String,
}

impl HttpCollectorSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let client = match Client::builder()
            .timeout(Duration::from_millis(TIMEOUT_MS))
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(%endpoint, "http collector disabled: {}", e);
                None
            }
        };
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Sink for HttpCollectorSink {
    fn name(&self) -> &str {
        "http-collector"
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn send(&self, action: &str, metadata: Metadata) -> Result<(), SinkError> {
        let client = self.client.as_ref().ok_or(SinkError::Unavailable)?;
        let runtime = Handle::try_current().map_err(|_| SinkError::Unavailable)?;

        let request = client
            .post(&self.endpoint)
            .json(&CollectRequest::new(action, &metadata));
        let action = action.to_string();

        runtime.spawn(async move {
            match request.send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!(%action, "collector accepted event");
                }
                Ok(resp) => warn!(%action, status = %resp.status(), "collector rejected event"),
                Err(e) => warn!(%action, "collector unreachable: {}", e),
            }
        });
        Ok(())
    }
}
