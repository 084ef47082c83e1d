use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use beacon::kernel::config::{TrackerConfig, ENV_HEARTBEAT_MS};
use beacon::kernel::telemetry::EventRecorder;
use beacon::outputs::{DeferredSink, HttpCollectorSink, TracingSink};
use beacon::{EventSinkAdapter, Instrumentation, PageHost, ScrollMetrics, SinkShape, Visibility};

const COLLECTOR_URL_ENV: &str = "BEACON_COLLECTOR_URL";
const DEMO_HEARTBEAT_MS: u64 = 1_000;

const PAGE_HEIGHT: f64 = 2_000.0;
const VIEWPORT_HEIGHT: f64 = 800.0;

/// Simulates one visit to a marketing page and logs every event sent.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut config = TrackerConfig::from_env().context("loading tracker config")?;
    if std::env::var(ENV_HEARTBEAT_MS).is_err() {
        // Keep the demo short unless told otherwise.
        config.heartbeat_interval_ms = DEMO_HEARTBEAT_MS;
    }
    tracing::info!(?config, "beacon demo starting");

    let recorder = Arc::new(EventRecorder::new("local"));
    let tag_manager = Arc::new(DeferredSink::new("tag-manager"));

    let mut sink = EventSinkAdapter::new()
        .with_sink(SinkShape::Collector, recorder.clone())
        .with_sink(SinkShape::TagManager, tag_manager.clone());
    if let Ok(url) = std::env::var(COLLECTOR_URL_ENV) {
        tracing::info!(%url, "forwarding events to collector");
        sink = sink.with_sink(SinkShape::Collector, Arc::new(HttpCollectorSink::new(url)));
    }

    let instrumentation = Instrumentation::new(&config, sink);
    let host = PageHost::new(ScrollMetrics::new(0.0, PAGE_HEIGHT, VIEWPORT_HEIGHT));
    let mut page = instrumentation.mount("pricing", &host);
    let pause = Duration::from_millis(config.heartbeat_interval_ms / 2 + config.scroll_throttle_ms);

    // 1. First paint: the tag manager has not loaded yet.
    instrumentation.catalog.content_viewed("pricing", "page");
    tag_manager.install(Arc::new(TracingSink));

    // 2. Read down the page, bounce back up, then further down.
    for top in [300.0, 900.0, 400.0, 1_150.0] {
        host.scroll_to(ScrollMetrics::new(top, PAGE_HEIGHT, VIEWPORT_HEIGHT));
        tokio::time::sleep(pause).await;
    }

    // 3. Interact.
    instrumentation.catalog.section_toggled("faq-billing", true);
    instrumentation.catalog.cta_clicked("Start free trial", "pricing-hero");

    // 4. Switch tabs for a while, then come back.
    host.set_visibility(Visibility::Hidden);
    tokio::time::sleep(pause * 3).await;
    host.set_visibility(Visibility::Visible);
    tokio::time::sleep(pause * 2).await;

    // 5. Navigate away.
    page.unmount();

    let snapshot = recorder.snapshot();
    if let Some(stats) = snapshot.page("pricing") {
        tracing::info!(
            deepest = ?stats.deepest_threshold,
            heartbeats = stats.heartbeats,
            dwell_secs = stats.dwell_secs,
            total_calls = snapshot.total_calls,
            "visit summary"
        );
    }

    Ok(())
}
