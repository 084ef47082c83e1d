use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use beacon::kernel::telemetry::{EventRecorder, Metadata, SinkError};
use beacon::outputs::DeferredSink;
use beacon::{EventSinkAdapter, Sink, SinkShape, TelemetryEvent};
use serde_json::json;

struct FailingSink {
    attempts: AtomicUsize,
}

impl Sink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    fn send(&self, _action: &str, _metadata: Metadata) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Transport("connection refused".to_string()))
    }
}

fn sample_event() -> TelemetryEvent {
    TelemetryEvent::new("scroll_depth", "Engagement")
        .with_label("home")
        .with_value(75.0)
        .with_property("variant", "b")
}

#[test]
fn test_fan_out_skips_absent_sink() {
    let absent = Arc::new(EventRecorder::new("absent"));
    absent.set_available(false);
    let present = Arc::new(EventRecorder::new("present"));

    let adapter = EventSinkAdapter::new()
        .with_sink(SinkShape::TagManager, absent.clone())
        .with_sink(SinkShape::Collector, present.clone());

    adapter.emit(&sample_event());

    assert!(absent.is_empty(), "Unavailable sink must not receive anything");
    assert_eq!(present.len(), 1, "Present sink still gets the event");
    assert_eq!(present.calls()[0].action, "scroll_depth");
}

#[test]
fn test_failing_sink_does_not_block_others() {
    let failing = Arc::new(FailingSink { attempts: AtomicUsize::new(0) });
    let recorder = Arc::new(EventRecorder::new("recorder"));

    let adapter = EventSinkAdapter::new()
        .with_sink(SinkShape::Collector, failing.clone())
        .with_sink(SinkShape::Collector, recorder.clone());

    adapter.emit(&sample_event());
    adapter.emit(&sample_event());

    assert_eq!(failing.attempts.load(Ordering::SeqCst), 2, "No retries");
    assert_eq!(recorder.len(), 2);
}

#[test]
fn test_empty_adapter_is_noop() {
    let adapter = EventSinkAdapter::new();
    assert_eq!(adapter.sink_count(), 0);
    adapter.emit(&sample_event());
}

#[test]
fn test_deferred_sink_drops_until_installed() {
    let deferred = Arc::new(DeferredSink::new("gtag"));
    let backend = Arc::new(EventRecorder::new("backend"));
    let adapter = EventSinkAdapter::new().with_sink(SinkShape::TagManager, deferred.clone());

    // First paint: script not loaded yet.
    adapter.emit(&sample_event());
    assert!(!deferred.is_available());

    deferred.install(backend.clone());
    adapter.emit(&sample_event());

    assert_eq!(backend.len(), 1, "Only the post-install event arrives");
    assert_eq!(backend.calls()[0].str_field("event_category"), Some("Engagement"));

    deferred.uninstall();
    adapter.emit(&sample_event());
    assert_eq!(backend.len(), 1);
}

#[test]
fn test_collector_shape() {
    let metadata = SinkShape::Collector.translate(&sample_event());

    assert_eq!(
        serde_json::Value::Object(metadata),
        json!({ "category": "Engagement", "label": "home", "value": 75, "variant": "b" })
    );
}

#[test]
fn test_tag_manager_shape() {
    let metadata = SinkShape::TagManager.translate(&sample_event());

    assert_eq!(
        serde_json::Value::Object(metadata),
        json!({ "event_category": "Engagement", "event_label": "home", "value": 75, "variant": "b" })
    );
}

#[test]
fn test_absent_fields_are_omitted() {
    let event = TelemetryEvent::new("demo_request", "Conversions");

    let collector = SinkShape::Collector.translate(&event);
    assert_eq!(serde_json::Value::Object(collector), json!({ "category": "Conversions" }));

    let tag = SinkShape::TagManager.translate(&event);
    assert!(!tag.contains_key("event_label"));
    assert!(!tag.contains_key("value"));
}

#[test]
fn test_normalized_fields_win_over_properties() {
    let event = TelemetryEvent::new("cta_click", "Conversions")
        .with_label("Start trial")
        .with_property("category", "spoofed")
        .with_property("value", 999);

    let metadata = SinkShape::Collector.translate(&event);

    assert_eq!(metadata["category"], json!("Conversions"));
    assert!(!metadata.contains_key("value"), "Absent value removes a colliding property");
}

#[test]
fn test_fractional_value_kept() {
    let event = TelemetryEvent::new("time_on_page", "Engagement").with_value(12.5);
    let metadata = SinkShape::Collector.translate(&event);
    assert_eq!(metadata["value"], json!(12.5));
}

#[test]
fn test_recorder_is_bounded() {
    let recorder = Arc::new(EventRecorder::with_capacity("small", 3));
    let adapter = EventSinkAdapter::new().with_sink(SinkShape::Collector, recorder.clone());

    for depth in [25.0, 50.0, 75.0, 90.0] {
        adapter.emit(&TelemetryEvent::new("scroll_depth", "Engagement").with_value(depth));
    }

    let values: Vec<f64> = recorder.calls().iter().filter_map(|c| c.value()).collect();
    assert_eq!(values, vec![50.0, 75.0, 90.0], "Oldest call is evicted first");
}

#[test]
fn test_snapshot_aggregates_pages() {
    let recorder = Arc::new(EventRecorder::new("recorder"));
    let adapter = EventSinkAdapter::new().with_sink(SinkShape::Collector, recorder.clone());

    adapter.emit(&TelemetryEvent::scroll_depth("home", 25));
    adapter.emit(&TelemetryEvent::scroll_depth("home", 50));
    adapter.emit(&TelemetryEvent::time_on_page("home", 30));
    adapter.emit(&TelemetryEvent::time_on_page("home", 42).with_property("final", true));
    adapter.emit(&TelemetryEvent::scroll_depth("pricing", 90));
    adapter.emit(&TelemetryEvent::new("cta_click", "Conversions"));

    let snap = recorder.snapshot();
    assert_eq!(snap.total_calls, 6);
    assert_eq!(snap.count("scroll_depth"), 3);
    assert_eq!(snap.count("cta_click"), 1);

    let home = snap.page("home").expect("home stats");
    assert_eq!(home.deepest_threshold, Some(50));
    assert_eq!(home.scroll_events, 2);
    assert_eq!(home.heartbeats, 1);
    assert_eq!(home.dwell_secs, 42);
    assert!(home.finalized);

    assert_eq!(snap.page("pricing").and_then(|p| p.deepest_threshold), Some(90));
}
