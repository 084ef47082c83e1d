use std::sync::Arc;

use beacon::kernel::telemetry::EventRecorder;
use beacon::{EventCatalog, EventSinkAdapter, NamedEvent, SinkShape};
use serde_json::json;

fn catalog() -> (Arc<EventRecorder>, EventCatalog) {
    let recorder = Arc::new(EventRecorder::new("recorder"));
    let adapter = EventSinkAdapter::new().with_sink(SinkShape::Collector, recorder.clone());
    (recorder, EventCatalog::new(adapter))
}

#[test]
fn test_each_call_site_maps_to_one_event() {
    let (recorder, catalog) = catalog();

    catalog.content_viewed("case-study-acme", "case_study");
    catalog.asset_downloaded("whitepaper.pdf", "resources");
    catalog.content_copied("install-snippet", "docs");
    catalog.cta_clicked("Book a demo", "hero");
    catalog.section_toggled("faq-pricing", true);
    catalog.outbound_link_clicked("https://github.com/acme", "footer");
    catalog.form_submitted("contact", false);
    catalog.demo_requested("pricing");

    let calls = recorder.calls();
    let summary: Vec<(&str, Option<&str>, Option<&str>)> = calls
        .iter()
        .map(|c| (c.action.as_str(), c.str_field("category"), c.str_field("label")))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("content_view", Some("Content"), Some("case-study-acme")),
            ("asset_download", Some("Conversions"), Some("whitepaper.pdf")),
            ("content_copy", Some("Engagement"), Some("install-snippet")),
            ("cta_click", Some("Conversions"), Some("Book a demo")),
            ("section_toggle", Some("Engagement"), Some("faq-pricing")),
            ("outbound_click", Some("Engagement"), Some("https://github.com/acme")),
            ("form_submit", Some("Conversions"), Some("contact")),
            ("demo_request", Some("Conversions"), Some("pricing")),
        ]
    );
}

#[test]
fn test_context_travels_as_properties() {
    let (recorder, catalog) = catalog();

    catalog.cta_clicked("Start trial", "pricing-table");
    catalog.section_toggled("faq-security", false);
    catalog.form_submitted("newsletter", true);

    let calls = recorder.calls();
    assert_eq!(calls[0].metadata["location"], json!("pricing-table"));
    assert!(!calls[0].metadata.contains_key("value"));

    assert_eq!(calls[1].metadata["expanded"], json!(false));
    assert_eq!(calls[1].value(), Some(0.0));

    assert_eq!(calls[2].metadata["success"], json!(true));
    assert_eq!(calls[2].value(), Some(1.0));
}

#[test]
fn test_named_event_into_event() {
    let event = NamedEvent::AssetDownloaded {
        asset: "brand-kit.zip".to_string(),
        source: "press".to_string(),
    }
    .into_event();

    assert_eq!(event.action, "asset_download");
    assert_eq!(event.category, "Conversions");
    assert_eq!(event.label.as_deref(), Some("brand-kit.zip"));
    assert_eq!(event.value, None);
    assert_eq!(
        event.properties.as_ref().and_then(|p| p.get("source")),
        Some(&json!("press"))
    );
}

#[test]
fn test_unreachable_sink_never_reaches_caller() {
    let (recorder, catalog) = catalog();
    recorder.set_available(false);

    catalog.demo_requested("hero");
    catalog.content_copied("snippet", "docs");

    assert!(recorder.is_empty());
}

#[test]
fn test_tag_manager_receives_catalog_events() {
    let recorder = Arc::new(EventRecorder::new("gtag"));
    let catalog = EventCatalog::new(
        EventSinkAdapter::new().with_sink(SinkShape::TagManager, recorder.clone()),
    );

    catalog.asset_downloaded("datasheet.pdf", "product");

    let calls = recorder.calls();
    let call = &calls[0];
    assert_eq!(call.action, "asset_download");
    assert_eq!(call.str_field("event_category"), Some("Conversions"));
    assert_eq!(call.str_field("event_label"), Some("datasheet.pdf"));
    assert_eq!(call.str_field("source"), Some("product"));
}
