//! Named Event Catalog: one call-site per business interaction.
//!
//! Calls are synchronous, return nothing, and cannot fail. An unreachable
//! sink is the adapter's concern and never reaches the caller.

pub mod types;

pub use types::NamedEvent;

use crate::kernel::telemetry::EventSinkAdapter;

#[derive(Debug, Clone)]
pub struct EventCatalog {
    sink: EventSinkAdapter,
}

impl EventCatalog {
    pub fn new(sink: EventSinkAdapter) -> Self {
        Self { sink }
    }

    pub fn track(&self, event: NamedEvent) {
        self.sink.emit(&event.into_event());
    }

    pub fn content_viewed(&self, slug: &str, kind: &str) {
        self.track(NamedEvent::ContentViewed {
            slug: slug.to_string(),
            kind: kind.to_string(),
        });
    }

    pub fn asset_downloaded(&self, asset: &str, source: &str) {
        self.track(NamedEvent::AssetDownloaded {
            asset: asset.to_string(),
            source: source.to_string(),
        });
    }

    pub fn content_copied(&self, slug: &str, source: &str) {
        self.track(NamedEvent::ContentCopied {
            slug: slug.to_string(),
            source: source.to_string(),
        });
    }

    pub fn cta_clicked(&self, label: &str, location: &str) {
        self.track(NamedEvent::CtaClicked {
            label: label.to_string(),
            location: location.to_string(),
        });
    }

    pub fn section_toggled(&self, section: &str, expanded: bool) {
        self.track(NamedEvent::SectionToggled {
            section: section.to_string(),
            expanded,
        });
    }

    pub fn outbound_link_clicked(&self, url: &str, source: &str) {
        self.track(NamedEvent::OutboundLinkClicked {
            url: url.to_string(),
            source: source.to_string(),
        });
    }

    pub fn form_submitted(&self, form: &str, success: bool) {
        self.track(NamedEvent::FormSubmitted {
            form: form.to_string(),
            success,
        });
    }

    pub fn demo_requested(&self, source: &str) {
        self.track(NamedEvent::DemoRequested {
            source: source.to_string(),
        });
    }
}
