use serde::{Deserialize, Serialize};

use crate::kernel::telemetry::event::{CATEGORY_CONTENT, CATEGORY_CONVERSIONS, CATEGORY_ENGAGEMENT};
use crate::kernel::telemetry::TelemetryEvent;

/// The fixed vocabulary of business events.
///
/// Each variant maps to one stable `action`/`category` pair. Actions are
/// dashboard keys; renaming one breaks reporting continuity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedEvent {
    ContentViewed { slug: String, kind: String },
    AssetDownloaded { asset: String, source: String },
    ContentCopied { slug: String, source: String },
    CtaClicked { label: String, location: String },
    SectionToggled { section: String, expanded: bool },
    OutboundLinkClicked { url: String, source: String },
    FormSubmitted { form: String, success: bool },
    DemoRequested { source: String },
}

impl NamedEvent {
    pub fn action(&self) -> &'static str {
        match self {
            NamedEvent::ContentViewed { .. } => "content_view",
            NamedEvent::AssetDownloaded { .. } => "asset_download",
            NamedEvent::ContentCopied { .. } => "content_copy",
            NamedEvent::CtaClicked { .. } => "cta_click",
            NamedEvent::SectionToggled { .. } => "section_toggle",
            NamedEvent::OutboundLinkClicked { .. } => "outbound_click",
            NamedEvent::FormSubmitted { .. } => "form_submit",
            NamedEvent::DemoRequested { .. } => "demo_request",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            NamedEvent::ContentViewed { .. } => CATEGORY_CONTENT,
            NamedEvent::ContentCopied { .. }
            | NamedEvent::SectionToggled { .. }
            | NamedEvent::OutboundLinkClicked { .. } => CATEGORY_ENGAGEMENT,
            NamedEvent::AssetDownloaded { .. }
            | NamedEvent::CtaClicked { .. }
            | NamedEvent::FormSubmitted { .. }
            | NamedEvent::DemoRequested { .. } => CATEGORY_CONVERSIONS,
        }
    }

    /// Parameter-to-event mapping. No other logic lives here.
    pub fn into_event(self) -> TelemetryEvent {
        let base = TelemetryEvent::new(self.action(), self.category());
        match self {
            NamedEvent::ContentViewed { slug, kind } => base.with_label(slug).with_property("kind", kind),
            NamedEvent::AssetDownloaded { asset, source } => {
                base.with_label(asset).with_property("source", source)
            }
            NamedEvent::ContentCopied { slug, source } => {
                base.with_label(slug).with_property("source", source)
            }
            NamedEvent::CtaClicked { label, location } => {
                base.with_label(label).with_property("location", location)
            }
            NamedEvent::SectionToggled { section, expanded } => base
                .with_label(section)
                .with_value(flag(expanded))
                .with_property("expanded", expanded),
            NamedEvent::OutboundLinkClicked { url, source } => {
                base.with_label(url).with_property("source", source)
            }
            NamedEvent::FormSubmitted { form, success } => base
                .with_label(form)
                .with_value(flag(success))
                .with_property("success", success),
            NamedEvent::DemoRequested { source } => base.with_label(source),
        }
    }
}

fn flag(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}
