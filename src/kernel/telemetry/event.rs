use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form structured context attached to an event. Opaque to this layer.
pub type Properties = Map<String, Value>;

pub const CATEGORY_ENGAGEMENT: &str = "Engagement";
pub const CATEGORY_CONVERSIONS: &str = "Conversions";
pub const CATEGORY_CONTENT: &str = "Content";

pub const ACTION_SCROLL_DEPTH: &str = "scroll_depth";
pub const ACTION_TIME_ON_PAGE: &str = "time_on_page";

/// The single normalized unit flowing towards the sinks.
///
/// `action` and `category` are always present. Nothing here is named after a
/// particular backend; translation happens in [`super::adapter::SinkShape`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub action: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl TelemetryEvent {
    pub fn new(action: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            category: category.into(),
            label: None,
            value: None,
            properties: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Adds one property, creating the map on first use.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(Properties::new)
            .insert(key.into(), value.into());
        self
    }

    /// `scroll_depth` for one crossed threshold.
    pub fn scroll_depth(page_id: &str, threshold: u8) -> Self {
        Self::new(ACTION_SCROLL_DEPTH, CATEGORY_ENGAGEMENT)
            .with_label(page_id)
            .with_value(f64::from(threshold))
    }

    /// `time_on_page` carrying cumulative seconds since activation.
    pub fn time_on_page(page_id: &str, elapsed_secs: u64) -> Self {
        Self::new(ACTION_TIME_ON_PAGE, CATEGORY_ENGAGEMENT)
            .with_label(page_id)
            .with_value(elapsed_secs as f64)
    }
}
