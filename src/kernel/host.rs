use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Whether the page is the tab the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Visible,
    /// Backgrounded tab or minimized window. Heartbeats are suppressed.
    Hidden,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Visible
    }
}

/// Vertical scroll geometry as the host reports it, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            viewport_height,
        }
    }

    pub fn scrollable_height(&self) -> f64 {
        self.scroll_height - self.viewport_height
    }

    /// Rounded depth in 0..=100.
    /// `None` when the page cannot scroll or a metric is not finite.
    pub fn percent(&self) -> Option<u8> {
        let scrollable = self.scrollable_height();
        if !self.scroll_top.is_finite() || !scrollable.is_finite() || scrollable <= 0.0 {
            return None;
        }
        let percent = (self.scroll_top / scrollable * 100.0).round();
        Some(percent.clamp(0.0, 100.0) as u8)
    }
}

/// The host environment of one page instance.
///
/// The embedding side feeds scroll, visibility and unload notifications in;
/// trackers subscribe. Dropping the host ends every subscription.
#[derive(Debug)]
pub struct PageHost {
    scroll: watch::Sender<ScrollMetrics>,
    visibility: watch::Sender<Visibility>,
    unload: CancellationToken,
}

impl PageHost {
    pub fn new(initial: ScrollMetrics) -> Self {
        let (scroll, _) = watch::channel(initial);
        let (visibility, _) = watch::channel(Visibility::default());
        Self {
            scroll,
            visibility,
            unload: CancellationToken::new(),
        }
    }

    /// Scroll notification. Bursts coalesce to the latest value.
    pub fn scroll_to(&self, metrics: ScrollMetrics) {
        self.scroll.send_replace(metrics);
    }

    pub fn set_visibility(&self, visibility: Visibility) {
        self.visibility.send_if_modified(|current| {
            let changed = *current != visibility;
            *current = visibility;
            changed
        });
    }

    /// Page unload / navigation away. Irreversible for this host.
    pub fn unload(&self) {
        self.unload.cancel();
    }

    pub fn is_unloaded(&self) -> bool {
        self.unload.is_cancelled()
    }

    pub fn scroll_metrics(&self) -> ScrollMetrics {
        *self.scroll.borrow()
    }

    pub fn visibility(&self) -> Visibility {
        *self.visibility.borrow()
    }

    pub(crate) fn subscribe_scroll(&self) -> watch::Receiver<ScrollMetrics> {
        self.scroll.subscribe()
    }

    pub(crate) fn subscribe_visibility(&self) -> watch::Receiver<Visibility> {
        self.visibility.subscribe()
    }

    pub(crate) fn unload_token(&self) -> CancellationToken {
        self.unload.clone()
    }
}

impl Default for PageHost {
    fn default() -> Self {
        Self::new(ScrollMetrics::default())
    }
}
