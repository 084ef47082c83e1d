use tracing::info;

use super::cancel::TrackerHandle;
use super::config::TrackerConfig;
use super::dwell::DwellTimeTracker;
use super::host::PageHost;
use super::scroll::ScrollDepthTracker;
use super::telemetry::EventSinkAdapter;
use crate::catalog::EventCatalog;

/// Everything a page needs at mount time, built once from config and sinks.
#[derive(Debug, Clone)]
pub struct Instrumentation {
    pub scroll: ScrollDepthTracker,
    pub dwell: DwellTimeTracker,
    pub catalog: EventCatalog,
}

impl Instrumentation {
    pub fn new(config: &TrackerConfig, sink: EventSinkAdapter) -> Self {
        Self {
            scroll: ScrollDepthTracker::new(config, sink.clone()),
            dwell: DwellTimeTracker::new(config, sink.clone()),
            catalog: EventCatalog::new(sink),
        }
    }

    /// Activates both trackers for one page instance.
    pub fn mount(&self, page_id: &str, host: &PageHost) -> PageSession {
        info!(page = page_id, "page mounted");
        PageSession {
            page_id: page_id.to_string(),
            scroll: self.scroll.activate(page_id, host),
            dwell: self.dwell.activate(page_id, host),
        }
    }
}

/// Both tracker handles of one mount. Unmounting (or dropping) releases them.
#[derive(Debug)]
pub struct PageSession {
    page_id: String,
    scroll: TrackerHandle,
    dwell: TrackerHandle,
}

impl PageSession {
    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn is_active(&self) -> bool {
        self.scroll.is_active() || self.dwell.is_active()
    }

    pub fn unmount(&mut self) {
        if !self.is_active() {
            return;
        }
        self.scroll.deactivate();
        self.dwell.deactivate();
        info!(page = %self.page_id, "page unmounted");
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        self.unmount();
    }
}
