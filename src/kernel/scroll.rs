use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};

use super::cancel::{SessionId, TrackerHandle};
use super::config::TrackerConfig;
use super::host::{PageHost, ScrollMetrics};
use super::lock;
use super::telemetry::{EventSinkAdapter, TelemetryEvent};

/// Per-activation scroll state. Pure: feed metrics in, get crossings out.
#[derive(Debug, Clone)]
pub struct ScrollSession {
    page_id: String,
    thresholds: Vec<u8>,
    crossed: BTreeSet<u8>,
    max_depth_seen: u8,
    closed: bool,
}

impl ScrollSession {
    /// `thresholds` are sorted and de-duplicated here, so the emission order
    /// never depends on how the caller listed them.
    pub fn new(page_id: impl Into<String>, thresholds: &[u8]) -> Self {
        let mut thresholds = thresholds.to_vec();
        thresholds.sort_unstable();
        thresholds.dedup();
        Self {
            page_id: page_id.into(),
            thresholds,
            crossed: BTreeSet::new(),
            max_depth_seen: 0,
            closed: false,
        }
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn max_depth_seen(&self) -> u8 {
        self.max_depth_seen
    }

    pub fn crossed(&self) -> &BTreeSet<u8> {
        &self.crossed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Evaluates one scroll position. Returns newly crossed thresholds as
    /// events, ascending. Non-scrollable geometry yields nothing.
    pub fn observe(&mut self, metrics: ScrollMetrics) -> Vec<TelemetryEvent> {
        if self.closed {
            return Vec::new();
        }
        let Some(percent) = metrics.percent() else {
            return Vec::new();
        };
        self.max_depth_seen = self.max_depth_seen.max(percent);

        let mut events = Vec::new();
        for &threshold in &self.thresholds {
            if percent < threshold {
                break;
            }
            if self.crossed.insert(threshold) {
                events.push(TelemetryEvent::scroll_depth(&self.page_id, threshold));
            }
        }
        events
    }

    /// Latches the session. Crossed thresholds stay crossed.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

/// Emits `scroll_depth` the first time each configured threshold is reached.
#[derive(Debug, Clone)]
pub struct ScrollDepthTracker {
    thresholds: Vec<u8>,
    throttle: Duration,
    sink: EventSinkAdapter,
}

impl ScrollDepthTracker {
    pub fn new(config: &TrackerConfig, sink: EventSinkAdapter) -> Self {
        Self {
            thresholds: config.scroll_thresholds.clone(),
            throttle: config.scroll_throttle(),
            sink,
        }
    }

    /// Starts observing `host` for `page_id`. The returned handle is the only
    /// owner of the session; releasing it stops all observation.
    pub fn activate(&self, page_id: &str, host: &PageHost) -> TrackerHandle {
        let Ok(runtime) = Handle::try_current() else {
            warn!(page = page_id, "no async runtime, scroll tracking disabled");
            return TrackerHandle::inert();
        };

        let session_id = SessionId::new();
        let session = Arc::new(Mutex::new(ScrollSession::new(page_id, &self.thresholds)));
        let cancel = CancellationToken::new();

        let span = tracing::info_span!("scroll_depth", page = page_id, session = %session_id);
        let task = runtime.spawn(
            observe(
                host.subscribe_scroll(),
                host.unload_token(),
                cancel.clone(),
                Arc::clone(&session),
                self.sink.clone(),
                self.throttle,
            )
            .instrument(span),
        );
        info!(page = page_id, session = %session_id, "scroll tracking activated");

        TrackerHandle::new(session_id, move || {
            cancel.cancel();
            task.abort();
            let mut session = lock(&session);
            session.close();
            info!(
                page = session.page_id(),
                session = %session_id,
                max_depth = session.max_depth_seen(),
                "scroll tracking deactivated"
            );
        })
    }
}

async fn observe(
    mut scroll: watch::Receiver<ScrollMetrics>,
    unload: CancellationToken,
    cancel: CancellationToken,
    session: Arc<Mutex<ScrollSession>>,
    sink: EventSinkAdapter,
    throttle: Duration,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = unload.cancelled() => {
                lock(&session).close();
                debug!("page unloaded, scroll tracking stopped");
                break;
            }
            changed = scroll.changed() => {
                if changed.is_err() {
                    debug!("host dropped, scroll tracking stopped");
                    break;
                }
                let metrics = *scroll.borrow_and_update();
                {
                    // Emit under the lock so nothing follows a deactivation.
                    let mut session = lock(&session);
                    for event in session.observe(metrics) {
                        sink.emit(&event);
                    }
                }
                if !throttle.is_zero() {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(throttle) => {}
                    }
                }
            }
        }
    }
}
