use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};

use super::cancel::{SessionId, TrackerHandle};
use super::config::TrackerConfig;
use super::host::{PageHost, Visibility};
use super::lock;
use super::telemetry::{EventSinkAdapter, TelemetryEvent};
use super::time::elapsed_secs;

/// Per-activation dwell state.
///
/// The baseline is fixed at activation and never paused, so hidden time
/// still counts towards elapsed seconds.
#[derive(Debug, Clone)]
pub struct DwellSession {
    page_id: String,
    started_at: Instant,
    last_heartbeat_at: Option<Instant>,
    last_value: u64,
    finished: bool,
}

impl DwellSession {
    pub fn new(page_id: impl Into<String>, started_at: Instant) -> Self {
        Self {
            page_id: page_id.into(),
            started_at,
            last_heartbeat_at: None,
            last_value: 0,
            finished: false,
        }
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn last_heartbeat_at(&self) -> Option<Instant> {
        self.last_heartbeat_at
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        elapsed_secs(self.started_at, now)
    }

    /// Heartbeat at `now`. `None` once the session is finished.
    pub fn heartbeat(&mut self, now: Instant) -> Option<TelemetryEvent> {
        if self.finished {
            return None;
        }
        let value = self.next_value(now);
        self.last_heartbeat_at = Some(now);
        Some(TelemetryEvent::time_on_page(&self.page_id, value))
    }

    /// The single closing event. Later calls return `None`.
    pub fn finish(&mut self, now: Instant) -> Option<TelemetryEvent> {
        if self.finished {
            return None;
        }
        self.finished = true;
        let value = self.next_value(now);
        Some(TelemetryEvent::time_on_page(&self.page_id, value).with_property("final", true))
    }

    // Never report less than what was already reported.
    fn next_value(&mut self, now: Instant) -> u64 {
        self.last_value = self.last_value.max(self.elapsed_secs(now));
        self.last_value
    }
}

/// Emits cumulative `time_on_page` heartbeats while visible and one final
/// event when the page goes away.
#[derive(Debug, Clone)]
pub struct DwellTimeTracker {
    interval: Duration,
    sink: EventSinkAdapter,
}

impl DwellTimeTracker {
    pub fn new(config: &TrackerConfig, sink: EventSinkAdapter) -> Self {
        Self {
            // A zero period would make `interval_at` panic.
            interval: config.heartbeat_interval().max(Duration::from_millis(1)),
            sink,
        }
    }

    pub fn activate(&self, page_id: &str, host: &PageHost) -> TrackerHandle {
        let Ok(runtime) = Handle::try_current() else {
            warn!(page = page_id, "no async runtime, dwell tracking disabled");
            return TrackerHandle::inert();
        };

        let session_id = SessionId::new();
        let started_at = Instant::now();
        let session = Arc::new(Mutex::new(DwellSession::new(page_id, started_at)));
        let cancel = CancellationToken::new();

        let span = tracing::info_span!("time_on_page", page = page_id, session = %session_id);
        let task = runtime.spawn(
            heartbeat(
                host.subscribe_visibility(),
                host.unload_token(),
                cancel.clone(),
                Arc::clone(&session),
                self.sink.clone(),
                started_at,
                self.interval,
            )
            .instrument(span),
        );
        info!(page = page_id, session = %session_id, "dwell tracking activated");

        let sink = self.sink.clone();
        TrackerHandle::new(session_id, move || {
            cancel.cancel();
            task.abort();
            let mut session = lock(&session);
            if let Some(event) = session.finish(Instant::now()) {
                info!(
                    page = session.page_id(),
                    session = %session_id,
                    elapsed_secs = ?event.value,
                    "dwell tracking deactivated"
                );
                sink.emit(&event);
            }
        })
    }
}

async fn heartbeat(
    visibility: watch::Receiver<Visibility>,
    unload: CancellationToken,
    cancel: CancellationToken,
    session: Arc<Mutex<DwellSession>>,
    sink: EventSinkAdapter,
    started_at: Instant,
    period: Duration,
) {
    let mut ticks = interval_at(started_at + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = unload.cancelled() => {
                let mut session = lock(&session);
                if let Some(event) = session.finish(Instant::now()) {
                    debug!(elapsed_secs = ?event.value, "page unloaded, final dwell event");
                    sink.emit(&event);
                }
                break;
            }
            _ = ticks.tick() => {
                if *visibility.borrow() == Visibility::Hidden {
                    debug!("tab hidden, heartbeat suppressed");
                    continue;
                }
                let mut session = lock(&session);
                if let Some(event) = session.heartbeat(Instant::now()) {
                    sink.emit(&event);
                }
            }
        }
    }
}
