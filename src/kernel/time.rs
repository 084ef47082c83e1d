use tokio::time::Instant;

pub const DEFAULT_HEARTBEAT_MS: u64 = 30_000;
pub const DEFAULT_SCROLL_THROTTLE_MS: u64 = 100;

/// Whole seconds between two instants, rounded half up.
pub fn elapsed_secs(started_at: Instant, now: Instant) -> u64 {
    let millis = now.saturating_duration_since(started_at).as_millis();
    ((millis + 500) / 1000) as u64
}
