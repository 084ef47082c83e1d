use std::collections::{BTreeMap, VecDeque};

use super::event::{ACTION_SCROLL_DEPTH, ACTION_TIME_ON_PAGE};
use super::recorder::RecordedCall;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngagementSnapshot {
    pub total_calls: u64,
    pub by_action: BTreeMap<String, u64>,
    pub pages: BTreeMap<String, PageStats>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageStats {
    pub deepest_threshold: Option<u8>,
    pub scroll_events: u64,
    pub heartbeats: u64,
    pub dwell_secs: u64,
    pub finalized: bool,
}

impl EngagementSnapshot {
    pub fn count(&self, action: &str) -> u64 {
        self.by_action.get(action).copied().unwrap_or(0)
    }

    pub fn page(&self, page_id: &str) -> Option<&PageStats> {
        self.pages.get(page_id)
    }
}

/// Pure aggregation over collector-shaped calls.
pub fn compute_snapshot(calls: &VecDeque<RecordedCall>) -> EngagementSnapshot {
    let mut snap = EngagementSnapshot::default();

    for call in calls {
        snap.total_calls += 1;
        *snap.by_action.entry(call.action.clone()).or_insert(0) += 1;

        let Some(page_id) = call.str_field("label") else {
            continue;
        };

        match call.action.as_str() {
            ACTION_SCROLL_DEPTH => {
                let stats = snap.pages.entry(page_id.to_string()).or_default();
                stats.scroll_events += 1;
                if let Some(depth) = call.value() {
                    let depth = depth.clamp(0.0, 100.0) as u8;
                    stats.deepest_threshold = Some(stats.deepest_threshold.map_or(depth, |d| d.max(depth)));
                }
            }
            ACTION_TIME_ON_PAGE => {
                let stats = snap.pages.entry(page_id.to_string()).or_default();
                let is_final = call
                    .metadata
                    .get("final")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                if is_final {
                    stats.finalized = true;
                } else {
                    stats.heartbeats += 1;
                }
                if let Some(secs) = call.value() {
                    // Values are cumulative, so the largest one is the dwell time.
                    stats.dwell_secs = stats.dwell_secs.max(secs.max(0.0) as u64);
                }
            }
            _ => {}
        }
    }

    snap
}
