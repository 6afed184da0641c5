// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TTL-cached form of [`crate::EventBus::load_jsonl_events_since`] for UI snapshots.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use orc_core::Event;

struct Cached {
    at: Instant,
    window_hours: i64,
    max_events: usize,
    exclude_verbose: bool,
    events: Vec<Event>,
}

#[derive(Default)]
pub struct SnapshotCache {
    cached: Mutex<Option<Cached>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached scan if it matches the request and is within
    /// `ttl_seconds`, otherwise compute fresh via `compute` and cache it.
    pub fn get_or_compute(
        &self,
        window_hours: i64,
        max_events: usize,
        exclude_verbose: bool,
        ttl_seconds: u64,
        compute: impl FnOnce() -> Vec<Event>,
    ) -> Vec<Event> {
        let mut guard = self.cached.lock();
        if let Some(entry) = guard.as_ref() {
            let fresh = entry.at.elapsed() < Duration::from_secs(ttl_seconds);
            let matches = entry.window_hours == window_hours
                && entry.max_events == max_events
                && entry.exclude_verbose == exclude_verbose;
            if fresh && matches {
                return entry.events.clone();
            }
        }
        let events = compute();
        *guard = Some(Cached { at: Instant::now(), window_hours, max_events, exclude_verbose, events: events.clone() });
        events
    }
}

#[cfg(test)]
#[path = "snapshot_cache_tests.rs"]
mod tests;
