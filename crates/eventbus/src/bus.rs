// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event bus: a live channel with a historical side effect.

use std::path::PathBuf;

use parking_lot::Mutex;
use serde_json::Value;

use orc_core::{Event, EventKind, RunId};

use crate::error::EventBusError;
use crate::filter::{self, PublishDecision};
use crate::jsonl::JsonlStore;
use crate::ring::Ring;
use crate::subscriber::{self, Subscriber, SubscriberSlot};

pub const DEFAULT_BUFFER_SIZE: usize = 1000;

/// Raw shape of an event as it arrives from an external caller (e.g. the
/// sibling process's publish callback), before the publish-contract
/// normalization steps run.
pub struct PublishInput {
    pub run_id: Option<String>,
    pub stage: String,
    pub event: EventKind,
    pub timestamp: Option<orc_core::time::RunTimestamp>,
    pub msg: Option<String>,
    pub data: Option<Value>,
}

impl PublishInput {
    pub fn new(stage: impl Into<String>, event: EventKind) -> Self {
        Self { run_id: None, stage: stage.into(), event, timestamp: None, msg: None, data: None }
    }
}

pub struct EventBus {
    ring: Mutex<Ring>,
    subscribers: Mutex<Vec<SubscriberSlot>>,
    jsonl: JsonlStore,
    snapshot_cache: crate::snapshot_cache::SnapshotCache,
}

impl EventBus {
    pub fn new(event_logs_dir: impl Into<PathBuf>, buffer_size: usize) -> Self {
        Self {
            ring: Mutex::new(Ring::new(buffer_size)),
            subscribers: Mutex::new(Vec::new()),
            jsonl: JsonlStore::new(event_logs_dir),
            snapshot_cache: crate::snapshot_cache::SnapshotCache::new(),
        }
    }

    /// Publish an event, normalizing `run_id`/`timestamp` and running it
    /// through the filter pipeline. Never panics; a JSONL write failure is
    /// logged as a warning and swallowed.
    pub async fn publish(&self, input: PublishInput) -> Result<(), EventBusError> {
        let run_id = filter::normalize_run_id(input.run_id.as_deref())?;
        let timestamp = input.timestamp.unwrap_or_else(orc_core::time::now);
        let event = Event {
            run_id,
            stage: input.stage,
            event: input.event,
            timestamp,
            msg: input.msg,
            data: input.data,
        };
        self.publish_normalized(event).await;
        Ok(())
    }

    /// Publish an already-normalized event (the common internal path: every
    /// orchestrator component already has a valid typed `RunId`).
    pub async fn publish_normalized(&self, event: Event) {
        let decision = filter::classify(&event, orc_core::time::now());

        if matches!(decision, PublishDecision::Accept | PublishDecision::JsonlOnly) {
            if let Err(err) = self.jsonl.append(&event) {
                tracing::warn!(error = %err, run_id = %event.run_id, "failed to append event to jsonl");
            }
        }

        if decision == PublishDecision::Accept {
            self.ring.lock().push(event.clone());
            self.broadcast(event);
        }
    }

    /// Push an already-persisted event onto the ring/subscribers only,
    /// bypassing the per-run JSONL append. For the Tailer: the event it
    /// just parsed already lives in the very file it read it from, so
    /// running it back through [`Self::publish_normalized`] would
    /// duplicate the line on disk.
    pub async fn republish_observed(&self, event: Event) {
        let decision = filter::classify(&event, orc_core::time::now());
        if decision == PublishDecision::Accept {
            self.ring.lock().push(event.clone());
            self.broadcast(event);
        }
    }

    fn broadcast(&self, event: Event) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|slot| slot.push(event.clone()));
    }

    /// Bounded queue; yields the ring snapshot first, then live events.
    pub fn subscribe(&self) -> Subscriber {
        let (slot, sub) = subscriber::channel();
        for event in self.ring.lock().snapshot() {
            slot.push(event);
        }
        let mut subscribers = self.subscribers.lock();
        if subscribers.len() < subscriber::MAX_SUBSCRIBERS {
            subscribers.push(slot);
        }
        sub
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn get_recent_events(&self, limit: usize) -> Vec<Event> {
        self.ring.lock().recent(limit)
    }

    pub fn get_events_for_run(&self, run_id: RunId, limit: usize) -> Vec<Event> {
        self.jsonl.tail_for_run(run_id, limit)
    }

    /// Scan across all JSONL files (not live-channel semantics) for events
    /// within the last `hours`, chronologically sorted, capped at
    /// `max_events`. Verbose events are skipped when `exclude_verbose`.
    pub fn load_jsonl_events_since(&self, hours: i64, max_events: usize, exclude_verbose: bool) -> Vec<Event> {
        let cutoff = orc_core::time::now() - chrono::Duration::hours(hours);
        let mut events: Vec<Event> = self
            .jsonl
            .all_files()
            .into_iter()
            .flat_map(|path| crate::jsonl::read_all(&path))
            .filter(|e| e.timestamp >= cutoff)
            .filter(|e| !exclude_verbose || is_core_event(e))
            .collect();
        events.sort_by_key(|e| e.timestamp);
        if events.len() > max_events {
            let drop = events.len() - max_events;
            events.drain(0..drop);
        }
        events
    }

    /// Cached form of [`Self::load_jsonl_events_since`] for UI snapshots.
    pub fn get_snapshot_cached(&self, window_hours: i64, max_events: usize, exclude_verbose: bool, ttl_seconds: u64) -> Vec<Event> {
        self.snapshot_cache.get_or_compute(window_hours, max_events, exclude_verbose, ttl_seconds, || {
            self.load_jsonl_events_since(window_hours, max_events, exclude_verbose)
        })
    }
}

fn is_core_event(event: &Event) -> bool {
    matches!(
        event.event,
        EventKind::Start | EventKind::Success | EventKind::Failed | EventKind::Error | EventKind::StateChange
    )
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
