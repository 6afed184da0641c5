// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Last-resort anti-race dedup guard, keyed by content hash. The monotonic
//! offset is the primary correctness mechanism; this only protects against
//! restart races where a tick reprocesses bytes it already published.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use md5::{Digest, Md5};

use orc_core::Event;

pub const TTL: Duration = Duration::from_secs(3600);
pub const CAPACITY: usize = 50_000;
pub const EVICT_TO: usize = 25_000;

pub type DedupKey = [u8; 16];

/// MD5 of `run_id|stage|event|timestamp|sorted(data)`.
pub fn dedup_key(event: &Event) -> DedupKey {
    let data = event
        .data
        .as_ref()
        .map(|v| serde_json::to_string(&sort_value(v)).unwrap_or_default())
        .unwrap_or_default();
    let material = format!("{}|{}|{}|{}|{}", event.run_id, event.stage, event.event, event.timestamp.to_rfc3339(), data);
    let mut hasher = Md5::new();
    hasher.update(material.as_bytes());
    hasher.finalize().into()
}

fn sort_value(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let sorted: std::collections::BTreeMap<_, _> = map.iter().map(|(k, v)| (k.clone(), sort_value(v))).collect();
            serde_json::to_value(sorted).unwrap_or(serde_json::Value::Null)
        }
        serde_json::Value::Array(items) => serde_json::Value::Array(items.iter().map(sort_value).collect()),
        other => other.clone(),
    }
}

#[derive(Default)]
pub struct SeenSet {
    entries: HashMap<DedupKey, Instant>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `key` had not been seen in the last hour (and
    /// records it as seen now); `false` if it is a repeat.
    pub fn check_and_insert(&mut self, key: DedupKey, now: Instant) -> bool {
        if let Some(seen_at) = self.entries.get(&key) {
            if now.duration_since(*seen_at) < TTL {
                return false;
            }
        }
        self.entries.insert(key, now);
        true
    }

    /// Drop entries older than [`TTL`]; if still over [`CAPACITY`], keep
    /// only the most recent [`EVICT_TO`].
    pub fn gc(&mut self, now: Instant) {
        self.entries.retain(|_, seen_at| now.duration_since(*seen_at) < TTL);
        if self.entries.len() <= CAPACITY {
            return;
        }
        let mut by_recency: Vec<(DedupKey, Instant)> = self.entries.drain().collect();
        by_recency.sort_by_key(|(_, seen_at)| std::cmp::Reverse(*seen_at));
        by_recency.truncate(EVICT_TO);
        self.entries = by_recency.into_iter().collect();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "seen_set_tests.rs"]
mod tests;
