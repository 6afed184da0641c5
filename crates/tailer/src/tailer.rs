// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live-tails `pipeline_*.jsonl` files dropped by out-of-process runs and
//! republishes their contents onto the in-process Event Bus.

use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use orc_core::Event;
use orc_eventbus::EventBus;

use crate::seen_set::{dedup_key, SeenSet};
use crate::tracker::{system_time_to_run_timestamp, FileTracker};

pub const DEFAULT_TAILER_INTERVAL: Duration = Duration::from_secs(2);
const SEAL_AGE: chrono::Duration = chrono::Duration::minutes(60);
const SEAL_AT_BYTES: u64 = 50 * 1024 * 1024;
const CHUNK_LINES: usize = 100;

pub struct Tailer {
    event_logs_dir: PathBuf,
    offsets_path: PathBuf,
    event_bus: Arc<EventBus>,
    trackers: Mutex<HashMap<String, FileTracker>>,
    seen: Mutex<SeenSet>,
}

impl Tailer {
    pub fn new(event_logs_dir: impl Into<PathBuf>, event_bus: Arc<EventBus>) -> Self {
        let event_logs_dir = event_logs_dir.into();
        let offsets_path = event_logs_dir.join("jsonl_offsets.json");
        let trackers = orc_core::atomic_file::read_json_lenient(&offsets_path).unwrap_or_default();
        Self { event_logs_dir, offsets_path, event_bus, trackers: Mutex::new(trackers), seen: Mutex::new(SeenSet::new()) }
    }

    /// Run the poll loop forever at `interval`. Errors from any single file
    /// are logged and that file is skipped for the tick; the loop itself
    /// never exits early.
    pub async fn run(self: Arc<Self>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// Execute one poll of every candidate file. Public for tests and for
    /// callers that want to drive the loop themselves.
    pub async fn tick(&self) {
        for path in self.candidate_files() {
            if let Err(err) = self.process_file(&path).await {
                tracing::warn!(file = %path.display(), error = %err, "tailer error processing file, skipping this tick");
            }
        }
        self.seen.lock().gc(Instant::now());
    }

    fn candidate_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.event_logs_dir) else { return Vec::new() };
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with("pipeline_") && n.ends_with(".jsonl"))
            })
            .collect()
    }

    async fn process_file(&self, path: &Path) -> std::io::Result<()> {
        let filename = path.file_name().unwrap_or_default().to_string_lossy().to_string();
        let meta = std::fs::metadata(path)?;
        let size = meta.len();
        let mtime = system_time_to_run_timestamp(meta.modified()?);

        let mut tracker = {
            let guard = self.trackers.lock();
            guard.get(&filename).cloned().unwrap_or_else(|| FileTracker::fresh(mtime))
        };

        if tracker.sealed {
            return Ok(());
        }

        let now = orc_core::time::now();
        let unchanged_since_last_tick = tracker.size == size && tracker.offset == size;
        let age = now.signed_duration_since(tracker.mtime);
        if (age > SEAL_AGE && unchanged_since_last_tick) || size > SEAL_AT_BYTES {
            tracker.sealed = true;
            tracker.size = size;
            tracker.mtime = mtime;
            self.commit(&filename, tracker).await;
            return Ok(());
        }

        if size < tracker.offset || mtime < tracker.mtime {
            tracker.offset = 0;
        }
        tracker.size = size;
        tracker.mtime = mtime;

        if size <= tracker.offset {
            self.commit(&filename, tracker).await;
            return Ok(());
        }

        let mut file = std::fs::File::open(path)?;
        file.seek(SeekFrom::Start(tracker.offset))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        let text = String::from_utf8_lossy(&buf).into_owned();

        let ends_in_newline = text.ends_with('\n');
        let mut lines: Vec<&str> = text.split('\n').collect();
        if ends_in_newline {
            lines.pop(); // trailing empty element after the final \n
        } else {
            lines.pop(); // incomplete final line, not processed this tick
        }

        if lines.is_empty() {
            self.commit(&filename, tracker).await;
            return Ok(());
        }

        let mut offset = tracker.offset;
        for chunk in lines.chunks(CHUNK_LINES) {
            for line in chunk {
                offset += line.len() as u64 + 1;
                self.process_line(line).await;
            }
            tracker.offset = offset;
            self.commit(&filename, tracker.clone()).await;
        }

        Ok(())
    }

    async fn process_line(&self, line: &str) {
        let Ok(event) = serde_json::from_str::<Event>(line) else { return };
        if !orc_eventbus::filter::within_live_window(&event, orc_core::time::now()) {
            return;
        }
        let key = dedup_key(&event);
        let is_new = self.seen.lock().check_and_insert(key, Instant::now());
        if !is_new {
            return;
        }
        self.event_bus.republish_observed(event).await;
    }

    async fn commit(&self, filename: &str, tracker: FileTracker) {
        let snapshot = {
            let mut guard = self.trackers.lock();
            guard.insert(filename.to_string(), tracker);
            guard.clone()
        };
        let path = self.offsets_path.clone();
        let result = tokio::task::spawn_blocking(move || orc_core::atomic_file::write_json_atomic(&path, &snapshot)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!(error = %err, "failed to persist tailer offsets"),
            Err(err) => tracing::warn!(error = %err, "tailer offsets persistence task panicked"),
        }
    }
}

#[cfg(test)]
#[path = "tailer_tests.rs"]
mod tests;
