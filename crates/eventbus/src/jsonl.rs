// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run append-only JSONL file, with size-based rotation into `archive/`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use orc_core::{Event, RunId};

pub const ROTATE_AT_BYTES: u64 = 100 * 1024 * 1024;

pub struct JsonlStore {
    event_logs_dir: PathBuf,
}

impl JsonlStore {
    pub fn new(event_logs_dir: impl Into<PathBuf>) -> Self {
        Self { event_logs_dir: event_logs_dir.into() }
    }

    pub fn path_for_run(&self, run_id: RunId) -> PathBuf {
        self.event_logs_dir.join(format!("pipeline_{run_id}.jsonl"))
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.event_logs_dir.join("archive")
    }

    /// Append one event line, rotating the file into `archive/` first if it
    /// has grown past [`ROTATE_AT_BYTES`].
    pub fn append(&self, event: &Event) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.event_logs_dir)?;
        let path = self.path_for_run(event.run_id);
        self.rotate_if_oversized(&path)?;

        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(&line)
    }

    fn rotate_if_oversized(&self, path: &Path) -> std::io::Result<()> {
        let Ok(meta) = std::fs::metadata(path) else { return Ok(()) };
        if meta.len() < ROTATE_AT_BYTES {
            return Ok(());
        }
        std::fs::create_dir_all(self.archive_dir())?;
        let stamp = orc_core::time::now().format("%Y%m%dT%H%M%S");
        let file_name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("pipeline");
        let rotated = self.archive_dir().join(format!("{file_name}.{stamp}.jsonl"));
        std::fs::rename(path, rotated)
    }

    /// Parse up to `limit` most recent lines for a run, skipping malformed
    /// ones. A snapshot read: open/read/close, tolerant of concurrent writers.
    pub fn tail_for_run(&self, run_id: RunId, limit: usize) -> Vec<Event> {
        let events = read_all(&self.path_for_run(run_id));
        let skip = events.len().saturating_sub(limit);
        events.into_iter().skip(skip).collect()
    }

    /// Every non-archived `pipeline_*.jsonl` file under the event logs
    /// directory, for cross-run scans.
    pub fn all_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.event_logs_dir) else { return Vec::new() };
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("pipeline_") && n.ends_with(".jsonl"))
            })
            .collect()
    }
}

/// Parse every well-formed line of `path` as an [`Event`], skipping
/// malformed lines with no error raised to the caller.
pub fn read_all(path: &Path) -> Vec<Event> {
    let Ok(contents) = std::fs::read_to_string(path) else { return Vec::new() };
    contents.lines().filter_map(|line| serde_json::from_str(line).ok()).collect()
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
