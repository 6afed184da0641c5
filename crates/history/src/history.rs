// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only run summaries, queryable by recency and result.

use std::io::Write;
use std::path::PathBuf;

use orc_core::{RunId, RunResult, RunSummary};

use crate::error::HistoryError;

pub struct RunHistory {
    runs_dir: PathBuf,
}

impl RunHistory {
    pub fn new(runs_dir: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let runs_dir = runs_dir.into();
        std::fs::create_dir_all(&runs_dir).map_err(HistoryError::Configuration)?;
        Ok(Self { runs_dir })
    }

    fn file_for(&self, summary: &RunSummary) -> PathBuf {
        self.runs_dir.join(format!("{}.jsonl", summary.started_at.format("%Y-%m-%d")))
    }

    /// Append-only: never mutates past records.
    pub fn persist(&self, summary: &RunSummary) -> Result<(), HistoryError> {
        let path = self.file_for(summary);
        let mut line = serde_json::to_vec(summary).map_err(|e| HistoryError::Append(e.into()))?;
        line.push(b'\n');
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(HistoryError::Append)?;
        file.write_all(&line).map_err(HistoryError::Append)
    }

    fn dated_files_newest_first(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.runs_dir) else { return Vec::new() };
        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("jsonl"))
            .collect();
        files.sort();
        files.reverse();
        files
    }

    /// Reads recent files newest-first, within each file newest-line-first.
    /// Corrupt lines are skipped with a warning.
    pub fn list_runs(&self, limit: usize, result_filter: Option<RunResult>) -> Vec<RunSummary> {
        let mut out = Vec::new();
        for path in self.dated_files_newest_first() {
            let Ok(contents) = std::fs::read_to_string(&path) else { continue };
            for line in contents.lines().rev() {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<RunSummary>(line) {
                    Ok(summary) => {
                        if result_filter.map_or(true, |f| f == summary.result) {
                            out.push(summary);
                            if out.len() >= limit {
                                return out;
                            }
                        }
                    }
                    Err(err) => tracing::warn!(file = %path.display(), error = %err, "skipping corrupt run summary line"),
                }
            }
        }
        out
    }

    /// Linearly searches recent files for `run_id`.
    pub fn get_run(&self, run_id: RunId) -> Option<RunSummary> {
        for path in self.dated_files_newest_first() {
            let Ok(contents) = std::fs::read_to_string(&path) else { continue };
            for line in contents.lines() {
                if let Ok(summary) = serde_json::from_str::<RunSummary>(line) {
                    if summary.run_id == run_id {
                        return Some(summary);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
