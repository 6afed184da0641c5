// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-file tailer state, persisted as a whole map to `jsonl_offsets.json`.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use orc_core::time::RunTimestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTracker {
    pub offset: u64,
    pub size: u64,
    pub mtime: RunTimestamp,
    pub sealed: bool,
}

impl FileTracker {
    pub fn fresh(mtime: RunTimestamp) -> Self {
        Self { offset: 0, size: 0, mtime, sealed: false }
    }
}

/// `SystemTime` (what [`std::fs::Metadata::modified`] returns) converted to
/// the pipeline's `America/Chicago` timestamp type.
pub fn system_time_to_run_timestamp(t: SystemTime) -> RunTimestamp {
    let utc: chrono::DateTime<chrono::Utc> = t.into();
    utc.with_timezone(&orc_core::time::PIPELINE_TZ)
}
