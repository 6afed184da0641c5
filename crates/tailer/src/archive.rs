// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daily sweep: move event log files older than the retention cutoff into
//! `archive/`, independent of the sealing the tailer itself performs.

use std::path::Path;
use std::time::Duration;

pub const ARCHIVE_CUTOFF: Duration = Duration::from_secs(7 * 24 * 3600);

/// Move every `pipeline_*.jsonl` file under `event_logs_dir` older than
/// [`ARCHIVE_CUTOFF`] (by mtime) into `archive/`, appending a timestamp on
/// name collision. Returns the number of files moved.
pub fn sweep(event_logs_dir: &Path) -> std::io::Result<usize> {
    let archive_dir = event_logs_dir.join("archive");
    let Ok(entries) = std::fs::read_dir(event_logs_dir) else { return Ok(0) };

    let mut moved = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_event_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("pipeline_") && n.ends_with(".jsonl"));
        if !is_event_log {
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        let Ok(modified) = meta.modified() else { continue };
        let Ok(age) = modified.elapsed() else { continue };
        if age <= ARCHIVE_CUTOFF {
            continue;
        }

        std::fs::create_dir_all(&archive_dir)?;
        let file_name = path.file_name().unwrap_or_default();
        let mut target = archive_dir.join(file_name);
        if target.exists() {
            let stamp = orc_core::time::now().format("%Y%m%dT%H%M%S");
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("pipeline");
            target = archive_dir.join(format!("{stem}.{stamp}.jsonl"));
        }
        std::fs::rename(&path, &target)?;
        moved += 1;
    }
    Ok(moved)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
