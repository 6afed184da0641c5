// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-writer mutual exclusion across all orchestrator processes on one host.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use parking_lot::Mutex;

use orc_core::RunId;

use crate::error::LockError;
use crate::record::LockRecord;

pub const DEFAULT_MAX_RUNTIME: Duration = Duration::from_secs(3600);

pub struct LockManager {
    lock_path: PathBuf,
    max_runtime: Duration,
    guard: Mutex<()>,
}

impl LockManager {
    pub fn new(lock_dir: impl Into<PathBuf>, max_runtime: Duration) -> Result<Self, LockError> {
        let lock_dir = lock_dir.into();
        std::fs::create_dir_all(&lock_dir).map_err(LockError::Configuration)?;
        Ok(Self { lock_path: lock_dir.join("pipeline.lock"), max_runtime, guard: Mutex::new(()) })
    }

    /// Acquire the lock for `run_id`. Reclaim-on-staleness is the only
    /// mechanism that overrides an existing lock.
    pub fn acquire(&self, run_id: RunId) -> bool {
        let _guard = self.guard.lock();
        if self.try_create(run_id) {
            return true;
        }

        if !self.is_stale_locked() {
            return false;
        }

        tracing::warn!(run_id = %run_id, "stale lock detected, reclaiming");
        if std::fs::remove_file(&self.lock_path).is_err() {
            return false;
        }
        self.try_create(run_id)
    }

    /// Attempt the atomic `O_CREAT|O_EXCL`-equivalent create. `false` means
    /// "exists" (someone else holds, or won the race) or another io error.
    fn try_create(&self, run_id: RunId) -> bool {
        let file = OpenOptions::new().write(true).create_new(true).open(&self.lock_path);
        let mut file = match file {
            Ok(f) => f,
            Err(_) => return false,
        };
        let record = LockRecord::new(run_id);
        let Ok(bytes) = serde_json::to_vec(&record) else { return false };
        if file.write_all(&bytes).is_err() {
            let _ = std::fs::remove_file(&self.lock_path);
            return false;
        }
        tracing::info!(run_id = %run_id, "lock acquired");
        true
    }

    /// Release the lock iff `run_id` owns it.
    pub fn release(&self, run_id: RunId) -> bool {
        let _guard = self.guard.lock();
        let Some(record) = self.read_record() else { return true };
        if record.run_id != run_id {
            tracing::warn!(run_id = %run_id, owner = %record.run_id, "lock owned by a different run, refusing release");
            return false;
        }
        match std::fs::remove_file(&self.lock_path) {
            Ok(()) => {
                tracing::info!(run_id = %run_id, "lock released");
                true
            }
            Err(_) => false,
        }
    }

    pub fn is_locked(&self) -> bool {
        let _guard = self.guard.lock();
        self.lock_path.exists() && !self.is_stale_locked()
    }

    pub fn get_lock_info(&self) -> Option<LockRecord> {
        let _guard = self.guard.lock();
        self.read_record()
    }

    /// Administrative escape hatch: remove the lock file unconditionally.
    pub fn force_clear_all(&self) -> bool {
        let _guard = self.guard.lock();
        match std::fs::remove_file(&self.lock_path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(_) => false,
        }
    }

    fn read_record(&self) -> Option<LockRecord> {
        let bytes = std::fs::read(&self.lock_path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// An unreadable/corrupt lock file is treated as stale.
    fn is_stale_locked(&self) -> bool {
        let Ok(meta) = std::fs::metadata(&self.lock_path) else { return true };
        let mtime_age = meta.modified().ok().and_then(|m| m.elapsed().ok()).unwrap_or(self.max_runtime + Duration::from_secs(1));
        if mtime_age > self.max_runtime {
            return true;
        }
        let Some(record) = self.read_record() else { return true };
        let age_sec = orc_core::time::now().signed_duration_since(record.acquired_at).num_seconds();
        age_sec > self.max_runtime.as_secs() as i64
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
