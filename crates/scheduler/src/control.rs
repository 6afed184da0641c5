// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observer and advisory control layer for an external OS task scheduler.
//! Never executes or times pipeline runs; never loops. A run originates
//! from the OS scheduler invoking a standalone process, or from a manual
//! request through the Facade.

use std::sync::Arc;

use orc_core::time::RunTimestamp;
use serde::{Deserialize, Serialize};

use crate::audit::{AuditStore, SchedulerAudit};
use crate::backend::{SchedulerBackend, TaskStatus, WindowsScheduleInfo};
use crate::error::SchedulerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerState {
    pub last_requested_enabled: bool,
    pub last_changed_timestamp: Option<RunTimestamp>,
    pub last_changed_by: Option<String>,
    pub windows_task_status: TaskStatus,
}

pub struct SchedulerControl {
    backend: Arc<dyn SchedulerBackend>,
    audit: AuditStore,
}

impl SchedulerControl {
    pub fn new(backend: Arc<dyn SchedulerBackend>, audit_path: impl Into<std::path::PathBuf>) -> Self {
        Self { backend, audit: AuditStore::new(audit_path) }
    }

    /// Returns `(ok, error)`. On success, persists the audit record; the
    /// audit is never consulted to decide whether this call should run.
    pub async fn enable(&self, changed_by: &str) -> (bool, Option<String>) {
        match self.backend.set_enabled(true).await {
            Ok(()) => {
                if let Err(err) = self.audit.save(true, changed_by) {
                    tracing::warn!(error = %err, "failed to persist scheduler audit after enable");
                }
                tracing::info!(changed_by, "scheduler task enabled");
                (true, None)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to enable scheduler task");
                (false, Some(err.to_string()))
            }
        }
    }

    pub async fn disable(&self, changed_by: &str) -> (bool, Option<String>) {
        match self.backend.set_enabled(false).await {
            Ok(()) => {
                if let Err(err) = self.audit.save(false, changed_by) {
                    tracing::warn!(error = %err, "failed to persist scheduler audit after disable");
                }
                tracing::info!(changed_by, "scheduler task disabled");
                (true, None)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to disable scheduler task");
                (false, Some(err.to_string()))
            }
        }
    }

    /// Source of truth is the OS scheduler's reported state, not the
    /// audit file. Falls back to the audit record if the backend can't
    /// be reached at all.
    pub async fn is_enabled(&self) -> bool {
        match self.backend.query_status().await {
            Ok(status) => status.enabled,
            Err(err) => {
                tracing::warn!(error = %err, "could not reach scheduler backend, falling back to audit record");
                self.audit.load().last_requested_enabled
            }
        }
    }

    /// Loads the audit record and the live backend status side by side.
    /// Logs a mismatch but never auto-re-enables; an explicit `enable`
    /// call is required.
    pub async fn get_state(&self) -> Result<SchedulerState, SchedulerError> {
        let audit = self.audit.load();
        let windows_task_status = self.backend.query_status().await?;

        if audit.last_requested_enabled && windows_task_status.exists && !windows_task_status.enabled {
            tracing::warn!(
                "scheduler state mismatch: audit record says enabled but the OS scheduler reports it disabled; \
                 it may have auto-disabled the task after failures. Explicit re-enable required."
            );
        }

        Ok(SchedulerState {
            last_requested_enabled: audit.last_requested_enabled,
            last_changed_timestamp: audit.last_changed_timestamp,
            last_changed_by: audit.last_changed_by,
            windows_task_status,
        })
    }

    pub async fn get_windows_schedule_info(&self) -> Result<WindowsScheduleInfo, SchedulerError> {
        self.backend.schedule_info().await
    }

    /// Approximate display-only next run time; does not trigger anything.
    /// Prefers the OS scheduler's own reported next-run time, falling
    /// back to the next quarter-hour mark if that is unavailable or
    /// unparseable.
    pub async fn get_next_run_time(&self) -> Option<RunTimestamp> {
        if let Ok(info) = self.backend.schedule_info().await {
            if let Some(raw) = info.next_run_time.as_deref() {
                if let Some(parsed) = parse_backend_timestamp(raw) {
                    return Some(parsed);
                }
            }
        }
        Some(next_quarter_hour_mark(orc_core::time::now()))
    }
}

fn parse_backend_timestamp(raw: &str) -> Option<RunTimestamp> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&orc_core::time::PIPELINE_TZ))
}

fn next_quarter_hour_mark(now: RunTimestamp) -> RunTimestamp {
    use chrono::Timelike;
    let minute = now.minute();
    let (next_minute, bump_hour) = match minute {
        m if m < 15 => (15, false),
        m if m < 30 => (30, false),
        m if m < 45 => (45, false),
        _ => (0, true),
    };
    let base = if bump_hour { now + chrono::Duration::hours(1) } else { now };
    base.with_minute(next_minute)
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(base)
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
