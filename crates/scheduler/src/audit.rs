// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit-only record of the last requested enable/disable. Never the
//! source of truth for "is the task enabled" — the OS scheduler's own
//! reported state is.

use std::path::{Path, PathBuf};

use orc_core::atomic_file::{read_json_lenient, write_json_atomic};
use orc_core::time::RunTimestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerAudit {
    pub last_requested_enabled: bool,
    pub last_changed_timestamp: Option<RunTimestamp>,
    pub last_changed_by: Option<String>,
}

impl Default for SchedulerAudit {
    fn default() -> Self {
        Self { last_requested_enabled: false, last_changed_timestamp: None, last_changed_by: None }
    }
}

pub struct AuditStore {
    path: PathBuf,
}

impl AuditStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> SchedulerAudit {
        read_json_lenient(&self.path).unwrap_or_default()
    }

    pub fn save(&self, enabled: bool, changed_by: &str) -> std::io::Result<()> {
        let audit = SchedulerAudit {
            last_requested_enabled: enabled,
            last_changed_timestamp: Some(orc_core::time::now()),
            last_changed_by: Some(changed_by.to_string()),
        };
        write_json_atomic(&self.path, &audit)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
