// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

use orc_core::time::RunTimestamp;
use orc_core::RunId;

/// `{run_id, acquired_at}` — no heartbeat field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockRecord {
    pub run_id: RunId,
    pub acquired_at: RunTimestamp,
}

impl LockRecord {
    pub fn new(run_id: RunId) -> Self {
        Self { run_id, acquired_at: orc_core::time::now() }
    }
}
