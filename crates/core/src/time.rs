// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timezone-aware timestamps for the pipeline clock (America/Chicago).

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub const PIPELINE_TZ: Tz = chrono_tz::US::Central;

/// Timezone-aware instant, always carried in `America/Chicago`.
pub type RunTimestamp = DateTime<Tz>;

/// The current instant in `America/Chicago`.
pub fn now() -> RunTimestamp {
    Utc::now().with_timezone(&PIPELINE_TZ)
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
