// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status inference lives next to, not inside, the scheduler control
//! layer: it is derived from observed `scheduler/start` events, not from
//! anything this crate's backend reports.

use chrono::Duration;
use orc_core::time::RunTimestamp;

pub const DEFAULT_EXPECTED_INTERVAL_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleHealth {
    Active,
    Stale,
    Unknown,
}

/// `last_scheduler_start` is the timestamp of the most recent observed
/// `scheduler/start` event on the Event Bus, if any has ever been seen.
pub fn infer_schedule_health(
    last_scheduler_start: Option<RunTimestamp>,
    now: RunTimestamp,
    expected_interval: Duration,
) -> ScheduleHealth {
    let Some(last_start) = last_scheduler_start else { return ScheduleHealth::Unknown };
    let window = expected_interval * 2;
    if now.signed_duration_since(last_start) <= window {
        ScheduleHealth::Active
    } else {
        ScheduleHealth::Stale
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
