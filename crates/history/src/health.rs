// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Derive run health from history, and gate whether the next run may start.

use orc_core::{RunHealth, RunResult, RunSummary};

pub const HEALTH_WINDOW: usize = 5;

/// Examine the most recent [`HEALTH_WINDOW`] summaries (newest first) and
/// derive a health label plus human-readable reasons.
pub fn compute_run_health(recent_newest_first: &[RunSummary]) -> (RunHealth, Vec<String>) {
    if recent_newest_first.len() < HEALTH_WINDOW {
        return (
            RunHealth::Unknown,
            vec![format!("fewer than {HEALTH_WINDOW} runs recorded ({})", recent_newest_first.len())],
        );
    }

    let window = &recent_newest_first[..HEALTH_WINDOW];
    let most_recent = &window[0];

    if most_recent.result == RunResult::Stopped {
        return (RunHealth::Unknown, vec!["most recent run was stopped".to_string()]);
    }

    let failed = window.iter().filter(|s| s.result == RunResult::Failed).count();

    if most_recent.result == RunResult::Success && failed <= 1 {
        return (RunHealth::Healthy, Vec::new());
    }

    if failed >= 2 && failed < window.len() {
        return (RunHealth::Degraded, vec![format!("{failed} of the last {HEALTH_WINDOW} runs failed")]);
    }

    // Most recent run failed outright but fewer than two of the window did;
    // not explicitly covered by the source classification, but a healthy
    // verdict directly after a failure would be misleading.
    (RunHealth::Degraded, vec!["most recent run failed".to_string()])
}

/// `auto_run && health == degraded && !manual_override` blocks the run.
pub fn can_run_pipeline(
    recent_newest_first: &[RunSummary],
    auto_run: bool,
    manual_override: bool,
) -> (bool, Option<String>, RunHealth, Vec<String>) {
    let (health, reasons) = compute_run_health(recent_newest_first);
    if health == RunHealth::Degraded && auto_run && !manual_override {
        return (false, Some("degraded_autorun_blocked".to_string()), health, reasons);
    }
    (true, None, health, reasons)
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
