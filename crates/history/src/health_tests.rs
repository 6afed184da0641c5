// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orc_core::RunId;
use chrono::Duration;

fn summary(result: RunResult) -> RunSummary {
    let now = orc_core::time::now();
    RunSummary {
        run_id: RunId::new(),
        started_at: now - Duration::minutes(5),
        ended_at: now,
        result,
        failure_reason: None,
        stages_executed: Vec::new(),
        stages_failed: Vec::new(),
        retry_count: 0,
        metadata: serde_json::Map::new(),
    }
}

#[test]
fn fewer_than_window_is_unknown() {
    let history = vec![summary(RunResult::Success); 3];
    let (health, _) = compute_run_health(&history);
    assert_eq!(health, RunHealth::Unknown);
}

#[test]
fn stopped_most_recent_is_unknown() {
    let mut history = vec![summary(RunResult::Success); 5];
    history[0] = summary(RunResult::Stopped);
    let (health, _) = compute_run_health(&history);
    assert_eq!(health, RunHealth::Unknown);
}

#[test]
fn healthy_when_recent_success_and_at_most_one_failure() {
    let mut history = vec![summary(RunResult::Success); 5];
    history[2] = summary(RunResult::Failed);
    let (health, _) = compute_run_health(&history);
    assert_eq!(health, RunHealth::Healthy);
}

#[test]
fn degraded_when_two_or_more_failed_but_not_all() {
    let mut history = vec![summary(RunResult::Success); 5];
    history[0] = summary(RunResult::Success);
    history[1] = summary(RunResult::Failed);
    history[2] = summary(RunResult::Failed);
    let (health, _) = compute_run_health(&history);
    assert_eq!(health, RunHealth::Degraded);
}

#[test]
fn policy_denies_autorun_when_degraded() {
    // example S5: failed, failed, failed, success, failed
    let history = vec![
        summary(RunResult::Failed),
        summary(RunResult::Failed),
        summary(RunResult::Failed),
        summary(RunResult::Success),
        summary(RunResult::Failed),
    ];
    let (allowed, reason, health, _) = can_run_pipeline(&history, true, false);
    assert!(!allowed);
    assert_eq!(reason.as_deref(), Some("degraded_autorun_blocked"));
    assert_eq!(health, RunHealth::Degraded);
}

#[test]
fn policy_allows_when_manual_override_set() {
    let history = vec![
        summary(RunResult::Failed),
        summary(RunResult::Failed),
        summary(RunResult::Failed),
        summary(RunResult::Success),
        summary(RunResult::Failed),
    ];
    let (allowed, ..) = can_run_pipeline(&history, true, true);
    assert!(allowed);
}

#[test]
fn policy_allows_when_not_autorun() {
    let history = vec![
        summary(RunResult::Failed),
        summary(RunResult::Failed),
        summary(RunResult::Failed),
        summary(RunResult::Success),
        summary(RunResult::Failed),
    ];
    let (allowed, ..) = can_run_pipeline(&history, false, false);
    assert!(allowed);
}
