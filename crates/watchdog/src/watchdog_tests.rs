// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orc_core::{PipelineStage, RunId};
use serde_json::Map;
use std::time::Duration as StdDuration;

fn setup(dir: &tempfile::TempDir) -> (Arc<StateManager>, Arc<LockManager>, Arc<EventBus>) {
    let bus = Arc::new(EventBus::new(dir.path().join("events"), 100));
    let state = Arc::new(StateManager::new(dir.path().join("state.json"), bus.clone()));
    let lock = Arc::new(LockManager::new(dir.path().join("lock"), StdDuration::from_secs(3600)).unwrap());
    (state, lock, bus)
}

#[tokio::test]
async fn terminal_state_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let (state, lock, bus) = setup(&dir);
    let watchdog = Watchdog::new(state.clone(), lock, bus, RunnerConfig::default(), WatchdogConfig::default());
    // no active run at all: get_state() returns None, tick is a no-op.
    watchdog.tick().await.unwrap();
}

#[tokio::test]
async fn stage_timeout_forces_failed_and_releases_lock() {
    let dir = tempfile::tempdir().unwrap();
    let (state, lock, bus) = setup(&dir);
    let run_id = RunId::new();
    state.create_run(run_id, Map::new()).await.unwrap();
    state.transition(PipelineRunState::Starting, None, None, None).await.unwrap();
    state.transition(PipelineRunState::RunningAnalyzer, Some(PipelineStage::Analyzer), None, None).await.unwrap();
    lock.acquire(run_id);

    // Force the run to look long-running by rewriting its started_at.
    {
        let mut ctx = state.get_state().await.unwrap();
        ctx.started_at = orc_core::time::now() - chrono::Duration::hours(7);
        orc_core::atomic_file::write_json_atomic(&dir.path().join("state.json"), &ctx).unwrap();
    }
    let state = Arc::new(StateManager::new(dir.path().join("state.json"), bus.clone()));

    let watchdog = Watchdog::new(state.clone(), lock.clone(), bus, RunnerConfig::default(), WatchdogConfig::default());
    watchdog.tick().await.unwrap();

    assert_eq!(state.get_state().await.unwrap().state, PipelineRunState::Failed);
    assert!(!lock.is_locked());
}

#[tokio::test]
async fn stale_heartbeat_only_logs_no_state_change() {
    let dir = tempfile::tempdir().unwrap();
    let (state, lock, bus) = setup(&dir);
    let run_id = RunId::new();
    state.create_run(run_id, Map::new()).await.unwrap();
    state.transition(PipelineRunState::Starting, None, None, None).await.unwrap();
    state.transition(PipelineRunState::RunningTranslator, Some(PipelineStage::Translator), None, None).await.unwrap();

    let config = WatchdogConfig { interval: StdDuration::from_secs(30), heartbeat_timeout: StdDuration::from_secs(0) };
    let watchdog = Watchdog::new(state.clone(), lock, bus, RunnerConfig::default(), config);
    watchdog.tick().await.unwrap();

    assert_eq!(state.get_state().await.unwrap().state, PipelineRunState::RunningTranslator);
}
