// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orc_scheduler::SchTasksBackend;

fn programs() -> StagePrograms {
    StagePrograms {
        translator: StageProgram::new("true", Vec::new()),
        analyzer: StageProgram::new("true", Vec::new()),
        merger: StageProgram::new("true", Vec::new()),
    }
}

fn facade(dir: &tempfile::TempDir) -> Facade {
    let config = Config::load(dir.path()).unwrap();
    Facade::new(config, programs(), Arc::new(SchTasksBackend::new())).unwrap()
}

#[tokio::test]
async fn start_pipeline_publishes_start_once_and_creates_a_starting_run() {
    let dir = tempfile::tempdir().unwrap();
    let facade = facade(&dir);
    let sub = facade.event_bus().subscribe();

    let ctx = facade.start_pipeline(true, None, false).await.unwrap();
    assert_eq!(ctx.state, PipelineRunState::Starting);

    let first = sub.recv().await;
    assert_eq!(first.event, EventKind::Start);
    assert_eq!(first.run_id, ctx.run_id);
}

#[tokio::test]
async fn start_pipeline_rejects_while_non_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let facade = facade(&dir);
    facade.start_pipeline(true, None, false).await.unwrap();

    let err = facade.start_pipeline(true, None, false).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::RunAlreadyActive(_)));
}

#[tokio::test]
async fn lock_contention_blocks_start_without_emitting_pipeline_start() {
    let dir = tempfile::tempdir().unwrap();
    let facade = facade(&dir);
    let held_run = RunId::new();
    assert!(facade.lock.acquire(held_run));

    let sub = facade.event_bus().subscribe();
    let err = facade.start_pipeline(true, None, false).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::LockContention));
    assert!(sub.try_recv().is_none());
}

#[tokio::test]
async fn stop_pipeline_requires_an_active_run() {
    let dir = tempfile::tempdir().unwrap();
    let facade = facade(&dir);
    assert!(matches!(facade.stop_pipeline().await, Err(OrchestratorError::NoActiveRun)));
}
