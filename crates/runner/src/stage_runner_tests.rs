// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicU32, Ordering};

struct CountingExecutor {
    fail_until: u32,
    attempts: AtomicU32,
}

#[async_trait::async_trait]
impl StageExecutor for CountingExecutor {
    async fn execute(&self, _run_id: RunId) -> StageOutcome {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.fail_until {
            StageOutcome::Failed(format!("attempt {n} fails"))
        } else {
            StageOutcome::Success
        }
    }
}

struct AlwaysFails;

#[async_trait::async_trait]
impl StageExecutor for AlwaysFails {
    async fn execute(&self, _run_id: RunId) -> StageOutcome {
        StageOutcome::Failed("nope".to_string())
    }
}

fn setup(dir: &tempfile::TempDir) -> (Arc<StateManager>, Arc<EventBus>) {
    let bus = Arc::new(EventBus::new(dir.path().join("events"), 1000));
    let state = Arc::new(StateManager::new(dir.path().join("state.json"), bus.clone()));
    (state, bus)
}

#[tokio::test]
async fn succeeds_after_transient_failures_within_retry_budget() {
    let dir = tempfile::tempdir().unwrap();
    let (state, bus) = setup(&dir);
    let run_id = RunId::new();
    state.create_run(run_id, serde_json::Map::new()).await.unwrap();
    state.transition(PipelineRunState::Starting, None, None, None).await.unwrap();

    let runner = StageRunner::new(state.clone(), bus, RunnerConfig {
        translator: crate::config::StageConfig { max_retries: 2, retry_delay: Duration::from_millis(1), timeout: Duration::from_secs(5) },
        ..RunnerConfig::default()
    });
    let executor = CountingExecutor { fail_until: 2, attempts: AtomicU32::new(0) };

    let outcome = runner.run_stage(run_id, PipelineStage::Translator, &executor, None).await.unwrap();
    assert_eq!(outcome, StageOutcome::Success);
    assert_eq!(state.get_state().await.unwrap().retry_count, 2);
}

#[tokio::test]
async fn exhausting_retries_transitions_to_failed() {
    let dir = tempfile::tempdir().unwrap();
    let (state, bus) = setup(&dir);
    let run_id = RunId::new();
    state.create_run(run_id, serde_json::Map::new()).await.unwrap();
    state.transition(PipelineRunState::Starting, None, None, None).await.unwrap();

    let runner = StageRunner::new(state.clone(), bus, RunnerConfig {
        translator: crate::config::StageConfig { max_retries: 1, retry_delay: Duration::from_millis(1), timeout: Duration::from_secs(5) },
        ..RunnerConfig::default()
    });

    let err = runner.run_stage(run_id, PipelineStage::Translator, &AlwaysFails, None).await.unwrap_err();
    assert!(matches!(err, RunnerError::Exhausted(PipelineStage::Translator, _)));
    let ctx = state.get_state().await.unwrap();
    assert_eq!(ctx.state, PipelineRunState::Failed);
    assert_eq!(ctx.stages_executed, vec![PipelineStage::Translator]);
    assert_eq!(ctx.stages_failed, vec![PipelineStage::Translator]);
}

struct RejectingValidator;
impl OutputValidator for RejectingValidator {
    fn validate(&self, _run_id: RunId) -> bool {
        false
    }
}

#[tokio::test]
async fn validation_failure_is_treated_as_a_failed_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let (state, bus) = setup(&dir);
    let run_id = RunId::new();
    state.create_run(run_id, serde_json::Map::new()).await.unwrap();
    state.transition(PipelineRunState::Starting, None, None, None).await.unwrap();

    let runner = StageRunner::new(state.clone(), bus, RunnerConfig {
        translator: crate::config::StageConfig { max_retries: 0, retry_delay: Duration::from_millis(1), timeout: Duration::from_secs(5) },
        ..RunnerConfig::default()
    });
    let executor = CountingExecutor { fail_until: 0, attempts: AtomicU32::new(0) };

    let err = runner.run_stage(run_id, PipelineStage::Translator, &executor, Some(&RejectingValidator)).await.unwrap_err();
    assert!(matches!(err, RunnerError::Exhausted(PipelineStage::Translator, _)));
}
