// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The retry/backoff driver that carries a single stage through to a
//! validated success or an exhausted failure.

use std::sync::Arc;
use std::time::Duration;

use orc_core::{Event, EventKind, PipelineRunState, PipelineStage, RunId};
use orc_eventbus::EventBus;
use orc_state::StateManager;

use crate::config::RunnerConfig;
use crate::error::RunnerError;
use crate::stage_executor::{OutputValidator, StageExecutor, StageOutcome};

pub struct StageRunner {
    state: Arc<StateManager>,
    event_bus: Arc<EventBus>,
    config: RunnerConfig,
}

impl StageRunner {
    pub fn new(state: Arc<StateManager>, event_bus: Arc<EventBus>, config: RunnerConfig) -> Self {
        Self { state, event_bus, config }
    }

    /// Drive `stage` to completion: transition into `running_{stage}`, run
    /// the executor behind a timeout, validate its output, and retry with
    /// exponential backoff on failure up to the stage's configured
    /// `max_retries`. Returns the accepted outcome, or the error the final
    /// attempt failed with.
    ///
    /// Event hygiene: this only ever emits state transitions (via the
    /// State Manager, which auto-publishes `pipeline/state_change`) and
    /// validation-failure events. It never publishes the stage's own
    /// start/success/failed/log/metric events; a concrete [`StageExecutor`]
    /// owns those.
    pub async fn run_stage(
        &self,
        run_id: RunId,
        stage: PipelineStage,
        executor: &dyn StageExecutor,
        validator: Option<&dyn OutputValidator>,
    ) -> Result<StageOutcome, RunnerError> {
        let cfg = self.config.stage(stage);
        let max_attempts = cfg.max_retries + 1;

        self.state.transition(PipelineRunState::running(stage), Some(stage), None, None).await?;
        self.state.mark_stage_attempted(stage).await?;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                self.state.transition(PipelineRunState::Retrying, Some(stage), None, None).await?;
                self.state.increment_retry_count().await?;
                tokio::time::sleep(self.config.backoff_delay(stage, attempt - 1)).await;
                self.state.transition(PipelineRunState::running(stage), Some(stage), None, None).await?;
            }

            let outcome = self.execute_with_timeout(executor, run_id, cfg.timeout).await;

            if outcome.counts_as_success(stage) {
                if let Some(validator) = validator {
                    if !validator.validate(run_id) {
                        self.publish(run_id, stage, EventKind::Error, Some("output validation failed".to_string())).await;
                        if attempt == max_attempts {
                            return self.fail(run_id, stage, "output validation failed".to_string()).await;
                        }
                        continue;
                    }
                }
                return Ok(outcome);
            }

            let reason = match &outcome {
                StageOutcome::Failed(reason) => reason.clone(),
                StageOutcome::Skipped => "stage reported skipped but output is required".to_string(),
                StageOutcome::Success => unreachable!("success always counts"),
            };

            if attempt == max_attempts {
                return self.fail(run_id, stage, reason).await;
            }
        }

        unreachable!("the last attempt always returns")
    }

    async fn execute_with_timeout(&self, executor: &dyn StageExecutor, run_id: RunId, timeout: Duration) -> StageOutcome {
        match tokio::time::timeout(timeout, executor.execute(run_id)).await {
            Ok(outcome) => outcome,
            Err(_) => StageOutcome::Failed("stage timed out".to_string()),
        }
    }

    async fn fail(&self, _run_id: RunId, stage: PipelineStage, reason: String) -> Result<StageOutcome, RunnerError> {
        self.state.mark_stage_failed(stage).await?;
        self.state.transition(PipelineRunState::Failed, Some(stage), Some(reason.clone()), None).await?;
        Err(RunnerError::Exhausted(stage, reason))
    }

    async fn publish(&self, run_id: RunId, stage: PipelineStage, kind: EventKind, msg: Option<String>) {
        let mut event = Event::new(run_id, stage.as_str(), kind);
        if let Some(msg) = msg {
            event = event.with_msg(msg);
        }
        self.event_bus.publish_normalized(event).await;
    }
}

#[cfg(test)]
#[path = "stage_runner_tests.rs"]
mod tests;
