// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owns the single [`RunContext`] and its finite-state machine.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

use orc_core::event::stage_names;
use orc_core::{CanonicalState, Event, EventKind, PipelineRunState, PipelineStage, RunContext, RunId};
use orc_eventbus::EventBus;

use crate::error::StateError;

pub struct StateManager {
    state_path: PathBuf,
    event_bus: Arc<EventBus>,
    context: Mutex<Option<RunContext>>,
}

impl StateManager {
    pub fn new(state_path: impl Into<PathBuf>, event_bus: Arc<EventBus>) -> Self {
        let state_path = state_path.into();
        let context = orc_core::atomic_file::read_json_lenient(&state_path);
        Self { state_path, event_bus, context: Mutex::new(context) }
    }

    pub async fn get_state(&self) -> Option<RunContext> {
        self.context.lock().await.clone()
    }

    /// Fails if the current context exists and is non-terminal.
    pub async fn create_run(&self, run_id: RunId, metadata: Map<String, Value>) -> Result<RunContext, StateError> {
        let mut guard = self.context.lock().await;
        if let Some(existing) = guard.as_ref() {
            if !existing.state.is_terminal() {
                return Err(StateError::RunAlreadyActive(existing.state));
            }
        }
        let ctx = RunContext::new(run_id, metadata);
        *guard = Some(ctx.clone());
        self.persist(&ctx).await;
        Ok(ctx)
    }

    /// Validate against the normative adjacency table, mutate, persist, and
    /// publish `pipeline/state_change` (unless emission is suppressed).
    pub async fn transition(
        &self,
        new_state: PipelineRunState,
        stage: Option<PipelineStage>,
        error: Option<String>,
        metadata: Option<Map<String, Value>>,
    ) -> Result<RunContext, StateError> {
        let mut guard = self.context.lock().await;
        let ctx = guard.as_mut().ok_or(StateError::NoActiveRun)?;

        let old_state = ctx.state;
        if !old_state.can_transition_to(new_state) {
            return Err(StateError::InvalidTransition { from: old_state, to: new_state });
        }

        let suppress = old_state.suppresses_emission_to(new_state);

        ctx.state = new_state;
        if let Some(stage) = stage {
            ctx.current_stage = Some(stage);
        }
        ctx.error = error.clone();
        if let Some(extra) = metadata {
            ctx.metadata.extend(extra);
        }
        ctx.touch();
        let snapshot = ctx.clone();
        drop(guard);

        self.persist(&snapshot).await;

        if !suppress {
            let data = json!({
                "old_state": old_state.to_string(),
                "new_state": new_state.to_string(),
                "current_stage": snapshot.current_stage.map(|s| s.to_string()),
                "error": error,
                "canonical_state": snapshot.to_value(),
            });
            let event = Event::new(snapshot.run_id, stage_names::PIPELINE, EventKind::StateChange).with_data(data);
            self.event_bus.publish_normalized(event).await;
        }

        Ok(snapshot)
    }

    /// Record that `stage` was attempted during the current run, without
    /// performing a state transition. Called unconditionally before a
    /// stage's retry loop starts, so a stage that is attempted but never
    /// succeeds still lands in `stages_executed` (a failed attempt is both
    /// "executed" and, separately, "failed").
    pub async fn mark_stage_attempted(&self, stage: PipelineStage) -> Result<(), StateError> {
        let mut guard = self.context.lock().await;
        let ctx = guard.as_mut().ok_or(StateError::NoActiveRun)?;
        ctx.mark_stage_executed(stage);
        ctx.touch();
        let snapshot = ctx.clone();
        drop(guard);
        self.persist(&snapshot).await;
        Ok(())
    }

    /// Record that `stage` failed during the current run, without
    /// performing a state transition.
    pub async fn mark_stage_failed(&self, stage: PipelineStage) -> Result<(), StateError> {
        let mut guard = self.context.lock().await;
        let ctx = guard.as_mut().ok_or(StateError::NoActiveRun)?;
        ctx.mark_stage_failed(stage);
        ctx.touch();
        let snapshot = ctx.clone();
        drop(guard);
        self.persist(&snapshot).await;
        Ok(())
    }

    /// Bump `retry_count` on the current run and return the new value.
    pub async fn increment_retry_count(&self) -> Result<u32, StateError> {
        let mut guard = self.context.lock().await;
        let ctx = guard.as_mut().ok_or(StateError::NoActiveRun)?;
        ctx.retry_count += 1;
        ctx.touch();
        let count = ctx.retry_count;
        let snapshot = ctx.clone();
        drop(guard);
        self.persist(&snapshot).await;
        Ok(count)
    }

    pub async fn clear_run(&self) {
        let mut guard = self.context.lock().await;
        *guard = None;
        drop(guard);
        let _ = std::fs::remove_file(&self.state_path);
    }

    /// The four-value public projection of the current state, if any.
    pub async fn canonical_state(&self) -> Option<CanonicalState> {
        self.get_state().await.map(|ctx| CanonicalState::from(ctx.state))
    }

    async fn persist(&self, ctx: &RunContext) {
        let path = self.state_path.clone();
        let ctx = ctx.clone();
        let result = tokio::task::spawn_blocking(move || orc_core::atomic_file::write_json_atomic(&path, &ctx)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!(error = %err, "failed to persist run state"),
            Err(err) => tracing::warn!(error = %err, "state persistence task panicked"),
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
