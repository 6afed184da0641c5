// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single active run, mutated only through the state manager.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::run_id::RunId;
use crate::run_state::PipelineRunState;
use crate::stage::PipelineStage;
use crate::time::{self, RunTimestamp};

/// Well-known metadata keys. `metadata` is otherwise free-form.
pub mod metadata_keys {
    pub const MANUAL: &str = "manual";
    pub const MANUAL_OVERRIDE: &str = "manual_override";
    pub const TRIGGERED_AT: &str = "triggered_at";
    pub const RUN_HEALTH: &str = "run_health";
    pub const RUN_HEALTH_REASONS: &str = "run_health_reasons";
}

/// The single active run. At most one exists process-wide (see
/// [`PipelineRunState::is_terminal`] for when a new one may replace it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunContext {
    pub run_id: RunId,
    pub state: PipelineRunState,
    pub current_stage: Option<PipelineStage>,
    pub started_at: RunTimestamp,
    pub updated_at: RunTimestamp,
    pub retry_count: u32,
    pub error: Option<String>,
    pub metadata: Map<String, Value>,
    pub stages_executed: Vec<PipelineStage>,
    pub stages_failed: Vec<PipelineStage>,
}

impl RunContext {
    /// Create a fresh run context, defaulting `updated_at` to `started_at`.
    pub fn new(run_id: RunId, metadata: Map<String, Value>) -> Self {
        let now = time::now();
        Self {
            run_id,
            state: PipelineRunState::Idle,
            current_stage: None,
            started_at: now,
            updated_at: now,
            retry_count: 0,
            error: None,
            metadata,
            stages_executed: Vec::new(),
            stages_failed: Vec::new(),
        }
    }

    crate::setters! {
        set { state: PipelineRunState }
        option { current_stage: PipelineStage }
        set { retry_count: u32 }
        option { error: String }
    }

    /// Record a stage as executed (idempotent: no duplicate entries).
    pub fn mark_stage_executed(&mut self, stage: PipelineStage) {
        if !self.stages_executed.contains(&stage) {
            self.stages_executed.push(stage);
        }
    }

    /// Record a stage as failed (idempotent: no duplicate entries).
    pub fn mark_stage_failed(&mut self, stage: PipelineStage) {
        if !self.stages_failed.contains(&stage) {
            self.stages_failed.push(stage);
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = time::now();
    }

    /// A JSON view suitable for embedding as `canonical_state` in a
    /// `pipeline/state_change` event payload, or for serializing to the
    /// state file.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
#[path = "run_context_tests.rs"]
mod tests;
