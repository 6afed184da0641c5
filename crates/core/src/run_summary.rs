// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted record of a completed run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::run_context::RunContext;
use crate::run_id::RunId;
use crate::run_state::PipelineRunState;
use crate::stage::PipelineStage;
use crate::time::{self, RunTimestamp};

/// The terminal outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunResult {
    Success,
    Failed,
    Stopped,
}

crate::simple_display! {
    RunResult {
        Success => "success",
        Failed => "failed",
        Stopped => "stopped",
    }
}

impl RunResult {
    /// `None` if `state` is not one of the three terminal run results.
    pub fn from_state(state: PipelineRunState) -> Option<Self> {
        match state {
            PipelineRunState::Success => Some(Self::Success),
            PipelineRunState::Failed => Some(Self::Failed),
            PipelineRunState::Stopped => Some(Self::Stopped),
            _ => None,
        }
    }
}

/// One append-only record in a `runs/{YYYY-MM-DD}.jsonl` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub started_at: RunTimestamp,
    pub ended_at: RunTimestamp,
    pub result: RunResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub stages_executed: Vec<PipelineStage>,
    pub stages_failed: Vec<PipelineStage>,
    pub retry_count: u32,
    pub metadata: Map<String, Value>,
}

impl RunSummary {
    /// Build a summary from a terminal [`RunContext`]. Returns `None` if
    /// the context's state is not one of the three terminal results.
    pub fn from_run_context(ctx: &RunContext) -> Option<Self> {
        let result = RunResult::from_state(ctx.state)?;
        Some(Self {
            run_id: ctx.run_id,
            started_at: ctx.started_at,
            ended_at: time::now(),
            failure_reason: ctx.error.clone(),
            stages_executed: ctx.stages_executed.clone(),
            stages_failed: ctx.stages_failed.clone(),
            retry_count: ctx.retry_count,
            metadata: ctx.metadata.clone(),
            result,
        })
    }
}

#[cfg(test)]
#[path = "run_summary_tests.rs"]
mod tests;
