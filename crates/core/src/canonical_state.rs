// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four-value external projection of the FSM.

use serde::{Deserialize, Serialize};

use crate::run_state::PipelineRunState;

/// Public-facing projection of [`PipelineRunState`]. No other public states exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalState {
    Idle,
    Running,
    Stopped,
    Error,
}

crate::simple_display! {
    CanonicalState {
        Idle => "idle",
        Running => "running",
        Stopped => "stopped",
        Error => "error",
    }
}

impl From<PipelineRunState> for CanonicalState {
    fn from(state: PipelineRunState) -> Self {
        match state {
            PipelineRunState::Idle | PipelineRunState::Success => Self::Idle,
            PipelineRunState::Stopped => Self::Stopped,
            PipelineRunState::Failed => Self::Error,
            PipelineRunState::Scheduled
            | PipelineRunState::Starting
            | PipelineRunState::RunningTranslator
            | PipelineRunState::RunningAnalyzer
            | PipelineRunState::RunningMerger
            | PipelineRunState::Retrying => Self::Running,
        }
    }
}

#[cfg(test)]
#[path = "canonical_state_tests.rs"]
mod tests;
