// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pipeline run finite-state machine.

use serde::{Deserialize, Serialize};

use crate::stage::PipelineStage;

/// A state of the single in-flight pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineRunState {
    Idle,
    Scheduled,
    Starting,
    RunningTranslator,
    RunningAnalyzer,
    RunningMerger,
    Retrying,
    Success,
    Failed,
    Stopped,
}

crate::simple_display! {
    PipelineRunState {
        Idle => "idle",
        Scheduled => "scheduled",
        Starting => "starting",
        RunningTranslator => "running_translator",
        RunningAnalyzer => "running_analyzer",
        RunningMerger => "running_merger",
        Retrying => "retrying",
        Success => "success",
        Failed => "failed",
        Stopped => "stopped",
    }
}

impl std::str::FromStr for PipelineRunState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "idle" => Self::Idle,
            "scheduled" => Self::Scheduled,
            "starting" => Self::Starting,
            "running_translator" => Self::RunningTranslator,
            "running_analyzer" => Self::RunningAnalyzer,
            "running_merger" => Self::RunningMerger,
            "retrying" => Self::Retrying,
            "success" => Self::Success,
            "failed" => Self::Failed,
            "stopped" => Self::Stopped,
            other => return Err(format!("unknown pipeline run state: {other:?}")),
        })
    }
}

impl PipelineRunState {
    /// The state entered when beginning execution of `stage`'s first attempt.
    pub fn running(stage: PipelineStage) -> Self {
        match stage {
            PipelineStage::Translator => Self::RunningTranslator,
            PipelineStage::Analyzer => Self::RunningAnalyzer,
            PipelineStage::Merger => Self::RunningMerger,
        }
    }

    /// A run in a terminal state may have a new run created over it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Idle | Self::Success | Self::Failed | Self::Stopped)
    }

    /// The normative transition table from the finite-state machine design.
    ///
    /// Kept as a flat array and scanned linearly rather than a `HashMap`:
    /// ten states, looked up rarely enough that a table lookup would be
    /// premature.
    const VALID_TRANSITIONS: &'static [(PipelineRunState, &'static [PipelineRunState])] = &[
        (PipelineRunState::Idle, &[PipelineRunState::Scheduled, PipelineRunState::Starting]),
        (PipelineRunState::Scheduled, &[PipelineRunState::Starting, PipelineRunState::Idle]),
        (
            PipelineRunState::Starting,
            &[PipelineRunState::RunningTranslator, PipelineRunState::Failed, PipelineRunState::Stopped],
        ),
        (
            PipelineRunState::RunningTranslator,
            &[
                PipelineRunState::RunningAnalyzer,
                PipelineRunState::Failed,
                PipelineRunState::Retrying,
                PipelineRunState::Stopped,
            ],
        ),
        (
            PipelineRunState::RunningAnalyzer,
            &[
                PipelineRunState::RunningMerger,
                PipelineRunState::Failed,
                PipelineRunState::Retrying,
                PipelineRunState::Stopped,
            ],
        ),
        (
            PipelineRunState::RunningMerger,
            &[PipelineRunState::Success, PipelineRunState::Failed, PipelineRunState::Retrying, PipelineRunState::Stopped],
        ),
        (
            PipelineRunState::Retrying,
            &[
                PipelineRunState::RunningTranslator,
                PipelineRunState::RunningAnalyzer,
                PipelineRunState::RunningMerger,
                PipelineRunState::Failed,
                PipelineRunState::Stopped,
            ],
        ),
        (PipelineRunState::Success, &[PipelineRunState::Idle]),
        (PipelineRunState::Failed, &[PipelineRunState::Idle, PipelineRunState::Retrying]),
        (PipelineRunState::Stopped, &[PipelineRunState::Idle]),
    ];

    /// Whether `self -> dst` appears in the normative adjacency list.
    pub fn can_transition_to(&self, dst: PipelineRunState) -> bool {
        Self::VALID_TRANSITIONS
            .iter()
            .find(|(src, _)| src == self)
            .map(|(_, dsts)| dsts.contains(&dst))
            .unwrap_or(false)
    }

    /// Whether the `starting -> running_{stage}` transition's emission should
    /// be suppressed on the event bus (always observed sub-second; would
    /// look like a duplicate event).
    pub fn suppresses_emission_to(&self, dst: PipelineRunState) -> bool {
        matches!(self, Self::Starting)
            && matches!(dst, Self::RunningTranslator | Self::RunningAnalyzer | Self::RunningMerger)
    }
}

#[cfg(test)]
#[path = "run_state_tests.rs"]
mod tests;
