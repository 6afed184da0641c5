// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution and validation seams for the three externally-defined stages.

use orc_core::RunId;

/// The outcome a stage body reports. `skipped` means "no raw input found -
/// this is normal" for the translator/analyzer; it is not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Success,
    Skipped,
    Failed(String),
}

impl StageOutcome {
    /// Whether this outcome counts as success for `stage`. Both `Success`
    /// and `Skipped` count for translator/analyzer; only `Success` for the
    /// merger.
    pub fn counts_as_success(&self, stage: orc_core::PipelineStage) -> bool {
        match (self, stage) {
            (Self::Success, _) => true,
            (Self::Skipped, orc_core::PipelineStage::Merger) => false,
            (Self::Skipped, _) => true,
            (Self::Failed(_), _) => false,
        }
    }
}

/// A stage body: synchronous long-running CPU/IO code, out of scope for
/// this crate's own logic. Implementors are dispatched behind a
/// timeout-protected worker thread by [`crate::StageRunner`].
#[async_trait::async_trait]
pub trait StageExecutor: Send + Sync {
    async fn execute(&self, run_id: RunId) -> StageOutcome;
}

/// Post-success output validation, run before a stage attempt is accepted.
pub trait OutputValidator: Send + Sync {
    fn validate(&self, run_id: RunId) -> bool;
}

#[cfg(test)]
#[path = "stage_executor_tests.rs"]
mod tests;
