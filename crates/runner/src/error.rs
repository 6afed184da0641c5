// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("state manager error: {0}")]
    State(#[from] orc_state::StateError),
    #[error("stage {0} failed after exhausting retries: {1}")]
    Exhausted(orc_core::PipelineStage, String),
}
