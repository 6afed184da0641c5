// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use orc_core::PipelineRunState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("transition {from} -> {to} is not valid")]
    InvalidTransition { from: PipelineRunState, to: PipelineRunState },
    #[error("a run already exists in non-terminal state {0}")]
    RunAlreadyActive(PipelineRunState),
    #[error("no active run")]
    NoActiveRun,
}
