// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use orc_core::PipelineRunState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("could not create required directory {0}: {1}")]
    Configuration(std::path::PathBuf, std::io::Error),
    #[error("policy denied run: {0}")]
    PolicyDenied(String),
    #[error("a run is already active in state {0}")]
    RunAlreadyActive(PipelineRunState),
    #[error("failed to acquire lock")]
    LockContention,
    #[error("no active run")]
    NoActiveRun,
    #[error("lock manager error: {0}")]
    Lock(#[from] orc_lock::LockError),
    #[error("state manager error: {0}")]
    State(#[from] orc_state::StateError),
    #[error("run history error: {0}")]
    History(#[from] orc_history::HistoryError),
    #[error("runner error: {0}")]
    Runner(#[from] orc_runner::RunnerError),
    #[error("scheduler error: {0}")]
    Scheduler(#[from] orc_scheduler::SchedulerError),
    #[error("event bus error: {0}")]
    EventBus(#[from] orc_eventbus::EventBusError),
}
