// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin subprocess wrappers around the three externally-defined stage
//! programs. The programs' internal logic is out of scope here; this is
//! only the process-supervisor seam plus the lifecycle events the stage
//! body itself is responsible for emitting (the Runner emits none of
//! these — see [`orc_runner::StageRunner::run_stage`]).

use std::path::PathBuf;
use std::sync::Arc;

use orc_core::event::stage_names;
use orc_core::{Event, EventKind, PipelineStage, RunId};
use orc_eventbus::EventBus;
use orc_runner::{StageExecutor, StageOutcome};

/// A single external stage program: the executable plus its fixed argv
/// prefix. `run_id` is appended as the final argument.
#[derive(Debug, Clone)]
pub struct StageProgram {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl StageProgram {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }
}

/// Runs a [`StageProgram`] as a subprocess and emits the stage's own
/// `start`/`success`/`failed` events around it. A non-zero exit, a failed
/// spawn, and stderr output are all folded into [`StageOutcome::Failed`];
/// the Runner's retry loop decides what happens next.
pub struct CommandStageExecutor {
    stage: PipelineStage,
    program: StageProgram,
    event_bus: Arc<EventBus>,
}

impl CommandStageExecutor {
    pub fn new(stage: PipelineStage, program: StageProgram, event_bus: Arc<EventBus>) -> Self {
        Self { stage, program, event_bus }
    }

    async fn publish(&self, run_id: RunId, kind: EventKind, msg: Option<String>) {
        let mut event = Event::new(run_id, self.stage.as_str(), kind);
        if let Some(msg) = msg {
            event = event.with_msg(msg);
        }
        self.event_bus.publish_normalized(event).await;
    }
}

#[async_trait::async_trait]
impl StageExecutor for CommandStageExecutor {
    async fn execute(&self, run_id: RunId) -> StageOutcome {
        self.publish(run_id, EventKind::Start, None).await;

        let mut cmd = tokio::process::Command::new(&self.program.program);
        cmd.args(&self.program.args).arg(run_id.to_string());

        let outcome = match cmd.output().await {
            Ok(output) if output.status.success() => StageOutcome::Success,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                let reason = if stderr.is_empty() { format!("exited with status {}", output.status) } else { stderr };
                StageOutcome::Failed(reason)
            }
            Err(err) => StageOutcome::Failed(format!("failed to spawn {} stage process: {err}", self.stage.as_str())),
        };

        match &outcome {
            StageOutcome::Success => self.publish(run_id, EventKind::Success, None).await,
            StageOutcome::Skipped => {
                self.publish(run_id, EventKind::Log, Some("stage reported no input, skipped".to_string())).await
            }
            StageOutcome::Failed(reason) => self.publish(run_id, EventKind::Failed, Some(reason.clone())).await,
        }

        outcome
    }
}

/// Emits `system/heartbeat` on a fixed interval for as long as a run is
/// active; purely an observability aid, carries no state of its own.
pub async fn emit_heartbeat(event_bus: Arc<EventBus>) {
    event_bus.publish_normalized(Event::new(RunId::system(), stage_names::SYSTEM, EventKind::Heartbeat)).await;
}

#[cfg(test)]
#[path = "stages_tests.rs"]
mod tests;
