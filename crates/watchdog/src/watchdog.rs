// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detects hung runs: stage-timeout failures are forced to `failed`;
//! heartbeat staleness is only logged. Never brings down the process.

use std::sync::Arc;

use orc_core::event::stage_names;
use orc_core::{Event, EventKind, PipelineRunState};
use orc_eventbus::EventBus;
use orc_lock::LockManager;
use orc_runner::RunnerConfig;
use orc_state::StateManager;

use crate::config::WatchdogConfig;
use crate::error::WatchdogError;

pub struct Watchdog {
    state: Arc<StateManager>,
    lock: Arc<LockManager>,
    event_bus: Arc<EventBus>,
    runner_config: RunnerConfig,
    config: WatchdogConfig,
}

impl Watchdog {
    pub fn new(state: Arc<StateManager>, lock: Arc<LockManager>, event_bus: Arc<EventBus>, runner_config: RunnerConfig, config: WatchdogConfig) -> Self {
        Self { state, lock, event_bus, runner_config, config }
    }

    /// Poll forever at `self.config.interval`. Every iteration traps its own
    /// error; nothing here may panic the task.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.config.interval);
        loop {
            ticker.tick().await;
            if let Err(err) = self.tick().await {
                tracing::error!(error = %err, "watchdog tick failed");
                self.event_bus
                    .publish_normalized(Event::new(orc_core::RunId::system(), stage_names::SYSTEM, EventKind::Error).with_msg(err.to_string()))
                    .await;
            }
        }
    }

    /// One watchdog pass. Public so tests (and a caller driving its own
    /// schedule) can invoke it directly.
    pub async fn tick(&self) -> Result<(), WatchdogError> {
        let Some(ctx) = self.state.get_state().await else { return Ok(()) };
        if ctx.state.is_terminal() {
            return Ok(());
        }

        let now = orc_core::time::now();

        if let Some(stage) = ctx.current_stage {
            let timeout = self.runner_config.stage(stage).timeout;
            let timeout = chrono::Duration::from_std(timeout).unwrap_or(chrono::Duration::zero());
            if now.signed_duration_since(ctx.started_at) > timeout {
                let reason = format!("exceeded maximum runtime ({}s)", timeout.num_seconds());
                self.event_bus
                    .publish_normalized(Event::new(ctx.run_id, stage_names::WATCHDOG, EventKind::Timeout).with_msg(reason.clone()))
                    .await;
                self.state.transition(PipelineRunState::Failed, Some(stage), Some(reason), None).await?;
                if !self.lock.release(ctx.run_id) {
                    tracing::warn!(run_id = %ctx.run_id, "watchdog release failed, force-clearing lock");
                    self.lock.force_clear_all();
                }
                return Ok(());
            }
        }

        let heartbeat_timeout = chrono::Duration::from_std(self.config.heartbeat_timeout).unwrap_or(chrono::Duration::zero());
        if now.signed_duration_since(ctx.updated_at) > heartbeat_timeout {
            tracing::warn!(run_id = %ctx.run_id, "hung run detected: heartbeat stale");
            self.event_bus
                .publish_normalized(Event::new(ctx.run_id, stage_names::WATCHDOG, EventKind::Error).with_msg("heartbeat stale, run may be hung"))
                .await;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
