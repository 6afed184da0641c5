// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composition root. One instance per process; owns every other
//! component and the handles of every background task it starts.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Map, Value};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use orc_core::event::stage_names;
use orc_core::{CanonicalState, Event, EventKind, PipelineRunState, PipelineStage, RunContext, RunId, RunSummary};
use orc_eventbus::EventBus;
use orc_history::{can_run_pipeline, compute_run_health, RunHistory, HEALTH_WINDOW};
use orc_lock::LockManager;
use orc_runner::{AnalyzerOutputValidator, MergerOutputValidator, OutputValidator, RunnerConfig, StageRunner, TranslatorOutputValidator};
use orc_scheduler::{SchedulerBackend, SchedulerControl};
use orc_state::StateManager;
use orc_tailer::Tailer;
use orc_watchdog::Watchdog;

use crate::config::Config;
use crate::error::OrchestratorError;
use crate::stages::{CommandStageExecutor, StageProgram};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const SCHEDULER_HEALTH_INTERVAL: Duration = Duration::from_secs(60);
const ARCHIVE_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// The external stage programs this process shells out to, one per stage.
pub struct StagePrograms {
    pub translator: StageProgram,
    pub analyzer: StageProgram,
    pub merger: StageProgram,
}

impl StagePrograms {
    fn program_for(&self, stage: PipelineStage) -> &StageProgram {
        match stage {
            PipelineStage::Translator => &self.translator,
            PipelineStage::Analyzer => &self.analyzer,
            PipelineStage::Merger => &self.merger,
        }
    }
}

/// `{status, recent_events, run_events, event_source, lock_info, next_scheduled_run}`.
#[derive(Debug, serde::Serialize)]
pub struct Snapshot {
    pub status: Option<RunContext>,
    pub recent_events: Vec<orc_core::Event>,
    pub run_events: Vec<orc_core::Event>,
    pub event_source: &'static str,
    pub lock_info: Option<orc_lock::LockRecord>,
    pub next_scheduled_run: Option<orc_core::time::RunTimestamp>,
}

pub struct Facade {
    config: Config,
    event_bus: Arc<EventBus>,
    lock: Arc<LockManager>,
    state: Arc<StateManager>,
    history: Arc<RunHistory>,
    runner: Arc<StageRunner>,
    scheduler: Arc<SchedulerControl>,
    tailer: Arc<Tailer>,
    watchdog: Arc<Watchdog>,
    programs: StagePrograms,
    active_run_task: Mutex<Option<JoinHandle<()>>>,
    background_tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Facade {
    /// Compose every component from `config`. Fails fast if `config`'s
    /// directories could not be created (the caller is expected to have
    /// already called [`Config::load`], which does that).
    pub fn new(config: Config, programs: StagePrograms, scheduler_backend: Arc<dyn SchedulerBackend>) -> Result<Self, OrchestratorError> {
        let event_bus = Arc::new(EventBus::new(config.event_logs_dir.clone(), orc_eventbus::DEFAULT_BUFFER_SIZE));
        let lock = Arc::new(LockManager::new(config.lock_dir.clone(), orc_lock::DEFAULT_MAX_RUNTIME)?);
        let state = Arc::new(StateManager::new(config.orchestrator_state_path.clone(), event_bus.clone()));
        let history = Arc::new(RunHistory::new(config.runs_dir.clone())?);
        let runner = Arc::new(StageRunner::new(state.clone(), event_bus.clone(), RunnerConfig::default()));
        let scheduler = Arc::new(SchedulerControl::new(scheduler_backend, config.scheduler_state_path.clone()));
        let tailer = Arc::new(Tailer::new(config.event_logs_dir.clone(), event_bus.clone()));
        let watchdog = Arc::new(Watchdog::new(
            state.clone(),
            lock.clone(),
            event_bus.clone(),
            RunnerConfig::default(),
            orc_watchdog::WatchdogConfig::default(),
        ));

        Ok(Self {
            config,
            event_bus,
            lock,
            state,
            history,
            runner,
            scheduler,
            tailer,
            watchdog,
            programs,
            active_run_task: Mutex::new(None),
            background_tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn scheduler(&self) -> &Arc<SchedulerControl> {
        &self.scheduler
    }

    /// Idempotent: a second call while tasks are already running is a no-op.
    pub async fn start(&self) {
        let mut tasks = self.background_tasks.lock().await;
        if !tasks.is_empty() {
            return;
        }

        tasks.push(tokio::spawn(self.watchdog.clone().run()));
        tasks.push(tokio::spawn(self.tailer.clone().run(orc_tailer::DEFAULT_TAILER_INTERVAL)));
        tasks.push(tokio::spawn(heartbeat_loop(self.event_bus.clone())));
        tasks.push(tokio::spawn(archive_sweep_loop(self.config.event_logs_dir.clone())));
        tasks.push(tokio::spawn(scheduler_health_loop(self.event_bus.clone())));
        tracing::info!("orchestrator background tasks started");
    }

    /// Idempotent: aborts every background task, waiting up to
    /// [`SHUTDOWN_GRACE`] for a clean exit before force-aborting.
    pub async fn stop(&self) {
        let mut tasks = self.background_tasks.lock().await;
        for task in tasks.drain(..) {
            task.abort();
        }
        drop(tasks);
        tokio::time::sleep(SHUTDOWN_GRACE).await;
        tracing::info!("orchestrator background tasks stopped");
    }

    /// See the Facade's operation table: policy gate, lock, FSM, then a
    /// detached background task drives the three stages to completion.
    ///
    /// Lock acquisition happens before the single `pipeline/start` event is
    /// published (not after, as a literal reading of the step list might
    /// suggest) so that a lock-contention failure never emits a
    /// `pipeline/start` for a run_id that never actually started.
    pub async fn start_pipeline(&self, manual: bool, run_id: Option<RunId>, manual_override: bool) -> Result<RunContext, OrchestratorError> {
        let recent = self.history.list_runs(HEALTH_WINDOW, None);
        let (allowed, reason, health, reasons) = can_run_pipeline(&recent, !manual, manual_override);
        if !allowed {
            let run_id = run_id.unwrap_or_else(RunId::new);
            let data = json!({
                "run_health": health.to_string(),
                "run_health_reasons": reasons,
                "auto_run": !manual,
                "manual_override": manual_override,
            });
            self.event_bus
                .publish_normalized(Event::new(run_id, stage_names::PIPELINE, EventKind::RunBlocked).with_data(data))
                .await;
            return Err(OrchestratorError::PolicyDenied(reason.unwrap_or_else(|| "blocked".to_string())));
        }

        if let Some(existing) = self.state.get_state().await {
            if !existing.state.is_terminal() {
                return Err(OrchestratorError::RunAlreadyActive(existing.state));
            }
        }

        let run_id = run_id.unwrap_or_else(RunId::new);

        if !self.lock.acquire(run_id) {
            return Err(OrchestratorError::LockContention);
        }

        self.event_bus.publish_normalized(Event::new(run_id, stage_names::PIPELINE, EventKind::Start)).await;

        let mut metadata = Map::new();
        metadata.insert(orc_core::run_context::metadata_keys::MANUAL.to_string(), Value::Bool(manual));
        metadata.insert(orc_core::run_context::metadata_keys::MANUAL_OVERRIDE.to_string(), Value::Bool(manual_override));
        let ctx = self.state.create_run(run_id, metadata).await?;
        let ctx = self.state.transition(PipelineRunState::Starting, None, None, None).await?;

        if manual {
            self.event_bus.publish_normalized(Event::new(run_id, stage_names::PIPELINE, EventKind::ManualRequested)).await;
        } else {
            self.event_bus.publish_normalized(Event::new(run_id, stage_names::SCHEDULER, EventKind::Start)).await;
        }

        let task = tokio::spawn(run_pipeline_background(
            run_id,
            manual,
            self.state.clone(),
            self.history.clone(),
            self.runner.clone(),
            self.lock.clone(),
            self.event_bus.clone(),
            executors(&self.config, &self.programs, &self.event_bus),
        ));
        *self.active_run_task.lock().await = Some(task);

        Ok(ctx)
    }

    /// Requires a non-terminal run. Transitions to `stopped`, releases the
    /// lock, and persists a `RunSummary`. Does not cancel the in-flight
    /// stage subprocess itself; that is the process supervisor's job,
    /// out of scope here.
    pub async fn stop_pipeline(&self) -> Result<RunContext, OrchestratorError> {
        let Some(existing) = self.state.get_state().await else {
            return Err(OrchestratorError::NoActiveRun);
        };
        if existing.state.is_terminal() {
            return Err(OrchestratorError::NoActiveRun);
        }

        let ctx = self.state.transition(PipelineRunState::Stopped, None, None, None).await?;
        self.lock.release(ctx.run_id);
        if let Some(summary) = RunSummary::from_run_context(&ctx) {
            self.history.persist(&summary)?;
        }
        Ok(ctx)
    }

    pub async fn get_status(&self) -> Option<RunContext> {
        self.state.get_state().await
    }

    /// Block until the most recently spawned `start_pipeline` background
    /// task finishes. A no-op (returns immediately) if none is in flight.
    /// Intended for short-lived hosts (the `orcctl` CLI) that have no
    /// other way to observe completion of a detached run.
    pub async fn join_active_run(&self) {
        let task = self.active_run_task.lock().await.take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "active run task panicked");
            }
        }
    }

    pub fn list_runs(&self, limit: usize, result_filter: Option<orc_core::RunResult>) -> Vec<RunSummary> {
        self.history.list_runs(limit, result_filter)
    }

    pub async fn canonical_state(&self) -> Option<CanonicalState> {
        self.state.canonical_state().await
    }

    /// Merges recent live events with the active run's JSONL history,
    /// de-duplicated by `(timestamp, stage, event)` and chronologically
    /// sorted.
    pub async fn get_snapshot(&self) -> Snapshot {
        let status = self.state.get_state().await;
        let recent_events = self.event_bus.get_recent_events(100);

        let run_events = if let Some(ctx) = &status {
            let mut merged = self.event_bus.get_events_for_run(ctx.run_id, 500);
            let mut seen = std::collections::HashSet::new();
            merged.retain(|e| seen.insert((e.timestamp, e.stage.clone(), e.event)));
            merged.sort_by_key(|e| e.timestamp);
            merged
        } else {
            Vec::new()
        };

        let lock_info = self.lock.get_lock_info();
        let next_scheduled_run = self.scheduler.get_next_run_time().await;

        Snapshot { status, recent_events, run_events, event_source: "event_bus", lock_info, next_scheduled_run }
    }

    /// Administrative bypass: run one stage outside the normal sequence.
    /// Does not touch the lock or create a RunContext.
    pub async fn run_single_stage(&self, stage: PipelineStage, run_id: RunId) -> Result<orc_runner::StageOutcome, OrchestratorError> {
        let executors = executors(&self.config, &self.programs, &self.event_bus);
        let (executor, validator) = executors.for_stage(stage);
        Ok(self.runner.run_stage(run_id, stage, executor.as_ref(), Some(validator.as_ref())).await?)
    }
}

struct StageExecutors {
    translator: (Box<dyn orc_runner::StageExecutor>, Box<dyn OutputValidator>),
    analyzer: (Box<dyn orc_runner::StageExecutor>, Box<dyn OutputValidator>),
    merger: (Box<dyn orc_runner::StageExecutor>, Box<dyn OutputValidator>),
}

impl StageExecutors {
    fn for_stage(self, stage: PipelineStage) -> (Box<dyn orc_runner::StageExecutor>, Box<dyn OutputValidator>) {
        match stage {
            PipelineStage::Translator => self.translator,
            PipelineStage::Analyzer => self.analyzer,
            PipelineStage::Merger => self.merger,
        }
    }
}

fn executors(config: &Config, programs: &StagePrograms, event_bus: &Arc<EventBus>) -> StageExecutors {
    StageExecutors {
        translator: (
            Box::new(CommandStageExecutor::new(
                PipelineStage::Translator,
                programs.program_for(PipelineStage::Translator).clone(),
                event_bus.clone(),
            )),
            Box::new(TranslatorOutputValidator { translated_root: config.translated_data_dir.clone() }),
        ),
        analyzer: (
            Box::new(CommandStageExecutor::new(
                PipelineStage::Analyzer,
                programs.program_for(PipelineStage::Analyzer).clone(),
                event_bus.clone(),
            )),
            Box::new(AnalyzerOutputValidator { output_root: config.analyzed_data_dir.clone() }),
        ),
        merger: (
            Box::new(CommandStageExecutor::new(
                PipelineStage::Merger,
                programs.program_for(PipelineStage::Merger).clone(),
                event_bus.clone(),
            )),
            Box::new(MergerOutputValidator { output_root: config.analyzed_data_dir.clone() }),
        ),
    }
}

/// Drives the three stages to completion, traps any error into `failed`,
/// emits the terminal pipeline-or-scheduler event, releases the lock, and
/// persists the `RunSummary`. Runs detached from the caller of
/// `start_pipeline`.
#[allow(clippy::too_many_arguments)]
async fn run_pipeline_background(
    run_id: RunId,
    manual: bool,
    state: Arc<StateManager>,
    history: Arc<RunHistory>,
    runner: Arc<StageRunner>,
    lock: Arc<LockManager>,
    event_bus: Arc<EventBus>,
    executors: StageExecutors,
) {
    let StageExecutors { translator, analyzer, merger } = executors;
    let by_stage = [
        (PipelineStage::Translator, translator),
        (PipelineStage::Analyzer, analyzer),
        (PipelineStage::Merger, merger),
    ];

    let mut failure: Option<String> = None;
    for (stage, (executor, validator)) in by_stage {
        if let Err(err) = runner.run_stage(run_id, stage, executor.as_ref(), Some(validator.as_ref())).await {
            failure = Some(err.to_string());
            break;
        }
    }

    let terminal_stage = if manual { stage_names::PIPELINE } else { stage_names::SCHEDULER };

    let result = if let Some(reason) = failure {
        // run_stage's own failure path already transitioned to `failed`;
        // only the terminal notification event is this layer's job.
        event_bus
            .publish_normalized(Event::new(run_id, terminal_stage, EventKind::Failed).with_msg(reason))
            .await;
        if !lock.release(run_id) {
            tracing::warn!(run_id = %run_id, "background run release failed, force-clearing lock");
            lock.force_clear_all();
        }
        state.get_state().await
    } else {
        let ctx = match state.transition(PipelineRunState::Success, None, None, None).await {
            Ok(ctx) => ctx,
            Err(err) => {
                tracing::error!(run_id = %run_id, error = %err, "failed to transition to success after all stages completed");
                return;
            }
        };
        event_bus.publish_normalized(Event::new(run_id, terminal_stage, EventKind::Success)).await;
        lock.release(run_id);
        Some(ctx)
    };

    let Some(ctx) = result else { return };
    let Some(summary) = RunSummary::from_run_context(&ctx) else { return };
    if let Err(err) = history.persist(&summary) {
        tracing::warn!(run_id = %run_id, error = %err, "failed to persist run summary");
    }

    let recent = history.list_runs(HEALTH_WINDOW, None);
    let (health, reasons) = compute_run_health(&recent);
    tracing::info!(run_id = %run_id, health = %health, reasons = ?reasons, "run health recomputed");
}

async fn heartbeat_loop(event_bus: Arc<EventBus>) {
    let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
    loop {
        ticker.tick().await;
        crate::stages::emit_heartbeat(event_bus.clone()).await;
    }
}

async fn archive_sweep_loop(event_logs_dir: std::path::PathBuf) {
    let mut ticker = tokio::time::interval(ARCHIVE_SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        let dir = event_logs_dir.clone();
        match tokio::task::spawn_blocking(move || orc_tailer::sweep(&dir)).await {
            Ok(Ok(moved)) if moved > 0 => tracing::info!(moved, "archive sweep moved aged event logs"),
            Ok(Ok(_)) => {}
            Ok(Err(err)) => tracing::warn!(error = %err, "archive sweep failed"),
            Err(err) => tracing::warn!(error = %err, "archive sweep task panicked"),
        }
    }
}

/// Derives schedule health from the most recent observed `scheduler/start`
/// event in JSONL history; logs it rather than publishing, since this is a
/// derived quantity with nowhere durable to live.
async fn scheduler_health_loop(event_bus: Arc<EventBus>) {
    let mut ticker = tokio::time::interval(SCHEDULER_HEALTH_INTERVAL);
    loop {
        ticker.tick().await;
        let events = event_bus.load_jsonl_events_since(24, 10_000, false);
        let last_start = events
            .iter()
            .filter(|e| e.stage == stage_names::SCHEDULER && e.event == EventKind::Start)
            .map(|e| e.timestamp)
            .max();
        let health = orc_scheduler::infer_schedule_health(
            last_start,
            orc_core::time::now(),
            chrono::Duration::minutes(orc_scheduler::DEFAULT_EXPECTED_INTERVAL_MINUTES),
        );
        tracing::debug!(?health, "scheduler health observed");
    }
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
