// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Standalone sibling process: runs translator → analyzer → merger against
//! a fresh run_id and exits 0 on success, 1 on failed-or-timeout.
//!
//! Deliberately narrower than the Facade-hosted path: it publishes onto the
//! same Event Bus (so the tailer and any live subscriber sees it), but
//! drives its own throwaway `StateManager` rather than the primary
//! `orchestrator_state.json`, and never touches the lock file. Whichever
//! process hosts the Facade owns both of those.

use std::sync::Arc;

use orc_core::{PipelineStage, RunId};
use orc_eventbus::EventBus;
use orc_orchestrator::{CommandStageExecutor, StageProgram};
use orc_runner::{AnalyzerOutputValidator, MergerOutputValidator, OutputValidator, RunnerConfig, StageExecutor, StageRunner, TranslatorOutputValidator};
use orc_state::StateManager;

#[tokio::main]
async fn main() {
    let code = run().await;
    std::process::exit(code);
}

async fn run() -> i32 {
    let config = match orc_cli::load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to resolve configuration: {err}");
            return 1;
        }
    };
    let _log_guard = orc_cli::init_logging(&config.event_logs_dir);

    let event_bus = Arc::new(EventBus::new(config.event_logs_dir.clone(), orc_eventbus::DEFAULT_BUFFER_SIZE));
    let state_path = config.runs_dir.join(format!("orc-run-{}.state.json", RunId::new()));
    let state = Arc::new(StateManager::new(state_path.clone(), event_bus.clone()));
    let runner = StageRunner::new(state.clone(), event_bus.clone(), RunnerConfig::default());
    let programs = orc_cli::stage_programs();

    let run_id = RunId::new();
    if let Err(err) = state.create_run(run_id, serde_json::Map::new()).await {
        tracing::error!(error = %err, "failed to create local run context");
        return 1;
    }

    let stages: [(PipelineStage, StageProgram, Box<dyn OutputValidator>); 3] = [
        (PipelineStage::Translator, programs.translator, Box::new(TranslatorOutputValidator { translated_root: config.translated_data_dir.clone() })),
        (PipelineStage::Analyzer, programs.analyzer, Box::new(AnalyzerOutputValidator { output_root: config.analyzed_data_dir.clone() })),
        (PipelineStage::Merger, programs.merger, Box::new(MergerOutputValidator { output_root: config.analyzed_data_dir.clone() })),
    ];

    let mut exit_code = 0;
    for (stage, program, validator) in stages {
        let executor: Box<dyn StageExecutor> = Box::new(CommandStageExecutor::new(stage, program, event_bus.clone()));
        if let Err(err) = runner.run_stage(run_id, stage, executor.as_ref(), Some(validator.as_ref())).await {
            tracing::error!(run_id = %run_id, stage = stage.as_str(), error = %err, "stage failed");
            exit_code = 1;
            break;
        }
    }

    let _ = std::fs::remove_file(&state_path);
    exit_code
}
