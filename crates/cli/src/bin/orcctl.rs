// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin line interface over `orc_orchestrator::Facade`: one subcommand per
//! row of the Public HTTP/WS surface table, minus the WebSocket row (which
//! has no CLI analogue).

use clap::{Parser, Subcommand};
use orc_core::RunResult;
use orc_orchestrator::Facade;

#[derive(Parser)]
#[command(name = "orcctl", about = "Admin CLI for the pipeline orchestrator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Trigger a manual pipeline run and wait for it to finish.
    Run {
        #[arg(long)]
        manual_override: bool,
    },
    /// Stop the currently active run.
    Stop,
    /// Print the current `RunContext`, or "idle" if none exists.
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Print a merged snapshot of live and historical events.
    Snapshot,
    /// List recent persisted run summaries.
    ListRuns {
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, value_enum)]
        result: Option<ResultFilter>,
    },
    /// Scheduler enable/disable/status.
    Scheduler {
        #[command(subcommand)]
        action: SchedulerAction,
    },
}

#[derive(Subcommand)]
enum SchedulerAction {
    Enable,
    Disable,
    Status,
}

#[derive(Clone, clap::ValueEnum)]
enum ResultFilter {
    Success,
    Failed,
    Stopped,
}

impl From<ResultFilter> for RunResult {
    fn from(value: ResultFilter) -> Self {
        match value {
            ResultFilter::Success => Self::Success,
            ResultFilter::Failed => Self::Failed,
            ResultFilter::Stopped => Self::Stopped,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = orc_cli::load_config()?;
    let _log_guard = orc_cli::init_logging(&config.event_logs_dir);
    let facade = Facade::new(config, orc_cli::stage_programs(), orc_cli::scheduler_backend())?;

    match cli.command {
        Command::Run { manual_override } => {
            let ctx = facade.start_pipeline(true, None, manual_override).await?;
            println!("started run {}", ctx.run_id);
            facade.join_active_run().await;
            match facade.get_status().await {
                Some(ctx) => println!("finished in state {}", ctx.state),
                None => println!("finished, no status available"),
            }
        }
        Command::Stop => {
            let ctx = facade.stop_pipeline().await?;
            println!("stopped run {} ({})", ctx.run_id, ctx.state);
        }
        Command::Status { json } => match facade.get_status().await {
            Some(ctx) if json => println!("{}", serde_json::to_string_pretty(&ctx)?),
            Some(ctx) => println!("run {}: {} (stage {:?})", ctx.run_id, ctx.state, ctx.current_stage),
            None => println!("idle"),
        },
        Command::Snapshot => {
            let snapshot = facade.get_snapshot().await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::ListRuns { limit, result } => {
            let runs = facade.list_runs(limit, result.map(RunResult::from));
            for run in runs {
                println!(
                    "{} {} started={} stages_failed={:?}",
                    run.run_id, run.result, run.started_at, run.stages_failed
                );
            }
        }
        Command::Scheduler { action } => {
            let scheduler = facade.scheduler();
            match action {
                SchedulerAction::Enable => {
                    let (ok, err) = scheduler.enable("orcctl").await;
                    if !ok {
                        anyhow::bail!(err.unwrap_or_else(|| "failed to enable scheduler".to_string()));
                    }
                    println!("scheduler enabled");
                }
                SchedulerAction::Disable => {
                    let (ok, err) = scheduler.disable("orcctl").await;
                    if !ok {
                        anyhow::bail!(err.unwrap_or_else(|| "failed to disable scheduler".to_string()));
                    }
                    println!("scheduler disabled");
                }
                SchedulerAction::Status => {
                    let state = scheduler.get_state().await?;
                    println!("{}", serde_json::to_string_pretty(&state)?);
                }
            }
        }
    }

    Ok(())
}
