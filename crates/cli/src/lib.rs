// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared setup for the two `orc-cli` binaries: root-directory resolution,
//! stage-program wiring, and logging init. Neither binary is a library
//! consumer of the other; this just keeps them from duplicating the glue.

use std::path::PathBuf;
use std::sync::Arc;

use orc_orchestrator::{Config, StagePrograms};
use orc_scheduler::{SchTasksBackend, SchedulerBackend};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// `ORC_ROOT`, defaulting to the current directory. Every on-disk path the
/// orchestrator touches is resolved relative to this.
pub fn resolve_root() -> PathBuf {
    std::env::var_os("ORC_ROOT").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

pub fn load_config() -> anyhow::Result<Config> {
    Ok(Config::load(resolve_root())?)
}

/// One env var per stage (`ORC_TRANSLATOR_BIN`, `ORC_ANALYZER_BIN`,
/// `ORC_MERGER_BIN`), defaulting to a bare program name resolved via `PATH`.
pub fn stage_programs() -> StagePrograms {
    use orc_orchestrator::StageProgram;

    let program = |env: &str, default: &str| {
        let path = std::env::var(env).unwrap_or_else(|_| default.to_string());
        StageProgram::new(path, Vec::new())
    };

    StagePrograms {
        translator: program("ORC_TRANSLATOR_BIN", "translator"),
        analyzer: program("ORC_ANALYZER_BIN", "analyzer"),
        merger: program("ORC_MERGER_BIN", "merger"),
    }
}

pub fn scheduler_backend() -> Arc<dyn SchedulerBackend> {
    Arc::new(SchTasksBackend::new())
}

/// Installs an `EnvFilter`-driven subscriber that writes to stderr and to a
/// daily-rotating file under `log_dir`. The returned guard must be kept
/// alive for the process lifetime (dropping it stops the background
/// flush thread), so callers bind it in `main` rather than discarding it.
pub fn init_logging(log_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, EnvFilter};

    let file_appender = tracing_appender::rolling::daily(log_dir, "orc-cli.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter()))
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking).with_filter(filter()))
        .init();

    guard
}
