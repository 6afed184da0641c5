// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves the on-disk layout under a single configured root directory.

use std::path::PathBuf;

use crate::error::OrchestratorError;

/// Every path the orchestrator touches, resolved once at startup relative
/// to `root`. See the file-system layout table for the normative shape.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub schedule_config_path: PathBuf,
    pub event_logs_dir: PathBuf,
    pub event_archive_dir: PathBuf,
    pub jsonl_offsets_path: PathBuf,
    pub lock_dir: PathBuf,
    pub orchestrator_state_path: PathBuf,
    pub scheduler_state_path: PathBuf,
    pub runs_dir: PathBuf,
    pub raw_data_dir: PathBuf,
    pub translated_data_dir: PathBuf,
    pub analyzed_data_dir: PathBuf,
}

impl Config {
    /// Resolve every path under `root` and create the directories this
    /// process writes into. Fails fast if any of them cannot be created.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, OrchestratorError> {
        let root = root.into();
        let automation_logs = root.join("automation").join("logs");
        let configs_dir = root.join("configs");
        let config = Self {
            schedule_config_path: configs_dir.join("schedule.json"),
            event_logs_dir: automation_logs.join("events"),
            event_archive_dir: automation_logs.join("events").join("archive"),
            jsonl_offsets_path: automation_logs.join("events").join("jsonl_offsets.json"),
            lock_dir: automation_logs.clone(),
            orchestrator_state_path: automation_logs.join("orchestrator_state.json"),
            scheduler_state_path: automation_logs.join("scheduler_state.json"),
            runs_dir: automation_logs.join("runs"),
            raw_data_dir: root.join("data").join("raw"),
            translated_data_dir: root.join("data").join("translated"),
            analyzed_data_dir: root.join("data").join("analyzed"),
            root,
        };

        for dir in [
            &configs_dir,
            &config.event_logs_dir,
            &config.event_archive_dir,
            &config.lock_dir,
            &config.runs_dir,
            &config.raw_data_dir,
            &config.translated_data_dir,
            &config.analyzed_data_dir,
        ] {
            std::fs::create_dir_all(dir).map_err(|e| OrchestratorError::Configuration(dir.to_path_buf(), e))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
