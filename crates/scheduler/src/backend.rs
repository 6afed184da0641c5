// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shell-out seam to the host OS task scheduler. [`SchedulerBackend`] is
//! the only thing [`crate::control::SchedulerControl`] knows about; tests
//! substitute [`FakeBackend`] so nothing here ever touches a real OS
//! scheduler in CI.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

pub const TASK_NAME: &str = "Pipeline Runner";
const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// What the OS scheduler currently reports for the named task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub exists: bool,
    pub enabled: bool,
    pub state: String,
}

/// Raw schedule timestamps as the OS scheduler reports them; left
/// unparsed (opaque strings) since the format is OS-specific and this
/// layer never needs to do arithmetic on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowsScheduleInfo {
    pub last_run_time: Option<String>,
    pub next_run_time: Option<String>,
    pub error: Option<String>,
}

/// Abstraction over "ask the host OS scheduler about a named task". The
/// real implementation shells out to `schtasks.exe`; this component never
/// runs a loop or owns timing of its own, only observes and toggles.
#[async_trait::async_trait]
pub trait SchedulerBackend: Send + Sync {
    async fn query_status(&self) -> Result<TaskStatus, SchedulerError>;
    async fn set_enabled(&self, enabled: bool) -> Result<(), SchedulerError>;
    async fn schedule_info(&self) -> Result<WindowsScheduleInfo, SchedulerError>;
}

/// Shells out to `schtasks.exe` against a fixed task name. Every call is
/// wrapped in [`COMMAND_TIMEOUT`]; a hung subprocess must not hang the
/// orchestrator.
pub struct SchTasksBackend {
    task_name: String,
}

impl SchTasksBackend {
    pub fn new() -> Self {
        Self { task_name: TASK_NAME.to_string() }
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output, SchedulerError> {
        let mut cmd = tokio::process::Command::new(args[0]);
        cmd.args(&args[1..]);
        let child = cmd.output();
        tokio::time::timeout(COMMAND_TIMEOUT, child)
            .await
            .map_err(|_| SchedulerError::Backend(format!("timeout running: {}", args.join(" "))))?
            .map_err(|e| SchedulerError::Backend(e.to_string()))
    }
}

impl Default for SchTasksBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SchedulerBackend for SchTasksBackend {
    async fn query_status(&self) -> Result<TaskStatus, SchedulerError> {
        let output = self.run(&["schtasks", "/query", "/tn", &self.task_name, "/v", "/fo", "list"]).await?;
        if !output.status.success() {
            return Ok(TaskStatus { exists: false, enabled: false, state: "NotFound".to_string() });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut enabled = None;
        let mut state = "Unknown".to_string();
        for line in stdout.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("Scheduled Task State:") {
                let rest = rest.trim();
                enabled = Some(rest.contains("Enabled") && !rest.contains("Disabled"));
            } else if enabled.is_none() {
                if let Some(rest) = line.strip_prefix("Status:") {
                    state = rest.trim().to_string();
                    if state.contains("Ready") {
                        enabled = Some(true);
                    }
                }
            }
        }
        // Default to enabled if unparseable: the safer default per the
        // observed reference behavior (never silently report a healthy
        // task as disabled due to a parsing gap).
        Ok(TaskStatus { exists: true, enabled: enabled.unwrap_or(true), state })
    }

    async fn set_enabled(&self, enabled: bool) -> Result<(), SchedulerError> {
        let flag = if enabled { "/enable" } else { "/disable" };
        let output = self.run(&["schtasks", "/change", "/tn", &self.task_name, flag]).await?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let message = if !stderr.trim().is_empty() { stderr.trim().to_string() } else { stdout.trim().to_string() };
        if message.to_lowercase().contains("denied") || message.contains("0x80070005") {
            return Err(SchedulerError::Backend(format!(
                "permission denied enabling/disabling task '{}': {message}",
                self.task_name
            )));
        }
        Err(SchedulerError::Backend(format!("schtasks error: {message}")))
    }

    async fn schedule_info(&self) -> Result<WindowsScheduleInfo, SchedulerError> {
        let output = self
            .run(&["schtasks", "/query", "/tn", &self.task_name, "/v", "/fo", "list"])
            .await?;
        if !output.status.success() {
            return Ok(WindowsScheduleInfo {
                last_run_time: None,
                next_run_time: None,
                error: Some(format!("task '{}' not found or command failed", self.task_name)),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut last_run_time = None;
        let mut next_run_time = None;
        for line in stdout.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("Last Run Time:") {
                last_run_time = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix("Next Run Time:") {
                next_run_time = Some(rest.trim().to_string());
            }
        }
        Ok(WindowsScheduleInfo { last_run_time, next_run_time, error: None })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::Mutex;

    /// In-memory stand-in for tests; never shells out.
    pub struct FakeBackend {
        pub status: Mutex<TaskStatus>,
        pub info: Mutex<WindowsScheduleInfo>,
        pub fail_set_enabled: bool,
    }

    impl FakeBackend {
        pub fn new(exists: bool, enabled: bool) -> Self {
            Self {
                status: Mutex::new(TaskStatus { exists, enabled, state: if enabled { "Ready".into() } else { "Disabled".into() } }),
                info: Mutex::new(WindowsScheduleInfo::default()),
                fail_set_enabled: false,
            }
        }
    }

    #[async_trait::async_trait]
    impl SchedulerBackend for FakeBackend {
        async fn query_status(&self) -> Result<TaskStatus, SchedulerError> {
            Ok(self.status.lock().unwrap().clone())
        }

        async fn set_enabled(&self, enabled: bool) -> Result<(), SchedulerError> {
            if self.fail_set_enabled {
                return Err(SchedulerError::Backend("permission denied".to_string()));
            }
            let mut status = self.status.lock().unwrap();
            status.enabled = enabled;
            status.state = if enabled { "Ready".into() } else { "Disabled".into() };
            Ok(())
        }

        async fn schedule_info(&self) -> Result<WindowsScheduleInfo, SchedulerError> {
            Ok(self.info.lock().unwrap().clone())
        }
    }
}
