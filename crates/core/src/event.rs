// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured records broadcast on the event bus.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::run_id::RunId;
use crate::time::RunTimestamp;

/// Well-known `stage` values outside the three pipeline stages.
pub mod stage_names {
    pub const PIPELINE: &str = "pipeline";
    pub const SCHEDULER: &str = "scheduler";
    pub const SYSTEM: &str = "system";
    pub const WATCHDOG: &str = "watchdog";
}

/// The closed set of event kinds a publisher may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Start,
    StateChange,
    Success,
    Failed,
    Error,
    Log,
    Heartbeat,
    Metric,
    Progress,
    ManualRequested,
    RunBlocked,
    Enabled,
    Disabled,
    Timeout,
}

crate::simple_display! {
    EventKind {
        Start => "start",
        StateChange => "state_change",
        Success => "success",
        Failed => "failed",
        Error => "error",
        Log => "log",
        Heartbeat => "heartbeat",
        Metric => "metric",
        Progress => "progress",
        ManualRequested => "manual_requested",
        RunBlocked => "run_blocked",
        Enabled => "enabled",
        Disabled => "disabled",
        Timeout => "timeout",
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "start" => Self::Start,
            "state_change" => Self::StateChange,
            "success" => Self::Success,
            "failed" => Self::Failed,
            "error" => Self::Error,
            "log" => Self::Log,
            "heartbeat" => Self::Heartbeat,
            "metric" => Self::Metric,
            "progress" => Self::Progress,
            "manual_requested" => Self::ManualRequested,
            "run_blocked" => Self::RunBlocked,
            "enabled" => Self::Enabled,
            "disabled" => Self::Disabled,
            "timeout" => Self::Timeout,
            other => return Err(format!("unknown event kind: {other:?}")),
        })
    }
}

/// A single record broadcast on the event bus / appended to a per-run JSONL file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub run_id: RunId,
    pub stage: String,
    pub event: EventKind,
    pub timestamp: RunTimestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Event {
    pub fn new(run_id: RunId, stage: impl Into<String>, event: EventKind) -> Self {
        Self {
            run_id,
            stage: stage.into(),
            event,
            timestamp: crate::time::now(),
            msg: None,
            data: None,
        }
    }

    crate::setters_for_event!();
}

/// Setter methods kept separate from `setters!` because `Event`'s fields
/// are not all builder-shaped (run_id/stage/event are positional via `new`).
#[macro_export]
macro_rules! setters_for_event {
    () => {
        pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
            self.msg = Some(msg.into());
            self
        }

        pub fn with_data(mut self, data: serde_json::Value) -> Self {
            self.data = Some(data);
            self
        }

        pub fn with_timestamp(mut self, timestamp: $crate::time::RunTimestamp) -> Self {
            self.timestamp = timestamp;
            self
        }
    };
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
