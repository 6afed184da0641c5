// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The publish path as a short, ordered chain of pure validators.
//!
//! Each accepted event resolves to one of [`PublishDecision::Accept`]
//! (ring + JSONL + live subscribers), [`PublishDecision::JsonlOnly`]
//! (written to history, never broadcast live), or [`PublishDecision::Drop`]
//! (not recorded anywhere — the verbose-event-on-a-verbose-stage case).
//! Invalid `run_id`s are rejected before reaching this chain (see
//! [`normalize_run_id`]).

use orc_core::event::stage_names;
use orc_core::{Event, EventKind, RunId};

use crate::error::EventBusError;

pub const LIVE_EVENT_WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishDecision {
    Accept,
    JsonlOnly,
    Drop,
}

/// Step 1: required `run_id`. A missing value normalizes to the system
/// sentinel; an empty string or the literal `"unknown"` is invalid.
pub fn normalize_run_id(raw: Option<&str>) -> Result<RunId, EventBusError> {
    match raw {
        None => Ok(RunId::system()),
        Some(s) if s.is_empty() || s == "unknown" => Err(EventBusError::InvalidRunId(s.to_owned())),
        Some(s) => s.parse().map_err(|_| EventBusError::InvalidRunId(s.to_owned())),
    }
}

/// Step 3: live-window check. `scheduler`-stage events are always allowed
/// regardless of age. Boundary is strict: an event exactly
/// [`LIVE_EVENT_WINDOW_MINUTES`] old is rejected.
///
/// Exposed beyond this crate for the tailer's own live-window filtering of
/// events it has read straight from an out-of-process JSONL file.
pub fn within_live_window(event: &Event, now: orc_core::time::RunTimestamp) -> bool {
    if event.stage == stage_names::SCHEDULER {
        return true;
    }
    let age = now.signed_duration_since(event.timestamp);
    age < chrono::Duration::minutes(LIVE_EVENT_WINDOW_MINUTES)
}

/// Step 4: allow-list by `(stage, event)` for the live channel.
fn allow_listed_for_live(event: &Event) -> bool {
    if event.stage == stage_names::SCHEDULER {
        return true;
    }
    if event.event == EventKind::Error {
        return true;
    }
    if event.stage == stage_names::PIPELINE && event.event == EventKind::StateChange {
        return true;
    }
    let stage_lifecycle = matches!(
        event.stage.as_str(),
        stage_names::PIPELINE | "translator" | "analyzer" | "merger"
    );
    stage_lifecycle && matches!(event.event, EventKind::Start | EventKind::Success | EventKind::Failed)
}

/// Step 5: JSONL-log rule. Verbose events are skipped by the JSONL writer
/// unless the stage is `pipeline`/`scheduler` or the event is one of the
/// always-logged lifecycle kinds.
fn loggable_to_jsonl(event: &Event) -> bool {
    if matches!(event.stage.as_str(), stage_names::PIPELINE | stage_names::SCHEDULER) {
        return true;
    }
    matches!(
        event.event,
        EventKind::Start | EventKind::Success | EventKind::Failed | EventKind::Error | EventKind::StateChange
    )
}

/// Run steps 3-5 of the publish contract against an already-normalized event.
pub fn classify(event: &Event, now: orc_core::time::RunTimestamp) -> PublishDecision {
    let loggable = loggable_to_jsonl(event);
    if !loggable {
        return PublishDecision::Drop;
    }
    let live = within_live_window(event, now) && allow_listed_for_live(event);
    if live {
        PublishDecision::Accept
    } else {
        PublishDecision::JsonlOnly
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
