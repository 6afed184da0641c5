// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Duration;
use orc_core::time;
use yare::parameterized;

#[test]
fn missing_run_id_normalizes_to_system() {
    assert_eq!(normalize_run_id(None).unwrap(), RunId::system());
}

#[parameterized(empty = { "" }, literal_unknown = { "unknown" })]
fn invalid_run_id_strings_are_rejected(raw: &str) {
    assert!(normalize_run_id(Some(raw)).is_err());
}

#[test]
fn valid_uuid_run_id_parses() {
    let id = RunId::new();
    assert_eq!(normalize_run_id(Some(&id.to_string())).unwrap(), id);
}

#[test]
fn scheduler_stage_bypasses_live_window() {
    let mut event = Event::new(RunId::system(), stage_names::SCHEDULER, EventKind::Start);
    event.timestamp = time::now() - Duration::hours(5);
    assert_eq!(classify(&event, time::now()), PublishDecision::Accept);
}

#[test]
fn event_exactly_at_window_boundary_is_rejected_from_live_channel() {
    let now = time::now();
    let mut event = Event::new(RunId::new(), "pipeline", EventKind::Start);
    event.timestamp = now - Duration::minutes(LIVE_EVENT_WINDOW_MINUTES);
    assert_eq!(classify(&event, now), PublishDecision::JsonlOnly);
}

#[test]
fn event_just_inside_window_reaches_live_channel() {
    let now = time::now();
    let mut event = Event::new(RunId::new(), "pipeline", EventKind::Start);
    event.timestamp = now - Duration::minutes(LIVE_EVENT_WINDOW_MINUTES - 1);
    assert_eq!(classify(&event, now), PublishDecision::Accept);
}

#[test]
fn verbose_stage_event_is_dropped_entirely() {
    let event = Event::new(RunId::new(), "translator", EventKind::Metric);
    assert_eq!(classify(&event, time::now()), PublishDecision::Drop);
}

#[test]
fn verbose_event_on_pipeline_stage_is_still_logged() {
    let event = Event::new(RunId::system(), "pipeline", EventKind::Heartbeat);
    assert_eq!(classify(&event, time::now()), PublishDecision::JsonlOnly);
}

#[test]
fn stage_agnostic_error_is_always_live() {
    let event = Event::new(RunId::new(), "analyzer", EventKind::Error);
    assert_eq!(classify(&event, time::now()), PublishDecision::Accept);
}

#[test]
fn per_stage_log_event_is_dropped_entirely() {
    let event = Event::new(RunId::new(), "translator", EventKind::Log);
    assert_eq!(classify(&event, time::now()), PublishDecision::Drop);
}
