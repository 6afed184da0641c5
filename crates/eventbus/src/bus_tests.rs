// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orc_core::event::stage_names;

#[tokio::test]
async fn accepted_event_reaches_ring_and_subscriber() {
    let dir = tempfile::tempdir().unwrap();
    let bus = EventBus::new(dir.path(), DEFAULT_BUFFER_SIZE);
    let sub = bus.subscribe();

    bus.publish(PublishInput::new(stage_names::PIPELINE, EventKind::Start)).await.unwrap();

    assert_eq!(bus.get_recent_events(10).len(), 1);
    let received = sub.recv().await;
    assert_eq!(received.stage, stage_names::PIPELINE);
}

#[tokio::test]
async fn invalid_run_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let bus = EventBus::new(dir.path(), DEFAULT_BUFFER_SIZE);
    let mut input = PublishInput::new(stage_names::PIPELINE, EventKind::Start);
    input.run_id = Some("unknown".to_string());
    assert!(bus.publish(input).await.is_err());
}

#[tokio::test]
async fn verbose_event_never_reaches_subscriber_but_pipeline_log_is_jsonl_only() {
    let dir = tempfile::tempdir().unwrap();
    let bus = EventBus::new(dir.path(), DEFAULT_BUFFER_SIZE);
    let sub = bus.subscribe();

    let run_id = RunId::new();
    let mut input = PublishInput::new("translator", EventKind::Metric);
    input.run_id = Some(run_id.to_string());
    bus.publish(input).await.unwrap();

    assert_eq!(bus.get_recent_events(10).len(), 0);
    assert!(sub.try_recv().is_none());
    assert!(bus.get_events_for_run(run_id, 10).is_empty());
}

#[tokio::test]
async fn ring_is_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let bus = EventBus::new(dir.path(), 5);
    for _ in 0..20 {
        bus.publish(PublishInput::new(stage_names::PIPELINE, EventKind::Start)).await.unwrap();
    }
    assert!(bus.get_recent_events(100).len() <= 5);
}

#[tokio::test]
async fn dropped_subscriber_is_reclaimed_on_next_broadcast() {
    let dir = tempfile::tempdir().unwrap();
    let bus = EventBus::new(dir.path(), DEFAULT_BUFFER_SIZE);
    {
        let _sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
    }
    bus.publish(PublishInput::new(stage_names::PIPELINE, EventKind::Start)).await.unwrap();
    assert_eq!(bus.subscriber_count(), 0);
}
