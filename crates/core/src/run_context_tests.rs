// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_defaults_updated_at_to_started_at() {
    let ctx = RunContext::new(RunId::new(), Map::new());
    assert_eq!(ctx.started_at, ctx.updated_at);
    assert_eq!(ctx.state, PipelineRunState::Idle);
    assert!(ctx.current_stage.is_none());
}

#[test]
fn mark_stage_executed_is_idempotent() {
    let mut ctx = RunContext::new(RunId::new(), Map::new());
    ctx.mark_stage_executed(PipelineStage::Translator);
    ctx.mark_stage_executed(PipelineStage::Translator);
    assert_eq!(ctx.stages_executed, vec![PipelineStage::Translator]);
}

#[test]
fn json_round_trip_preserves_fields() {
    let mut ctx = RunContext::new(RunId::new(), Map::new());
    ctx.state = PipelineRunState::RunningTranslator;
    ctx.current_stage = Some(PipelineStage::Translator);
    ctx.retry_count = 2;
    ctx.error = Some("boom".into());
    ctx.mark_stage_executed(PipelineStage::Translator);

    let json = serde_json::to_string(&ctx).unwrap();
    let back: RunContext = serde_json::from_str(&json).unwrap();
    assert_eq!(ctx, back);
}
