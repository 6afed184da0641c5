// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orc_core::{PipelineRunState, RunContext};
use serde_json::Map;

fn summary(result: PipelineRunState) -> RunSummary {
    let mut ctx = RunContext::new(RunId::new(), Map::new());
    ctx.state = result;
    RunSummary::from_run_context(&ctx).unwrap()
}

#[test]
fn persist_then_list_includes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let history = RunHistory::new(dir.path()).unwrap();
    let s = summary(PipelineRunState::Success);
    history.persist(&s).unwrap();

    let listed = history.list_runs(10, None);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].run_id, s.run_id);
}

#[test]
fn list_runs_respects_result_filter() {
    let dir = tempfile::tempdir().unwrap();
    let history = RunHistory::new(dir.path()).unwrap();
    history.persist(&summary(PipelineRunState::Success)).unwrap();
    history.persist(&summary(PipelineRunState::Failed)).unwrap();

    let failed_only = history.list_runs(10, Some(RunResult::Failed));
    assert_eq!(failed_only.len(), 1);
    assert_eq!(failed_only[0].result, RunResult::Failed);
}

#[test]
fn get_run_finds_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let history = RunHistory::new(dir.path()).unwrap();
    let s = summary(PipelineRunState::Stopped);
    history.persist(&s).unwrap();
    assert_eq!(history.get_run(s.run_id).unwrap().run_id, s.run_id);
    assert!(history.get_run(RunId::new()).is_none());
}

#[test]
fn corrupt_line_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let history = RunHistory::new(dir.path()).unwrap();
    let s = summary(PipelineRunState::Success);
    history.persist(&s).unwrap();

    let path = history.dated_files_newest_first().remove(0);
    let mut file = std::fs::OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(b"not json\n").unwrap();

    assert_eq!(history.list_runs(10, None).len(), 1);
}
