// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orc_core::PipelineStage;

#[test]
fn skipped_counts_as_success_for_translator_and_analyzer() {
    assert!(StageOutcome::Skipped.counts_as_success(PipelineStage::Translator));
    assert!(StageOutcome::Skipped.counts_as_success(PipelineStage::Analyzer));
}

#[test]
fn skipped_does_not_count_for_merger() {
    assert!(!StageOutcome::Skipped.counts_as_success(PipelineStage::Merger));
}

#[test]
fn failed_never_counts_as_success() {
    for stage in PipelineStage::ALL {
        assert!(!StageOutcome::Failed("boom".into()).counts_as_success(stage));
    }
}
