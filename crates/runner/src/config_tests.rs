// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_match_retry_policy() {
    let cfg = RunnerConfig::default();
    assert_eq!(cfg.translator.max_retries, 2);
    assert_eq!(cfg.analyzer.max_retries, 1);
    assert_eq!(cfg.merger.max_retries, 2);
}

#[test]
fn backoff_delay_grows_exponentially() {
    let cfg = RunnerConfig::default();
    let first = cfg.backoff_delay(PipelineStage::Translator, 1);
    let second = cfg.backoff_delay(PipelineStage::Translator, 2);
    assert_eq!(first, Duration::from_secs(10));
    assert_eq!(second, Duration::from_secs(20));
}
