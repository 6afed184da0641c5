// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn translator_validator_requires_parquet_file() {
    let dir = tempfile::tempdir().unwrap();
    let validator = TranslatorOutputValidator { translated_root: dir.path().to_path_buf() };
    assert!(!validator.validate(RunId::new()));

    std::fs::write(dir.path().join("part-0.parquet"), b"data").unwrap();
    assert!(validator.validate(RunId::new()));
}

#[test]
fn translator_validator_finds_file_in_nested_instrument_layout() {
    let dir = tempfile::tempdir().unwrap();
    let validator = TranslatorOutputValidator { translated_root: dir.path().to_path_buf() };
    let nested = dir.path().join("ESH26").join("1m").join("2026").join("07");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(nested.join("part-0.parquet"), b"data").unwrap();
    assert!(validator.validate(RunId::new()));
}

#[test]
fn analyzer_validator_prefers_marker_but_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let run_id = RunId::new();
    let validator = AnalyzerOutputValidator { output_root: dir.path().to_path_buf() };
    assert!(!validator.validate(run_id));

    std::fs::write(dir.path().join("report.csv"), b"data").unwrap();
    assert!(validator.validate(run_id));

    std::fs::write(dir.path().join(format!(".success_{run_id}.marker")), b"").unwrap();
    assert!(validator.validate(run_id));
}

#[test]
fn merger_validator_checks_marker_file() {
    let dir = tempfile::tempdir().unwrap();
    let run_id = RunId::new();
    let validator = MergerOutputValidator { output_root: dir.path().to_path_buf() };
    std::fs::write(dir.path().join(format!(".merge_complete_{run_id}.marker")), b"").unwrap();
    assert!(validator.validate(run_id));
}
