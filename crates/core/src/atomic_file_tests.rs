// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Sample {
    n: u32,
}

#[test]
fn write_then_read_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    write_json_atomic(&path, &Sample { n: 7 }).unwrap();
    let back: Sample = read_json_lenient(&path).unwrap();
    assert_eq!(back, Sample { n: 7 });
}

#[test]
fn missing_file_reads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert!(read_json_lenient::<Sample>(&path).is_none());
}

#[test]
fn corrupt_file_reads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, b"not json").unwrap();
    assert!(read_json_lenient::<Sample>(&path).is_none());
}

#[test]
fn no_tmp_file_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    write_json_atomic(&path, &Sample { n: 1 }).unwrap();
    assert!(!tmp_path_for(&path).exists());
}
