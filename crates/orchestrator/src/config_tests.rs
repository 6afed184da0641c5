// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn load_creates_every_required_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(dir.path()).unwrap();
    assert!(config.event_logs_dir.is_dir());
    assert!(config.event_archive_dir.is_dir());
    assert!(config.lock_dir.is_dir());
    assert!(config.runs_dir.is_dir());
    assert!(config.raw_data_dir.is_dir());
    assert!(config.translated_data_dir.is_dir());
    assert!(config.analyzed_data_dir.is_dir());
    assert!(config.schedule_config_path.parent().unwrap().is_dir());
}
