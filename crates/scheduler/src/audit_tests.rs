// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn missing_file_loads_as_default_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let store = AuditStore::new(dir.path().join("scheduler_state.json"));
    let audit = store.load();
    assert!(!audit.last_requested_enabled);
    assert!(audit.last_changed_by.is_none());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = AuditStore::new(dir.path().join("scheduler_state.json"));
    store.save(true, "dashboard-user").unwrap();
    let audit = store.load();
    assert!(audit.last_requested_enabled);
    assert_eq!(audit.last_changed_by.as_deref(), Some("dashboard-user"));
    assert!(audit.last_changed_timestamp.is_some());
}
