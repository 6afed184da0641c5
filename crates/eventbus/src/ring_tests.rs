// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orc_core::{EventKind, RunId};

fn event() -> Event {
    Event::new(RunId::new(), "pipeline", EventKind::Start)
}

#[test]
fn never_exceeds_buffer_size() {
    let mut ring = Ring::new(3);
    for _ in 0..10 {
        ring.push(event());
    }
    assert_eq!(ring.len(), 3);
}

#[test]
fn recent_returns_most_recent_n_in_order() {
    let mut ring = Ring::new(10);
    let mut ids = Vec::new();
    for _ in 0..5 {
        let e = event();
        ids.push(e.run_id);
        ring.push(e);
    }
    let recent = ring.recent(2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].run_id, ids[3]);
    assert_eq!(recent[1].run_id, ids[4]);
}
