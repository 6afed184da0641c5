// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn display_matches_wire_strings() {
    assert_eq!(RunHealth::Healthy.to_string(), "healthy");
    assert_eq!(RunHealth::Degraded.to_string(), "degraded");
    assert_eq!(RunHealth::Unknown.to_string(), "unknown");
}
