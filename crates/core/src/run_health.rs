// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Derived (never-persisted) health classification over recent run history.

use serde::{Deserialize, Serialize};

/// Derived health label. Never persisted on `RunContext` durably; it may
/// live in `metadata` transiently for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunHealth {
    Healthy,
    Degraded,
    Unknown,
}

crate::simple_display! {
    RunHealth {
        Healthy => "healthy",
        Degraded => "degraded",
        Unknown => "unknown",
    }
}

#[cfg(test)]
#[path = "run_health_tests.rs"]
mod tests;
