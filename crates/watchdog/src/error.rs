// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchdogError {
    #[error("state manager error: {0}")]
    State(#[from] orc_state::StateError),
}
