// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventBusError {
    #[error("event run_id is invalid: {0:?}")]
    InvalidRunId(String),
    #[error("event logs directory is not configured correctly: {0}")]
    Configuration(String),
}
