// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("failed to persist scheduler audit state: {0}")]
    Audit(std::io::Error),
    #[error("backend error: {0}")]
    Backend(String),
}
