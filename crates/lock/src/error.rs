// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock directory could not be created: {0}")]
    Configuration(#[source] std::io::Error),
    #[error("lock file io failure: {0}")]
    Io(#[source] std::io::Error),
}
