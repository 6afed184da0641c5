// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("runs directory could not be created: {0}")]
    Configuration(#[source] std::io::Error),
    #[error("failed to append run summary: {0}")]
    Append(#[source] std::io::Error),
}
