// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TailerError {
    #[error("failed to read tailer offsets: {0}")]
    Offsets(std::io::Error),
}
