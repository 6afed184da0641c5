// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three pipeline stages, in execution order.

use serde::{Deserialize, Serialize};

/// One of the three externally-defined batch stages, in their fixed execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Translator,
    Analyzer,
    Merger,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 3] = [Self::Translator, Self::Analyzer, Self::Merger];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Translator => "translator",
            Self::Analyzer => "analyzer",
            Self::Merger => "merger",
        }
    }

    /// The next stage in the fixed sequence, or `None` after the merger.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Translator => Some(Self::Analyzer),
            Self::Analyzer => Some(Self::Merger),
            Self::Merger => None,
        }
    }
}

crate::simple_display! {
    PipelineStage {
        Translator => "translator",
        Analyzer => "analyzer",
        Merger => "merger",
    }
}

impl std::str::FromStr for PipelineStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translator" => Ok(Self::Translator),
            "analyzer" => Ok(Self::Analyzer),
            "merger" => Ok(Self::Merger),
            other => Err(format!("unknown pipeline stage: {other:?}")),
        }
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
