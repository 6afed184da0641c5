// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run identifiers.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Opaque, UUID-shaped identifier for a single pipeline run.
///
/// `RunId::system()` is the sentinel used for process-global events that are
/// not attached to any particular run (wire form `__system__`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RunId {
    Run(Uuid),
    System,
}

impl RunId {
    pub const SYSTEM_WIRE: &'static str = "__system__";

    /// Generate a new random run id.
    pub fn new() -> Self {
        Self::Run(Uuid::new_v4())
    }

    pub const fn system() -> Self {
        Self::System
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run(u) => write!(f, "{u}"),
            Self::System => f.write_str(Self::SYSTEM_WIRE),
        }
    }
}

/// Error returned when a string is neither a valid UUID nor the system sentinel.
#[derive(Debug, thiserror::Error)]
#[error("invalid run_id: {0:?}")]
pub struct ParseRunIdError(String);

impl FromStr for RunId {
    type Err = ParseRunIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::SYSTEM_WIRE {
            return Ok(Self::System);
        }
        Uuid::parse_str(s)
            .map(Self::Run)
            .map_err(|_| ParseRunIdError(s.to_owned()))
    }
}

impl serde::Serialize for RunId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for RunId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "run_id_tests.rs"]
mod tests;
