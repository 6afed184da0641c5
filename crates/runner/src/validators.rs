// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default filesystem-scan-based output validators, one per stage.

use std::path::PathBuf;
use std::time::Duration;

use orc_core::RunId;

use crate::stage_executor::OutputValidator;

/// Translator output: at least one `*.parquet` file under `translated_root`.
pub struct TranslatorOutputValidator {
    pub translated_root: PathBuf,
}

impl OutputValidator for TranslatorOutputValidator {
    fn validate(&self, _run_id: RunId) -> bool {
        has_matching_file(&self.translated_root, |name| name.ends_with(".parquet"))
    }
}

/// Analyzer output: a `.success_{run_id}.marker` sentinel file. If the
/// analyzer predates the marker convention, fall back to "any file present"
/// with a warning, rather than failing every run.
pub struct AnalyzerOutputValidator {
    pub output_root: PathBuf,
}

impl OutputValidator for AnalyzerOutputValidator {
    fn validate(&self, run_id: RunId) -> bool {
        let marker = self.output_root.join(format!(".success_{run_id}.marker"));
        if marker.exists() {
            return true;
        }
        tracing::warn!(run_id = %run_id, "analyzer success marker missing, falling back to any-file-present check");
        has_matching_file(&self.output_root, |_| true)
    }
}

/// Merger output: a `.merge_complete_{run_id}.marker` sentinel file, falling
/// back to a recently-modified log file.
pub struct MergerOutputValidator {
    pub output_root: PathBuf,
}

const FALLBACK_RECENCY: Duration = Duration::from_secs(600);

impl OutputValidator for MergerOutputValidator {
    fn validate(&self, run_id: RunId) -> bool {
        let marker = self.output_root.join(format!(".merge_complete_{run_id}.marker"));
        if marker.exists() {
            return true;
        }
        tracing::warn!(run_id = %run_id, "merge completion marker missing, falling back to recently-modified log check");
        has_recently_modified_file(&self.output_root, FALLBACK_RECENCY)
    }
}

/// Recurses into subdirectories: translator output lives under
/// `{translated_root}/{instrument}/1m/YYYY/MM/...`, so a single-level scan
/// would never find it.
fn has_matching_file(root: &std::path::Path, predicate: impl Fn(&str) -> bool) -> bool {
    walkdir::WalkDir::new(root)
        .into_iter()
        .flatten()
        .any(|entry| entry.file_type().is_file() && entry.file_name().to_str().is_some_and(&predicate))
}

fn has_recently_modified_file(root: &std::path::Path, within: Duration) -> bool {
    let Ok(entries) = std::fs::read_dir(root) else {
        return false;
    };
    entries.flatten().any(|entry| {
        entry
            .metadata()
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .is_some_and(|elapsed| elapsed <= within)
    })
}

#[cfg(test)]
#[path = "validators_tests.rs"]
mod tests;
