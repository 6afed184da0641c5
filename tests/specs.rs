// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box specs over the `orcctl` binary: one temp `ORC_ROOT` per test,
//! driven entirely through the process boundary rather than the library API.

mod prelude {
    use std::path::{Path, PathBuf};

    use assert_cmd::Command;
    use tempfile::TempDir;

    pub struct Project {
        dir: TempDir,
    }

    impl Project {
        pub fn empty() -> Self {
            Self { dir: tempfile::tempdir().expect("tempdir") }
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        /// `orcctl` invocation rooted at this project, with the three stage
        /// programs defaulted to the `true` binary so a run completes
        /// instantly without a real translator/analyzer/merger present.
        pub fn orcctl(&self) -> Command {
            let mut cmd = Command::cargo_bin("orcctl").expect("orcctl binary");
            cmd.env("ORC_ROOT", self.root())
                .env("ORC_TRANSLATOR_BIN", "true")
                .env("ORC_ANALYZER_BIN", "true")
                .env("ORC_MERGER_BIN", "true")
                .env("RUST_LOG", "error");
            cmd
        }

        pub fn state_path(&self) -> PathBuf {
            self.root().join("automation/logs/orchestrator_state.json")
        }
    }

    pub fn stdout(output: &std::process::Output) -> String {
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

mod cli {
    use crate::prelude::{stdout, Project};

    #[test]
    fn status_is_idle_with_no_run() {
        let project = Project::empty();
        let output = project.orcctl().arg("status").assert().success().get_output().clone();
        assert!(stdout(&output).contains("idle"));
    }

    #[test]
    fn run_completes_and_status_reports_success() {
        let project = Project::empty();
        let run_output = project.orcctl().arg("run").assert().success().get_output().clone();
        assert!(stdout(&run_output).contains("started run"));
        assert!(project.state_path().is_file());

        let status_output = project.orcctl().arg("status").assert().success().get_output().clone();
        assert!(stdout(&status_output).contains("success"));
    }

    #[test]
    fn list_runs_shows_the_completed_run() {
        let project = Project::empty();
        project.orcctl().arg("run").assert().success();
        let output = project
            .orcctl()
            .args(["list-runs", "--result", "success"])
            .assert()
            .success()
            .get_output()
            .clone();
        assert!(stdout(&output).contains("success"));
    }

    #[test]
    fn scheduler_status_reports_without_a_prior_run() {
        let project = Project::empty();
        project.orcctl().args(["scheduler", "status"]).assert().success();
    }
}
