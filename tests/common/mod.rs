//! Shared test infrastructure for integration tests.

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// A fresh data directory initialized with `clo init`.
pub struct DataDir {
    pub dir: TempDir,
}

impl DataDir {
    pub fn init() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let data = DataDir { dir };
        data.run_ok(&["init"]);
        data
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run `clo <args> --data-dir <dir>`.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_clo"))
            .args(args)
            .arg("--data-dir")
            .arg(self.path())
            .env_remove("CLO_DATA_DIR")
            .env("CLO_LOG", "warn")
            .output()
            .expect("run clo")
    }

    pub fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "clo {args:?} failed:\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Run a command that should fail and return its stderr.
    pub fn run_err(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "clo {args:?} unexpectedly succeeded:\n{}",
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).into_owned()
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut with_json = args.to_vec();
        with_json.push("--json");
        let stdout = self.run_ok(&with_json);
        serde_json::from_str(&stdout).expect("parse JSON output")
    }

    /// Create a project and one request for client `c1`; returns the process id.
    pub fn seed_request(&self, work_title: &str) -> u64 {
        let project = self.run_json(&[
            "client",
            "new-project",
            "--user",
            "c1",
            "--type",
            "Synch",
            "--set",
            "Title=Night Train",
            "--set",
            "department=Film",
        ]);
        let project_id = project["id"].as_u64().expect("project id").to_string();
        let title = format!("Title={work_title}");
        let request = self.run_json(&[
            "client",
            "new-request",
            "--user",
            "c1",
            "--project",
            &project_id,
            "--work-type",
            "Music",
            "--set",
            &title,
            "--set",
            "composer=R. Roe",
        ]);
        request["id"].as_u64().expect("process id")
    }
}
