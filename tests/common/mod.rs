//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Scratch checkout holding feature files, reference documents and a snapshot.
pub struct Workspace {
    temp: TempDir,
}

/// Exit status and captured streams of one `bddkit` run.
#[derive(Debug)]
pub struct RunResult {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    fn from_output(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|err| panic!("stdout is not JSON ({err}):\n{}", self.stdout))
    }
}

impl Workspace {
    pub fn setup() -> Self {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(temp.path().join("features")).expect("create features dir");
        fs::create_dir_all(temp.path().join("refs")).expect("create refs dir");
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn features(&self) -> PathBuf {
        self.root().join("features")
    }

    pub fn refs(&self) -> PathBuf {
        self.root().join("refs")
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, contents.as_bytes()).expect("write file");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root().join(rel)).expect("read file")
    }

    /// Run `bddkit` with the workspace as its working directory.
    ///
    /// `FEATURES_PATH` and `EXPECTED_FAILURES_DIR` point into the workspace;
    /// `envs` entries override them.
    pub fn run(&self, args: &[&str], envs: &[(&str, &str)]) -> RunResult {
        let mut command = Command::new(env!("CARGO_BIN_EXE_bddkit"));
        command
            .args(args)
            .current_dir(self.root())
            .env_remove("EXPECTED_FAILURES_PREFIX")
            .env_remove("BDDKIT_LOG")
            .env("FEATURES_PATH", self.features())
            .env("EXPECTED_FAILURES_DIR", self.refs());
        for (key, value) in envs {
            command.env(key, value);
        }
        let output = command.output().expect("run bddkit");
        RunResult::from_output(output)
    }
}
