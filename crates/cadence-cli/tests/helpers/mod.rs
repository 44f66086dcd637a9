use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that would leak the developer's configuration into tests
const CONFIG_ENV_VARS: &[&str] = &[
    "CADENCE_PREVIEW__DEFAULT_COUNT",
    "CADENCE_PREVIEW__MATERIALIZE_COUNT",
    "CADENCE_PREVIEW__MAX_COUNT",
    "CADENCE_DISPLAY__DATE_FORMAT",
];

/// Test harness running the CLI inside an empty temporary directory
pub struct CliTestHarness {
    temp_dir: TempDir,
}

impl CliTestHarness {
    /// Create a new harness; no `cadence.toml` exists until one is written
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");
        cmd.current_dir(self.temp_dir.path());
        for var in CONFIG_ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Working directory the CLI runs in
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a config file into the working directory and return its path
    pub fn write_config(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write config file");
        path
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output contains the occurrence table headers
    pub fn has_occurrence_table_headers() -> impl Predicate<str> {
        predicate::str::contains("Date")
            .and(predicate::str::contains("Day"))
            .and(predicate::str::contains("When"))
    }

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}

/// Number of occurrence rows in a rendered preview table. The heading line
/// may mention dates too, so only bordered table lines are counted.
pub fn count_table_rows(output: &str, date_fragment: &str) -> usize {
    output
        .lines()
        .filter(|line| line.starts_with('│') && line.contains(date_fragment))
        .count()
}
