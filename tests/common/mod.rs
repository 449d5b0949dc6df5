//! Common test utilities for chronicle integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/chronicle/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data storage.
///
/// Each `TestEnv` creates a temporary data directory and passes it via
/// `CHRONICLE_DATA_DIR` per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated data directory.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the chron binary with isolated data directory.
    pub fn chron(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_chron"));
        cmd.env("CHRONICLE_DATA_DIR", self.data_dir.path());
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Create a project and return its id.
    pub fn create_project(&self, name: &str) -> String {
        let output = self
            .chron()
            .args(["project", "create", name])
            .output()
            .unwrap();
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["id"].as_str().unwrap().to_string()
    }

    /// Create a node (optionally under a parent) and return its id.
    pub fn create_node(&self, title: &str, parent: Option<&str>) -> String {
        let mut args = vec!["node", "add", title];
        if let Some(parent) = parent {
            args.extend(["-p", parent]);
        }
        let output = self.chron().args(&args).output().unwrap();
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["node"]["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
