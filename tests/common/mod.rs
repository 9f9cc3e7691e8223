//! Common test utilities and fixtures
//!
//! Every test runs the binary inside its own temporary home so no user
//! configuration or scenario leaks in.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated home directory with a scenario file location
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Workspace with an initialized, empty scenario
    pub fn initialized() -> Self {
        let ws = Self::new();
        ws.cmd().args(["init", "--name", "Test scenario"]).assert().success();
        ws
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn scenario_path(&self) -> PathBuf {
        self.dir.path().join("scenario.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.config_path();
        fs::write(&path, content).unwrap();
        path
    }

    /// Command for the binary, pointed at this workspace
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("scenario-builder").unwrap();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join(".config"))
            .env("SCENARIO_DATA_DIR", self.dir.path())
            .env("SCENARIO_FILE", self.scenario_path())
            .env_remove("SCENARIO_CONFIG")
            .env_remove("SCENARIO_DEFAULT_ESTIMATED_TIME")
            .env_remove("SCENARIO_LOG_LEVEL")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run a command that must succeed and return its stdout
    pub fn run(&self, args: &[&str]) -> String {
        let output = self.cmd().args(args).assert().success().get_output().clone();
        String::from_utf8(output.stdout).unwrap()
    }

    /// Stored scenario as raw JSON
    pub fn scenario_json(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.scenario_path()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    /// Activity ids in canvas order, read from the stored scenario
    pub fn activity_ids(&self) -> Vec<String> {
        self.scenario_json()["activities"]["activities"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap().to_string())
            .collect()
    }
}
