//! Configuration system tests
//!
//! Tests configuration loading, validation, and environment overrides

mod common;

use std::fs;

use common::Workspace;
use predicates::prelude::*;

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_default_config_is_valid() {
    Workspace::new()
        .cmd()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_show_default() {
    Workspace::new()
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[builder]"))
        .stdout(predicate::str::contains("[storage]"))
        .stdout(predicate::str::contains("[logging]"))
        .stdout(predicate::str::contains("default_estimated_time = 15"));
}

#[test]
fn test_full_config() {
    let ws = Workspace::new();
    let path = ws.write_config(
        r#"
[builder]
scenario_name = "Customer service day"
default_estimated_time = 20
default_competency = "customer-focus"

[storage]
scenario_file = "scenario.json"

[logging]
level = "info"
json_format = false
"#,
    );

    ws.cmd()
        .args(["--config", path.to_str().unwrap(), "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Customer service day"))
        .stdout(predicate::str::contains("customer-focus"));

    ws.cmd()
        .args(["--config", path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Customer service day"));

    ws.cmd()
        .args(["--config", path.to_str().unwrap(), "activity", "add", "email"])
        .assert()
        .success();
    let json = ws.scenario_json();
    assert_eq!(json["activities"]["activities"][0]["estimated_time"], 20);

    ws.cmd()
        .args(["--config", path.to_str().unwrap(), "nav", "competency", "tab=inbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("customer-focus"));
}

#[test]
fn test_config_discovered_in_working_directory() {
    let ws = Workspace::new();
    fs::write(
        ws.path().join("scenario-builder.toml"),
        "[builder]\nscenario_name = \"Found locally\"\n",
    )
    .unwrap();

    ws.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found locally"));
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_estimated_time() {
    let ws = Workspace::new();
    let path = ws.write_config("[builder]\ndefault_estimated_time = 0\n");

    ws.cmd()
        .args(["--config", path.to_str().unwrap(), "config", "validate"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("E102"))
        .stderr(predicate::str::contains("default_estimated_time"));
}

#[test]
fn test_invalid_log_level() {
    let ws = Workspace::new();
    let path = ws.write_config("[logging]\nlevel = \"loud\"\n");

    ws.cmd()
        .args(["--config", path.to_str().unwrap(), "config", "validate"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("Invalid log level"));
}

#[test]
fn test_malformed_toml() {
    let ws = Workspace::new();
    let path = ws.write_config("[builder\nscenario_name = ");

    ws.cmd()
        .args(["--config", path.to_str().unwrap(), "config", "validate"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("E101"));
}

#[test]
fn test_explicit_config_missing() {
    let ws = Workspace::new();
    let missing = ws.path().join("nope.toml");

    ws.cmd()
        .args(["--config", missing.to_str().unwrap(), "config", "show"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("E100"));
}

// ─────────────────────────────────────────────────────────────────
// Init Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_init_creates_file() {
    let ws = Workspace::new();
    let path = ws.path().join("conf").join("builder.toml");

    ws.cmd()
        .args(["config", "init", "--path", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[builder]"));
    assert!(content.contains("default_estimated_time = 15"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let ws = Workspace::new();
    let path = ws.write_config("# keep me\n");

    ws.cmd()
        .args(["config", "init", "--path", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "# keep me\n");

    ws.cmd()
        .args(["config", "init", "--force", "--path", path.to_str().unwrap()])
        .assert()
        .success();
    assert!(fs::read_to_string(&path).unwrap().contains("[storage]"));
}

// ─────────────────────────────────────────────────────────────────
// Environment Override Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_env_overrides_file() {
    let ws = Workspace::new();
    let path = ws.write_config("[builder]\ndefault_estimated_time = 20\n");
    ws.run(&["init"]);

    ws.cmd()
        .args(["--config", path.to_str().unwrap(), "activity", "add", "chat"])
        .env("SCENARIO_DEFAULT_ESTIMATED_TIME", "45")
        .assert()
        .success();

    // explicit flag beats both
    ws.cmd()
        .args(["--config", path.to_str().unwrap(), "activity", "add", "chat", "--minutes", "5"])
        .env("SCENARIO_DEFAULT_ESTIMATED_TIME", "45")
        .assert()
        .success();

    let json = ws.scenario_json();
    let activities = &json["activities"]["activities"];
    assert_eq!(activities[0]["estimated_time"], 45);
    assert_eq!(activities[1]["estimated_time"], 5);
}

#[test]
fn test_env_scenario_name() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("init")
        .env("SCENARIO_NAME", "From the environment")
        .assert()
        .success();
    assert_eq!(ws.scenario_json()["name"], "From the environment");
}
