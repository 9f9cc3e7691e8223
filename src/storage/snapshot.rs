//! Scenario snapshot file.
//!
//! One JSON document per scenario, rewritten in full on every save.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::scenario::Scenario;

pub fn exists(path: &Path) -> bool {
    path.is_file()
}

/// Read a scenario from `path`
pub fn load(path: &Path) -> Result<Scenario> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::ScenarioMissing {
            path: path.to_path_buf(),
        },
        _ => Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let scenario: Scenario =
        serde_json::from_str(&content).map_err(|e| Error::SnapshotMalformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!(
        path = %path.display(),
        activities = scenario.activities().len(),
        personas = scenario.personas().len(),
        "Scenario loaded"
    );
    Ok(scenario)
}

/// Write `scenario` to `path`, replacing whatever was there
pub fn save(path: &Path, scenario: &Scenario) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(scenario)?;
    fs::write(path, json).map_err(|e| Error::IoWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(path = %path.display(), scenario = %scenario.id, "Scenario saved");
    Ok(())
}
