//! Configuration system for the scenario builder
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (SCENARIO_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{Competency, DEFAULT_ESTIMATED_TIME, MIN_ESTIMATED_TIME};

/// Main builder configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Defaults applied to new scenarios and activities
    pub builder: BuilderSettings,

    /// Data storage paths
    pub storage: StorageSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Builder defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderSettings {
    /// Name given to scenarios created by `init`
    pub scenario_name: String,

    /// Minutes assigned to new activities
    pub default_estimated_time: u32,

    /// Competency used when navigation carries none
    pub default_competency: Competency,
}

/// Storage path settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Base data directory
    pub data_dir: String,

    /// Scenario snapshot file, relative to `data_dir` unless absolute
    pub scenario_file: String,

    /// Local flag store file, relative to `data_dir` unless absolute
    pub local_store_file: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            scenario_name: "Untitled scenario".to_string(),
            default_estimated_time: DEFAULT_ESTIMATED_TIME,
            default_competency: Competency::DEFAULT,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.scenario-builder".to_string(),
            scenario_file: "scenario.json".to_string(),
            local_store_file: "local-store.json".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_files: 5,
            json_format: false,
        }
    }
}

impl BuilderConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            config = Self::from_file(&path)?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration file without overrides or validation
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading configuration file");
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            message: format!("{}: {}", path.display(), e.message()),
            source: Some(e),
        })
    }

    /// Find the configuration file to use
    pub fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        // Search in standard locations
        let search_paths = [
            // Current directory
            Some(PathBuf::from("scenario-builder.toml")),
            // User config directory
            dirs::config_dir().map(|p| p.join("scenario-builder").join("config.toml")),
            // Home directory
            dirs::home_dir().map(|p| p.join(".scenario-builder").join("config.toml")),
        ];

        for path in search_paths.iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Builder settings
        if let Ok(val) = std::env::var("SCENARIO_NAME") {
            self.builder.scenario_name = val;
        }
        if let Ok(val) = std::env::var("SCENARIO_DEFAULT_ESTIMATED_TIME") {
            if let Ok(n) = val.parse() {
                self.builder.default_estimated_time = n;
            }
        }
        if let Ok(val) = std::env::var("SCENARIO_DEFAULT_COMPETENCY") {
            if let Ok(c) = val.parse() {
                self.builder.default_competency = c;
            }
        }

        // Storage settings
        if let Ok(val) = std::env::var("SCENARIO_DATA_DIR") {
            self.storage.data_dir = val;
        }
        if let Ok(val) = std::env::var("SCENARIO_LOCAL_STORE") {
            self.storage.local_store_file = val;
        }

        // Logging settings
        if let Ok(val) = std::env::var("SCENARIO_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("SCENARIO_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("SCENARIO_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.storage.data_dir = expand_path(&self.storage.data_dir);
        self.storage.scenario_file = expand_path(&self.storage.scenario_file);
        self.storage.local_store_file = expand_path(&self.storage.local_store_file);

        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.builder.default_estimated_time < MIN_ESTIMATED_TIME {
            return Err(Error::config_field_invalid(
                "builder.default_estimated_time",
                format!(
                    "default_estimated_time must be at least {} minute",
                    MIN_ESTIMATED_TIME
                ),
            ));
        }

        if self.builder.scenario_name.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "builder.scenario_name",
                "scenario_name cannot be empty",
            ));
        }

        if self.storage.scenario_file.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "storage.scenario_file",
                "scenario_file cannot be empty",
            ));
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Get the data directory as a PathBuf
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }

    /// Location of the scenario snapshot
    pub fn scenario_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.scenario_file)
    }

    /// Location of the local flag store
    pub fn local_store_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.local_store_file)
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Default location written by `config init`
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".scenario-builder")
        .join("config.toml")
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(default_config_path);

    // Check if file exists
    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    // Create parent directories
    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
pub fn generate_default_config() -> String {
    r#"# Scenario Builder Configuration

[builder]
# Name given to scenarios created by `scenario-builder init`
scenario_name = "Untitled scenario"

# Minutes assigned to new activities (minimum 1)
default_estimated_time = 15

# Competency used when the navigation query carries none
default_competency = "communication"

[storage]
# Base data directory
data_dir = "~/.scenario-builder"

# Scenario snapshot, relative to data_dir unless absolute
scenario_file = "scenario.json"

# Local flag store (inbox read-state), relative to data_dir unless absolute
local_store_file = "local-store.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.scenario-builder/logs/builder.log"

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    .to_string()
}
