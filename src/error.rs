//! Error types for the scenario builder
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for builder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,
    SnapshotMalformed = 204,

    // Scenario errors (3xx)
    ActivityNotFound = 300,
    PersonaNotFound = 301,
    SelfDependency = 302,
    MissingCondition = 303,
    PersonaInvalid = 304,
    UnknownField = 305,
    ContentMismatch = 306,
    DialogNotApplicable = 307,
    DragPayload = 308,
    ScenarioMissing = 309,
    NothingSelected = 310,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E300")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Scenario errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the builder
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Scenario file present but unreadable as a scenario
    #[error("Malformed scenario file {path}: {message}")]
    SnapshotMalformed { path: PathBuf, message: String },

    // ─────────────────────────────────────────────────────────────
    // Scenario Errors
    // ─────────────────────────────────────────────────────────────

    /// No scenario file at the configured location
    #[error("No scenario found at {path}")]
    ScenarioMissing { path: PathBuf },

    /// Activity id does not exist
    #[error("Activity not found: {id}")]
    ActivityNotFound { id: String },

    /// Persona id does not exist
    #[error("Persona not found: {id}")]
    PersonaNotFound { id: String },

    /// Dependency from an activity onto itself
    #[error("Activity {id} cannot depend on itself")]
    SelfDependency { id: String },

    /// Score dependency without a threshold
    #[error("Score dependency {source_id} -> {target_id} requires a condition")]
    MissingCondition { source_id: String, target_id: String },

    /// Persona profile rejected at creation
    #[error("Invalid persona: {reason}")]
    PersonaInvalid { reason: String },

    /// Content field not defined for the activity kind
    #[error("Field '{field}' is not available on {kind} activities")]
    UnknownField { kind: String, field: String },

    /// Content patch of another kind than the activity
    #[error("Cannot apply {given} content to {expected} activity")]
    ContentMismatch { expected: String, given: String },

    /// Persona dialog opened on an activity without personas
    #[error("Personas are not available on {kind} activities")]
    DialogNotApplicable { kind: String },

    /// Drag-transfer payload could not be parsed
    #[error("Invalid drag payload: {message}")]
    DragPayload { message: String },

    /// Panel opened with no activity selected
    #[error("No activity is selected")]
    NothingSelected,

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Json(_) => ErrorCode::SnapshotMalformed,
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::SnapshotMalformed { .. } => ErrorCode::SnapshotMalformed,

            Error::ScenarioMissing { .. } => ErrorCode::ScenarioMissing,
            Error::ActivityNotFound { .. } => ErrorCode::ActivityNotFound,
            Error::PersonaNotFound { .. } => ErrorCode::PersonaNotFound,
            Error::SelfDependency { .. } => ErrorCode::SelfDependency,
            Error::MissingCondition { .. } => ErrorCode::MissingCondition,
            Error::PersonaInvalid { .. } => ErrorCode::PersonaInvalid,
            Error::UnknownField { .. } => ErrorCode::UnknownField,
            Error::ContentMismatch { .. } => ErrorCode::ContentMismatch,
            Error::DialogNotApplicable { .. } => ErrorCode::DialogNotApplicable,
            Error::DragPayload { .. } => ErrorCode::DragPayload,
            Error::NothingSelected => ErrorCode::NothingSelected,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'scenario-builder config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'scenario-builder config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),
            Error::ScenarioMissing { .. } => Some(
                "Run 'scenario-builder init' to create an empty scenario."
            ),
            Error::SnapshotMalformed { .. } | Error::Json(_) => Some(
                "The scenario file is corrupted. Restore it from a backup or run 'scenario-builder init --force'."
            ),
            Error::ActivityNotFound { .. } => Some(
                "Run 'scenario-builder activity list' to see valid activity ids."
            ),
            Error::PersonaNotFound { .. } => Some(
                "Run 'scenario-builder persona list' to see valid persona ids."
            ),
            Error::SelfDependency { .. } => Some(
                "Pick two different activities as source and target."
            ),
            Error::MissingCondition { .. } => Some(
                "Score dependencies need a threshold, e.g. --condition \"≥ 70%\"."
            ),
            Error::PersonaInvalid { .. } => Some(
                "Both --name and --role are required."
            ),
            Error::UnknownField { .. } => Some(
                "Run 'scenario-builder field list <id>' to see the fields for this activity."
            ),
            Error::NothingSelected => Some(
                "Select an activity with 'scenario-builder activity select <id>' or pass an id."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors (for ergonomic error creation)
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an activity not found error
    pub fn activity_not_found(id: impl fmt::Display) -> Self {
        Error::ActivityNotFound { id: id.to_string() }
    }

    /// Create a persona not found error
    pub fn persona_not_found(id: impl fmt::Display) -> Self {
        Error::PersonaNotFound { id: id.to_string() }
    }

    /// Create an invalid persona error
    pub fn persona_invalid(reason: impl Into<String>) -> Self {
        Error::PersonaInvalid { reason: reason.into() }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::ConfigNotFound.as_str(), "E100");
        assert_eq!(ErrorCode::SelfDependency.as_str(), "E302");
        assert_eq!(ErrorCode::InternalError.as_str(), "E900");
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(ErrorCode::ConfigNotFound.exit_code(), 10);
        assert_eq!(ErrorCode::IoRead.exit_code(), 20);
        assert_eq!(ErrorCode::ActivityNotFound.exit_code(), 30);
        assert_eq!(ErrorCode::InternalError.exit_code(), 90);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::activity_not_found("act-1").code(), ErrorCode::ActivityNotFound);
        assert_eq!(Error::persona_not_found("persona-1").code(), ErrorCode::PersonaNotFound);
        assert_eq!(
            Error::SelfDependency { id: "act-1".into() }.code(),
            ErrorCode::SelfDependency
        );
    }

    #[test]
    fn test_error_suggestions() {
        let err = Error::ScenarioMissing { path: PathBuf::from("/tmp/s.json") };
        assert!(err.suggestion().unwrap().contains("scenario-builder init"));

        let err = Error::MissingCondition {
            source_id: "act-1".into(),
            target_id: "act-2".into(),
        };
        assert!(err.suggestion().unwrap().contains("--condition"));

        assert!(Error::Internal("x".into()).suggestion().is_none());
    }

    #[test]
    fn test_format_for_terminal() {
        let err = Error::activity_not_found("act-9");
        let formatted = err.format_for_terminal();

        assert!(formatted.contains("E300"));
        assert!(formatted.contains("\x1b[31m"));
        assert!(formatted.contains("Hint"));
    }

    #[test]
    fn test_format_for_log() {
        let formatted = Error::activity_not_found("act-9").format_for_log();
        assert!(formatted.contains("[E300]"));
        assert!(formatted.contains("act-9"));
        assert!(!formatted.contains("\x1b["));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert_eq!(err.code(), ErrorCode::IoNotFound);
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<Vec<String>>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert_eq!(err.code(), ErrorCode::SnapshotMalformed);
        assert_eq!(err.exit_code(), 20);
    }
}
