//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use homebar_config::ConfigError;
use homebar_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const ENGINE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input files ──────────────────────────────────────────────────
    #[error("Could not read {what} from {path}")]
    #[diagnostic(code(homebar::read_failed), help("Check that the file exists and is readable."))]
    ReadFailed {
        what: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {what} in {path}: {source}")]
    #[diagnostic(
        code(homebar::invalid_json),
        help("Check the JSON file contents and try again.")
    )]
    InvalidJson {
        what: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // ── Menu ─────────────────────────────────────────────────────────
    #[error("No menu item titled '{title}'")]
    #[diagnostic(
        code(homebar::item_not_found),
        help("Run: homebar tree --snapshot <file> to see the available titles")
    )]
    ItemNotFound { title: String },

    #[error("Menu engine error: {message}")]
    #[diagnostic(code(homebar::engine))]
    Engine { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(homebar::validation))]
    Validation { field: String, reason: String },

    #[error("Unknown config key '{key}'")]
    #[diagnostic(code(homebar::unknown_key), help("Known keys: {known}"))]
    UnknownKey { key: String, known: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(homebar::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(homebar::render))]
    Render(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ItemNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::UnknownKey { .. } | Self::InvalidJson { .. } => {
                exit_code::USAGE
            }
            Self::Engine { .. } => exit_code::ENGINE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::Engine {
            message: err.to_string(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownKey { key } => Self::UnknownKey {
                key,
                known: homebar_config::KEYS.join(", "),
            },
            other => Self::Config(other),
        }
    }
}
