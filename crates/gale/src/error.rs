//! Error types for the style session

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GaleError>;

/// Errors reported by a style engine implementation
#[derive(Error, Debug, Diagnostic)]
pub enum EngineError {
    /// The engine rejected the configuration
    #[error("failed to create style engine: {message}")]
    #[diagnostic(
        code(gale::engine::create_failed),
        help("Check the theme, shortcuts and plugins in your gale config")
    )]
    CreateFailed { message: String },

    /// CSS source could not be rewritten
    #[error("failed to convert CSS: {message}")]
    #[diagnostic(code(gale::engine::convert_failed))]
    ConvertFailed { message: String },
}

impl EngineError {
    pub fn create_failed(message: impl ToString) -> Self {
        Self::CreateFailed {
            message: message.to_string(),
        }
    }

    pub fn convert_failed(message: impl ToString) -> Self {
        Self::ConvertFailed {
            message: message.to_string(),
        }
    }
}

/// Errors that can occur while scanning or compiling a project
#[derive(Error, Debug, Diagnostic)]
pub enum GaleError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),

    /// An include or exclude pattern is not a valid glob
    #[error("invalid glob pattern \"{pattern}\": {source}")]
    #[diagnostic(
        code(gale::scan::invalid_glob),
        help("Patterns are relative to the project root, e.g. src/**/*.vue")
    )]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Walking the project root failed
    #[error("failed to scan {}: {message}", .root.display())]
    #[diagnostic(code(gale::scan::walk_failed))]
    Scan { root: PathBuf, message: String },

    #[error("I/O error: {0}")]
    #[diagnostic(code(gale::io))]
    Io(#[from] std::io::Error),

    /// A blocking scan task panicked or was cancelled
    #[error("background task failed: {0}")]
    #[diagnostic(code(gale::task_join))]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl GaleError {
    pub fn invalid_glob(pattern: impl Into<String>, source: globset::Error) -> Self {
        Self::InvalidGlob {
            pattern: pattern.into(),
            source,
        }
    }

    pub fn scan(root: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Scan {
            root: root.into(),
            message: message.to_string(),
        }
    }
}
