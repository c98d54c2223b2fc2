//! Error types for configuration discovery and loading.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    #[diagnostic(
        code(gale::config::not_found),
        help("Create a gale.config.toml in the project root or pass an existing path")
    )]
    NotFound(PathBuf),

    #[error("failed to load config \"{}\": {message}", .path.display())]
    #[diagnostic(code(gale::config::load_failed))]
    LoadFailed { path: PathBuf, message: String },

    #[error("unsupported configuration format: {0}")]
    #[diagnostic(
        code(gale::config::unsupported_format),
        help("Supported formats are TOML, JSON, YAML and the \"gale\" field of package.json")
    )]
    UnsupportedFormat(String),

    #[error("invalid config value: {0}")]
    #[diagnostic(code(gale::config::invalid_value))]
    InvalidValue(String),

    #[error("I/O error: {0}")]
    #[diagnostic(code(gale::config::io))]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn load_failed(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::LoadFailed {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
