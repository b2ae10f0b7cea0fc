//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for all configuration and keymap loading failures.
//!
//! Does NOT handle:
//! - Key spec parse errors (see keychord-core).
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, paths, etc.).
//! - Dotenv errors NEVER include raw .env line contents.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Unable to determine config directory: {0}")]
    ConfigDirUnavailable(String),

    #[error("Failed to read settings file at {path}")]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file at {path}: {message}")]
    ConfigFileParse { path: PathBuf, message: String },

    #[error("Failed to read keymap file at {path}")]
    KeymapRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse keymap file at {path}: {message}")]
    KeymapParse { path: PathBuf, message: String },

    #[error("Unsupported keymap format at {path}: expected .yaml, .yml or .json")]
    UnsupportedKeymapFormat { path: PathBuf },

    #[error("invalid alias depth: {message}")]
    InvalidAliasDepth { message: String },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// Only the byte index of the failure is kept, never the offending line.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
