//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map config, keymap and key-spec errors to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Exit code 2 stays with clap for usage errors.

use keychord_config::ConfigError;
use keychord_core::{KeymapError, ParseError};

/// Structured exit codes for keychord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Configuration error - unreadable settings, bad environment values,
    /// missing or malformed keymap file.
    ConfigError = 3,

    /// Invalid keymap - the keymap parsed but could not be registered.
    ///
    /// Scripts should fix the keymap; retrying will not help.
    InvalidKeymap = 4,

    /// Invalid key spec given on the command line.
    InvalidKeys = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&KeymapError> for ExitCode {
    fn from(err: &KeymapError) -> Self {
        match err {
            // Raised while applying a keymap file.
            KeymapError::InContext { .. } => ExitCode::InvalidKeymap,
            KeymapError::UnknownContext(_) => ExitCode::GeneralError,
            KeymapError::InvalidCancelKey { .. } => ExitCode::ConfigError,
            _ => ExitCode::InvalidKeymap,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<KeymapError>() {
                return ExitCode::from(err);
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return ExitCode::ConfigError;
            }
            if cause.downcast_ref::<ParseError>().is_some() {
                return ExitCode::InvalidKeys;
            }
        }

        ExitCode::GeneralError
    }
}
