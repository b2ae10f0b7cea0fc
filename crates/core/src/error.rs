//! Error types for keymap registration and resolution.

use thiserror::Error;

use crate::key::ParseError;

/// Errors raised by the context registry and keymap application.
///
/// A key sequence that matches nothing is not an error; it is reported as an
/// aborted outcome by the resolver.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeymapError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Alias cycle in context '{context}' starting at '{keys}'")]
    AliasCycle { context: String, keys: String },

    #[error("Unknown context '{0}'")]
    UnknownContext(String),

    #[error("Unknown action capability '{0}'")]
    UnknownCapability(String),

    #[error("'{keys}' cannot be used here: {reason}")]
    MisplacedWildcard { keys: String, reason: &'static str },

    #[error("Invalid keymap: {0}")]
    InvalidKeymap(String),

    #[error("In context '{context}': {source}")]
    InContext {
        context: String,
        #[source]
        source: Box<KeymapError>,
    },

    #[error("Invalid cancel key '{keys}': {reason}")]
    InvalidCancelKey { keys: String, reason: String },
}

impl KeymapError {
    /// The error beneath any `InContext` wrappers.
    pub fn innermost(&self) -> &KeymapError {
        match self {
            Self::InContext { source, .. } => source.innermost(),
            other => other,
        }
    }
}
