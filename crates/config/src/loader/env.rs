//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `KEYCHORD_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//!
//! Does NOT handle:
//! - Loading the settings file (see file.rs).
//! - Building the final Config (see builder.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid values return ConfigError::InvalidValue.

use std::path::PathBuf;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::{ENV_CANCEL_KEY, ENV_KEYMAP, ENV_MAX_ALIAS_DEPTH, ENV_UNBOUND_POLICY};
use crate::types::UnboundPolicy;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(cancel_key) = env_var_or_none(ENV_CANCEL_KEY) {
        loader.set_cancel_key(Some(cancel_key));
    }
    if let Some(policy) = env_var_or_none(ENV_UNBOUND_POLICY) {
        let policy: UnboundPolicy =
            policy
                .parse()
                .map_err(|message: String| ConfigError::InvalidValue {
                    var: ENV_UNBOUND_POLICY.to_string(),
                    message,
                })?;
        loader.set_unbound_policy(Some(policy));
    }
    if let Some(depth) = env_var_or_none(ENV_MAX_ALIAS_DEPTH) {
        let depth: usize = depth.parse().map_err(|_| ConfigError::InvalidValue {
            var: ENV_MAX_ALIAS_DEPTH.to_string(),
            message: "must be a positive integer".to_string(),
        })?;
        loader.set_max_alias_depth(Some(depth));
    }
    if let Some(path) = env_var_or_none(ENV_KEYMAP) {
        loader.set_keymap_path(Some(PathBuf::from(path)));
    }
    Ok(())
}
