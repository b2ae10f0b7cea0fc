//! Settings file loading for configuration.
//!
//! Responsibilities:
//! - Resolve the settings file location (platform config dir via `directories`).
//! - Read the JSON settings file and apply the values it sets to a ConfigLoader.
//!
//! Does NOT handle:
//! - Environment variable parsing (see env.rs).
//! - Building the final Config (see builder.rs).
//!
//! Invariants:
//! - A missing settings file is not an error; nothing is applied.
//! - Only keys present in the file are applied, so absent keys never clobber
//!   values set by earlier sources.

use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::{APP_NAME, SETTINGS_FILE_NAME};
use crate::types::UnboundPolicy;

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    resolver: PartialResolverSettings,
    #[serde(default)]
    keymap_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialResolverSettings {
    cancel_key: Option<String>,
    unbound_policy: Option<UnboundPolicy>,
    max_alias_depth: Option<usize>,
}

/// Returns the default path to the settings file.
///
/// - Linux: `~/.config/keychord/config.json`
/// - macOS: `~/Library/Application Support/keychord/config.json`
/// - Windows: `%AppData%\keychord\config.json`
pub(crate) fn default_config_path() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join(SETTINGS_FILE_NAME))
}

/// Apply values from the settings file to the loader.
pub fn apply_file(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    let path = match loader.config_path() {
        Some(path) => path.clone(),
        None => {
            default_config_path().map_err(|e| ConfigError::ConfigDirUnavailable(e.to_string()))?
        }
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "No settings file found");
        return Ok(());
    }

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::ConfigFileRead {
        path: path.clone(),
        source,
    })?;
    let settings: SettingsFile =
        serde_json::from_str(&text).map_err(|e| ConfigError::ConfigFileParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

    if let Some(cancel_key) = settings.resolver.cancel_key {
        loader.set_cancel_key(Some(cancel_key));
    }
    if let Some(policy) = settings.resolver.unbound_policy {
        loader.set_unbound_policy(Some(policy));
    }
    if let Some(depth) = settings.resolver.max_alias_depth {
        loader.set_max_alias_depth(Some(depth));
    }
    if let Some(keymap_path) = settings.keymap_path {
        loader.set_keymap_path(Some(keymap_path));
    }

    tracing::debug!(path = %path.display(), "Applied settings file");
    Ok(())
}
