//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Support loading from the settings file, environment variables, and direct builder methods.
//! - Validate and build the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Settings file parsing logic (delegated to file.rs).
//!
//! Invariants / Assumptions:
//! - Each source overwrites what earlier sources set; call order is precedence order.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use std::path::PathBuf;

use super::env::apply_env;
use super::error::ConfigError;
use super::file::apply_file;
use crate::constants::{
    DEFAULT_CANCEL_KEY, DEFAULT_MAX_ALIAS_DEPTH, ENV_DOTENV_DISABLED, MAX_ALIAS_DEPTH,
};
use crate::types::{Config, ResolverSettings, UnboundPolicy};

/// Configuration loader that builds config from the settings file and environment.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    cancel_key: Option<String>,
    unbound_policy: Option<UnboundPolicy>,
    max_alias_depth: Option<usize>,
    keymap_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(ENV_DOTENV_DISABLED).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Override the settings file path (primarily for testing).
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Read configuration from the settings file.
    pub fn from_file(mut self) -> Result<Self, ConfigError> {
        apply_file(&mut self)?;
        Ok(self)
    }

    /// Read configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the cancel key spec.
    pub fn with_cancel_key(mut self, key: String) -> Self {
        self.cancel_key = Some(key);
        self
    }

    /// Set the unbound-key policy.
    pub fn with_unbound_policy(mut self, policy: UnboundPolicy) -> Self {
        self.unbound_policy = Some(policy);
        self
    }

    /// Set the maximum alias depth.
    pub fn with_max_alias_depth(mut self, depth: usize) -> Self {
        self.max_alias_depth = Some(depth);
        self
    }

    /// Set the keymap file path.
    pub fn with_keymap_path(mut self, path: PathBuf) -> Self {
        self.keymap_path = Some(path);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let cancel_key = self
            .cancel_key
            .unwrap_or_else(|| DEFAULT_CANCEL_KEY.to_string());
        if cancel_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "cancel_key".to_string(),
                message: "must not be blank".to_string(),
            });
        }

        let max_alias_depth = self.max_alias_depth.unwrap_or(DEFAULT_MAX_ALIAS_DEPTH);
        Self::validate_alias_depth(max_alias_depth)?;

        Ok(Config {
            resolver: ResolverSettings {
                cancel_key,
                unbound_policy: self.unbound_policy.unwrap_or_default(),
                max_alias_depth,
            },
            keymap_path: self.keymap_path,
        })
    }

    fn validate_alias_depth(depth: usize) -> Result<(), ConfigError> {
        if depth == 0 {
            return Err(ConfigError::InvalidAliasDepth {
                message: "max_alias_depth must be greater than 0".to_string(),
            });
        }
        if depth > MAX_ALIAS_DEPTH {
            return Err(ConfigError::InvalidAliasDepth {
                message: format!(
                    "max_alias_depth exceeds maximum allowed value of {}",
                    MAX_ALIAS_DEPTH
                ),
            });
        }
        Ok(())
    }

    pub(crate) fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub(crate) fn set_cancel_key(&mut self, key: Option<String>) {
        self.cancel_key = key;
    }

    pub(crate) fn set_unbound_policy(&mut self, policy: Option<UnboundPolicy>) {
        self.unbound_policy = policy;
    }

    pub(crate) fn set_max_alias_depth(&mut self, depth: Option<usize>) {
        self.max_alias_depth = depth;
    }

    pub(crate) fn set_keymap_path(&mut self, path: Option<PathBuf>) {
        self.keymap_path = path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let config = ConfigLoader::new().build().unwrap();
        assert_eq!(config.resolver, ResolverSettings::default());
        assert!(config.keymap_path.is_none());
    }

    #[test]
    fn test_builder_setters_apply() {
        let config = ConfigLoader::new()
            .with_cancel_key("<C-g>".to_string())
            .with_unbound_policy(UnboundPolicy::Notify)
            .with_max_alias_depth(3)
            .with_keymap_path(PathBuf::from("keys.yaml"))
            .build()
            .unwrap();

        assert_eq!(config.resolver.cancel_key, "<C-g>");
        assert_eq!(config.resolver.unbound_policy, UnboundPolicy::Notify);
        assert_eq!(config.resolver.max_alias_depth, 3);
        assert_eq!(config.keymap_path, Some(PathBuf::from("keys.yaml")));
    }

    #[test]
    fn test_zero_alias_depth_rejected() {
        let result = ConfigLoader::new().with_max_alias_depth(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidAliasDepth { .. })));
    }

    #[test]
    fn test_alias_depth_above_maximum_rejected() {
        let result = ConfigLoader::new()
            .with_max_alias_depth(MAX_ALIAS_DEPTH + 1)
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidAliasDepth { .. })));
    }

    #[test]
    fn test_blank_cancel_key_rejected() {
        let result = ConfigLoader::new().with_cancel_key("  ".to_string()).build();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
