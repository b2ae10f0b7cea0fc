//! Centralized constants for the keychord workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Resolver Defaults
// =============================================================================

/// Default key spec that aborts an in-progress chord.
pub const DEFAULT_CANCEL_KEY: &str = "<esc>";

/// Default maximum number of alias hops followed before reporting a cycle.
pub const DEFAULT_MAX_ALIAS_DEPTH: usize = 16;

/// Maximum allowed alias depth.
pub const MAX_ALIAS_DEPTH: usize = 64;

/// Ceiling for numeric repeat counts; larger prefixes saturate here.
pub const MAX_REPEAT_COUNT: u32 = 999_999;

/// Context consulted when no context is named explicitly.
pub const DEFAULT_CONTEXT: &str = "general";

// =============================================================================
// File Locations
// =============================================================================

/// Application name used for platform config directories.
pub const APP_NAME: &str = "keychord";

/// Settings file name inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "config.json";

// =============================================================================
// Environment Variables
// =============================================================================

/// Overrides the cancel key spec.
pub const ENV_CANCEL_KEY: &str = "KEYCHORD_CANCEL_KEY";

/// Overrides the unbound-key policy (`silent` or `notify`).
pub const ENV_UNBOUND_POLICY: &str = "KEYCHORD_UNBOUND_POLICY";

/// Overrides the maximum alias depth.
pub const ENV_MAX_ALIAS_DEPTH: &str = "KEYCHORD_MAX_ALIAS_DEPTH";

/// Path to a keymap file replacing the built-in defaults.
pub const ENV_KEYMAP: &str = "KEYCHORD_KEYMAP";

/// Disables `.env` loading when set to `1` or `true`.
pub const ENV_DOTENV_DISABLED: &str = "DOTENV_DISABLED";
