//! Configuration types for the keychord resolver.
//!
//! Responsibilities:
//! - Define `ResolverSettings`, the knobs the keybuffer resolver reads at startup.
//! - Define `UnboundPolicy` for reporting keys that match nothing.
//!
//! Does NOT handle:
//! - Parsing key specs (the cancel key stays a string here; see keychord-core).
//! - Loading values from files or the environment (see `loader`).
//!
//! Invariants:
//! - Every field has a serde default so partial settings files deserialize.
//! - `UnboundPolicy` uses snake_case serialization for config file consistency.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CANCEL_KEY, DEFAULT_MAX_ALIAS_DEPTH};

/// How the resolver reports a key sequence that matches no binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnboundPolicy {
    /// Abort quietly.
    #[default]
    Silent,
    /// Abort and send a notification to the host.
    Notify,
}

impl fmt::Display for UnboundPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Silent => write!(f, "silent"),
            Self::Notify => write!(f, "notify"),
        }
    }
}

impl FromStr for UnboundPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(Self::Silent),
            "notify" => Ok(Self::Notify),
            other => Err(format!("expected 'silent' or 'notify', got '{other}'")),
        }
    }
}

/// Settings consumed by the keybuffer resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Key spec that aborts an in-progress chord (e.g. `<esc>`).
    #[serde(default = "default_cancel_key")]
    pub cancel_key: String,
    /// Reporting policy for unbound sequences.
    #[serde(default)]
    pub unbound_policy: UnboundPolicy,
    /// Maximum alias hops before the chain is treated as a cycle.
    #[serde(default = "default_max_alias_depth")]
    pub max_alias_depth: usize,
}

fn default_cancel_key() -> String {
    DEFAULT_CANCEL_KEY.to_string()
}

fn default_max_alias_depth() -> usize {
    DEFAULT_MAX_ALIAS_DEPTH
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            cancel_key: default_cancel_key(),
            unbound_policy: UnboundPolicy::default(),
            max_alias_depth: default_max_alias_depth(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Resolver settings.
    #[serde(default)]
    pub resolver: ResolverSettings,
    /// Keymap file replacing the built-in default keymap, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keymap_path: Option<PathBuf>,
}
