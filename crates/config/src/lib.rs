//! Configuration for the keychord key-sequence dispatcher.
//!
//! This crate provides the resolver settings loader (settings file,
//! environment variables and `.env`), and the serde schema of declarative
//! keymap files.

pub mod constants;
pub mod keymap;
mod loader;
pub mod types;

pub use keymap::{AliasSpec, BindingSpec, ContextSpec, DirectionSpec, KeymapFile};
pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use types::{Config, ResolverSettings, UnboundPolicy};
