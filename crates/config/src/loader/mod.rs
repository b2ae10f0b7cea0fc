//! Configuration loader for settings files, environment variables and `.env`.
//!
//! Responsibilities:
//! - Load resolver settings from `.env` files, environment variables and a JSON settings file.
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Reading keymap files (see `keymap.rs`).
//! - Interpreting key specs (the cancel key is validated by keychord-core).
//!
//! Invariants / Assumptions:
//! - Later sources override earlier ones; callers order `from_file`, `from_env`
//!   and builder setters from lowest to highest precedence.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

mod builder;
mod env;
mod error;
mod file;

pub use builder::ConfigLoader;
pub use env::env_var_or_none;
pub use error::ConfigError;
