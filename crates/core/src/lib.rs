//! Key-sequence dispatcher for a modal terminal file manager.
//!
//! This crate turns a stream of key tokens into action dispatches. Keys are
//! bound per named context in prefix tries; a per-context keybuffer
//! accumulates pending keys, leading repeat counts and direction suffixes
//! until the sequence resolves, stays ambiguous or is abandoned.
//!
//! The declarative side (`keymap`, `defaults`) registers contexts from a
//! `keychord_config::KeymapFile`; `term` adapts crossterm key events.

pub mod action;
pub mod binding;
pub mod context;
pub mod defaults;
pub mod direction;
pub mod dispatch;
pub mod error;
pub mod key;
pub mod keybuffer;
pub mod keymap;
pub mod registry;
pub mod telemetry;
pub mod term;
pub mod trie;

pub use action::{Action, ActionRef, Capabilities};
pub use binding::{ActionBinding, BindOptions, Binding, DirectionSlot};
pub use context::Context;
pub use defaults::{DEFAULT_KEYMAP_YAML, default_keymap};
pub use direction::{Direction, DirectionEntry};
pub use dispatch::{
    AbortReason, Dispatch, Invocation, Notification, NotificationLevel, Notifier, Outcome,
    TracingNotifier,
};
pub use error::KeymapError;
pub use key::{KeyCode, KeySequence, KeyToken, Modifiers, ParseError, parse_key, parse_keys};
pub use keybuffer::{Keybuffer, ResolverPolicy};
pub use keymap::{KeymapSummary, apply_keymap};
pub use registry::ContextRegistry;
pub use term::key_token_from_event;
pub use trie::{Lookup, Trie};
