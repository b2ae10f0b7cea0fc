//! The built-in keymap.
//!
//! The table ships inside the binary so the dispatcher works without any
//! keymap file on disk. Hosts activate `general`, `pager`, `embedded_pager`,
//! `taskview` or `console`; the remaining contexts are merge sources.

use keychord_config::KeymapFile;

use crate::error::KeymapError;

/// YAML source of the built-in keymap.
pub const DEFAULT_KEYMAP_YAML: &str = include_str!("../keymaps/default.yaml");

/// Contexts meant to be activated by a host, in display order.
pub const HOST_CONTEXTS: &[&str] = &["general", "pager", "embedded_pager", "taskview", "console"];

/// Deserialize the built-in keymap.
///
/// # Errors
///
/// Returns `KeymapError::InvalidKeymap` if the embedded YAML does not match
/// the keymap schema.
pub fn default_keymap() -> Result<KeymapFile, KeymapError> {
    KeymapFile::from_yaml_str(DEFAULT_KEYMAP_YAML)
        .map_err(|e| KeymapError::InvalidKeymap(format!("built-in keymap: {e}")))
}
