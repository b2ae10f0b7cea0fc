//! Declarative keymap file schema.
//!
//! Responsibilities:
//! - Define the serde types of a keymap file (contexts, bindings, directions, aliases).
//! - Read keymap files from disk as YAML or JSON, chosen by file extension.
//!
//! Does NOT handle:
//! - Parsing key specs or registering bindings (see keychord-core `keymap`).
//! - Resolving action names to capabilities.
//!
//! Invariants:
//! - `contexts` is applied in file order; later entries may merge earlier ones.
//! - Within a context, merges apply first, then directions, bindings, aliases,
//!   unbinds and direction unbinds.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loader::ConfigError;

/// A whole keymap file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeymapFile {
    /// Contexts in composition order.
    #[serde(default)]
    pub contexts: Vec<ContextSpec>,
}

/// One named context and the entries registered into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextSpec {
    pub name: String,
    /// Treat digits as ordinary keys instead of repeat counts.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub literal_digits: bool,
    /// Contexts whose entries are copied in first, in order.
    #[serde(default)]
    pub merge: Vec<String>,
    #[serde(default)]
    pub directions: Vec<DirectionSpec>,
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
    #[serde(default)]
    pub aliases: Vec<AliasSpec>,
    /// Binding key specs removed from this context only.
    #[serde(default)]
    pub unbind: Vec<String>,
    /// Direction key specs removed from this context only.
    #[serde(default)]
    pub unbind_directions: Vec<String>,
}

/// Key specs bound to a named action capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSpec {
    pub keys: Vec<String>,
    /// Capability name, e.g. `fm.cut`.
    pub action: String,
    /// Static arguments handed to the capability on every invocation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default)]
    pub quick: bool,
    #[serde(default)]
    pub accepts_direction: bool,
}

/// Key specs bound to a movement descriptor, or aliased to another direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionSpec {
    pub keys: Vec<String>,
    /// When set, the keys alias this direction key spec and the params are ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<i64>,
    #[serde(default)]
    pub absolute: bool,
    #[serde(default)]
    pub percentage: bool,
    #[serde(default)]
    pub pages: bool,
}

/// Key specs that resolve to another binding's key spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSpec {
    pub keys: Vec<String>,
    pub target: String,
}

impl KeymapFile {
    /// Parse a keymap from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Parse a keymap from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read a keymap file, picking the format from its extension.
    ///
    /// `.json` files are parsed as JSON; `.yaml`, `.yml` and files without an
    /// extension as YAML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::KeymapRead` when the file cannot be read,
    /// `ConfigError::KeymapParse` when its contents do not match the schema and
    /// `ConfigError::UnsupportedKeymapFormat` for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::KeymapRead {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let parsed = match extension.as_deref() {
            Some("json") => Self::from_json_str(&text).map_err(|e| e.to_string()),
            Some("yaml") | Some("yml") | None => {
                Self::from_yaml_str(&text).map_err(|e| e.to_string())
            }
            Some(_) => {
                return Err(ConfigError::UnsupportedKeymapFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        let keymap = parsed.map_err(|message| ConfigError::KeymapParse {
            path: path.to_path_buf(),
            message,
        })?;

        tracing::debug!(
            path = %path.display(),
            contexts = keymap.contexts.len(),
            "Read keymap file"
        );
        Ok(keymap)
    }

    /// Look up a context spec by name.
    pub fn context(&self, name: &str) -> Option<&ContextSpec> {
        self.contexts.iter().find(|ctx| ctx.name == name)
    }

    /// Every action name referenced by any binding, sorted.
    pub fn action_names(&self) -> BTreeSet<&str> {
        self.contexts
            .iter()
            .flat_map(|ctx| ctx.bindings.iter())
            .map(|binding| binding.action.as_str())
            .collect()
    }
}
