//! Building a ready-to-feed context registry from settings and a keymap.
//!
//! Responsibilities:
//! - Merge settings file, environment and CLI flags into a `Config`.
//! - Load the keymap file, or the built-in keymap when none is configured.
//! - Register a logging capability for every action the keymap names.
//!
//! Does NOT handle:
//! - `.env` loading (done in `main()` before clap parsing).
//! - Printing outcomes (see `formatters`).
//!
//! Invariants:
//! - Precedence: CLI flags > environment > settings file > defaults.
//! - Every action name in the keymap resolves, so capability errors only
//!   come from keymaps edited after this module registered names.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use keychord_config::{Config, ConfigLoader, KeymapFile, UnboundPolicy};
use keychord_core::{
    Action, Capabilities, ContextRegistry, Invocation, KeymapSummary, Notification, Notifier,
    ResolverPolicy, apply_keymap, default_keymap,
};

use crate::args::Cli;

/// Where the loaded keymap came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapSource {
    BuiltIn,
    File(PathBuf),
}

impl std::fmt::Display for KeymapSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuiltIn => write!(f, "built-in"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct Session {
    pub registry: ContextRegistry,
    pub summary: KeymapSummary,
    pub source: KeymapSource,
}

/// Resolve settings from every source, CLI flags last.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut loader = ConfigLoader::new();

    // Blank values fall back to the default location.
    if let Some(ref path) = cli.config_path
        && !path.to_string_lossy().trim().is_empty()
    {
        loader = loader.with_config_path(path.clone());
    }

    loader = loader
        .from_file()
        .context("Failed to load settings file")?
        .from_env()
        .context("Failed to load configuration from environment")?;

    if let Some(ref key) = cli.cancel_key {
        loader = loader.with_cancel_key(key.clone());
    }
    if cli.notify_unbound {
        loader = loader.with_unbound_policy(UnboundPolicy::Notify);
    }
    if let Some(ref path) = cli.keymap {
        loader = loader.with_keymap_path(path.clone());
    }

    loader.build().context("Failed to build configuration")
}

fn load_keymap(config: &Config) -> Result<(KeymapFile, KeymapSource)> {
    match &config.keymap_path {
        Some(path) => {
            let keymap = KeymapFile::from_path(path)?;
            Ok((keymap, KeymapSource::File(path.clone())))
        }
        None => Ok((default_keymap()?, KeymapSource::BuiltIn)),
    }
}

/// Capabilities that log each invocation instead of acting on it.
pub fn logging_capabilities(keymap: &KeymapFile) -> Capabilities {
    let log: Arc<dyn Action> = Arc::new(|invocation: &Invocation| -> anyhow::Result<()> {
        tracing::info!(
            keys = %invocation.matched_keys,
            count = ?invocation.repeat_count,
            args = ?invocation.args,
            "Action invoked"
        );
        Ok(())
    });

    let mut capabilities = Capabilities::new();
    capabilities.register_all(keymap.action_names(), log);
    capabilities
}

/// Load settings and keymap and register every context.
///
/// `notifier` receives abort notifications when the unbound policy asks for them.
pub fn open(cli: &Cli, notifier: impl Notifier + 'static) -> Result<Session> {
    let config = load_config(cli)?;
    let policy = ResolverPolicy::from_settings(&config.resolver)?;
    let (keymap, source) = load_keymap(&config)?;

    let mut registry = ContextRegistry::new(policy).with_notifier(notifier);
    let summary = apply_keymap(&mut registry, &keymap, &logging_capabilities(&keymap))
        .with_context(|| format!("Failed to apply keymap ({source})"))?;

    tracing::debug!(%source, contexts = summary.contexts, "Session ready");
    Ok(Session {
        registry,
        summary,
        source,
    })
}

/// Notifier that prints to stderr, for non-interactive commands.
pub fn stderr_notifier(notification: Notification) {
    eprintln!("{}: {}", notification.level, notification.message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_capabilities_cover_keymap() {
        let keymap = default_keymap().unwrap();
        let capabilities = logging_capabilities(&keymap);
        for name in keymap.action_names() {
            assert!(capabilities.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_keymap_source_display() {
        assert_eq!(KeymapSource::BuiltIn.to_string(), "built-in");
        assert_eq!(
            KeymapSource::File(PathBuf::from("keys.yaml")).to_string(),
            "keys.yaml"
        );
    }
}
