//! Applying declarative keymap files to a context registry.
//!
//! Responsibilities:
//! - Walk a `KeymapFile` in order and call the registration API for it.
//! - Resolve binding action names through `Capabilities`.
//!
//! Does NOT handle:
//! - Reading or deserializing files (see keychord-config `keymap`).
//!
//! Invariants:
//! - Within a context: merges, directions, bindings, aliases, unbinds, then
//!   direction unbinds.
//! - The first error stops loading and names the context it happened in.

use keychord_config::{BindingSpec, ContextSpec, DirectionSpec, KeymapFile};
use serde::Serialize;

use crate::action::Capabilities;
use crate::binding::BindOptions;
use crate::direction::Direction;
use crate::error::KeymapError;
use crate::registry::ContextRegistry;

/// Counts of what a keymap registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeymapSummary {
    pub contexts: usize,
    /// Binding sequences stored, after `<dir>` expansion.
    pub bindings: usize,
    pub directions: usize,
    pub aliases: usize,
    /// Entries removed by `unbind` and `unbind_directions`.
    pub removed: usize,
}

fn direction_from_spec(spec: &DirectionSpec) -> Direction {
    Direction {
        down: spec.down,
        right: spec.right,
        absolute: spec.absolute,
        percentage: spec.percentage,
        pages: spec.pages,
    }
}

/// Register every context of `keymap` into `registry`.
///
/// # Errors
///
/// Returns `KeymapError::InContext` wrapping the first parse, capability,
/// merge or alias error encountered.
pub fn apply_keymap(
    registry: &mut ContextRegistry,
    keymap: &KeymapFile,
    capabilities: &Capabilities,
) -> Result<KeymapSummary, KeymapError> {
    let mut summary = KeymapSummary::default();

    for spec in &keymap.contexts {
        apply_context(registry, spec, capabilities, &mut summary).map_err(|source| {
            KeymapError::InContext {
                context: spec.name.clone(),
                source: Box::new(source),
            }
        })?;
        summary.contexts += 1;
    }

    tracing::info!(
        contexts = summary.contexts,
        bindings = summary.bindings,
        directions = summary.directions,
        aliases = summary.aliases,
        removed = summary.removed,
        "Applied keymap"
    );
    Ok(summary)
}

fn apply_context(
    registry: &mut ContextRegistry,
    spec: &ContextSpec,
    capabilities: &Capabilities,
    summary: &mut KeymapSummary,
) -> Result<(), KeymapError> {
    let name = spec.name.as_str();
    if name.trim().is_empty() {
        return Err(KeymapError::InvalidKeymap(
            "context name must not be empty".to_string(),
        ));
    }
    registry.get_or_create(name).set_counts(!spec.literal_digits);

    for source in &spec.merge {
        registry.merge_context(name, source)?;
    }

    for direction in &spec.directions {
        for keys in &direction.keys {
            match &direction.alias {
                Some(target) => registry.alias_direction(name, keys, target)?,
                None => registry.bind_direction(name, keys, direction_from_spec(direction))?,
            }
            summary.directions += 1;
        }
    }

    for binding in &spec.bindings {
        summary.bindings += apply_binding(registry, name, binding, capabilities)?;
    }

    for alias in &spec.aliases {
        for keys in &alias.keys {
            registry.alias(name, keys, &alias.target)?;
            summary.aliases += 1;
        }
    }

    for keys in &spec.unbind {
        summary.removed += registry.unbind(name, keys)?;
    }
    for keys in &spec.unbind_directions {
        if registry.unbind_direction(name, keys)? {
            summary.removed += 1;
        }
    }
    Ok(())
}

fn apply_binding(
    registry: &mut ContextRegistry,
    context: &str,
    binding: &BindingSpec,
    capabilities: &Capabilities,
) -> Result<usize, KeymapError> {
    if binding.keys.is_empty() {
        return Err(KeymapError::InvalidKeymap(format!(
            "binding for '{}' lists no keys",
            binding.action
        )));
    }

    let action = capabilities
        .resolve(&binding.action)?
        .with_args(binding.args.iter().cloned());
    let options = BindOptions {
        quick: binding.quick,
        accepts_direction: binding.accepts_direction,
    };
    let keys: Vec<&str> = binding.keys.iter().map(String::as_str).collect();
    registry.bind(context, &keys, action, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Invocation, Outcome};
    use crate::key::parse_keys;

    const KEYMAP: &str = r#"
contexts:
  - name: global
    directions:
      - keys: ["<down>"]
        down: 1
      - keys: ["<home>"]
        down: 0
        absolute: true
      - keys: ["%"]
        down: 1
        absolute: true
        percentage: true
    bindings:
      - keys: ["Q"]
        action: fm.exit
  - name: vim_aliases
    directions:
      - keys: ["j"]
        alias: "<down>"
      - keys: ["gg"]
        alias: "<home>"
  - name: general
    merge: [global, vim_aliases]
    bindings:
      - keys: ["dd", "d<dir>"]
        action: fm.cut
      - keys: ["gh"]
        action: fm.cd
        args: ["~"]
    aliases:
      - keys: ["x"]
        target: "dd"
  - name: console
    merge: [global]
    unbind: ["Q"]
    unbind_directions: ["%"]
"#;

    fn capabilities() -> Capabilities {
        let mut caps = Capabilities::new();
        for name in ["fm.exit", "fm.cut", "fm.cd"] {
            caps.register(name, |_: &Invocation| -> anyhow::Result<()> { Ok(()) });
        }
        caps
    }

    fn load() -> (ContextRegistry, KeymapSummary) {
        let keymap = KeymapFile::from_yaml_str(KEYMAP).unwrap();
        let mut registry = ContextRegistry::default();
        let summary = apply_keymap(&mut registry, &keymap, &capabilities()).unwrap();
        (registry, summary)
    }

    fn feed(registry: &mut ContextRegistry, context: &str, keys: &str) -> Outcome {
        let mut last = Outcome::None;
        for token in parse_keys(keys).unwrap().iter() {
            last = registry.feed_token(context, *token).unwrap();
        }
        last
    }

    #[test]
    fn test_summary_counts() {
        let (_, summary) = load();
        assert_eq!(summary.contexts, 4);
        assert_eq!(summary.directions, 5);
        // Q, dd, five expansions of d<dir>, gh
        assert_eq!(summary.bindings, 1 + 1 + 5 + 1);
        assert_eq!(summary.aliases, 1);
        assert_eq!(summary.removed, 2);
    }

    #[test]
    fn test_args_reach_invocation() {
        let (mut registry, _) = load();
        let outcome = feed(&mut registry, "general", "gh");
        assert_eq!(outcome.dispatch().unwrap().invocation.args, vec!["~"]);
    }

    #[test]
    fn test_direction_binding_from_keymap() {
        let (mut registry, _) = load();
        let outcome = feed(&mut registry, "general", "5d3gg");
        let dispatch = outcome.dispatch().unwrap();
        assert_eq!(dispatch.action.name(), "fm.cut");
        assert_eq!(dispatch.invocation.repeat_count, Some(5));
        assert_eq!(
            dispatch.invocation.direction.and_then(|d| d.target()),
            Some(3)
        );
    }

    #[test]
    fn test_alias_from_keymap() {
        let (mut registry, _) = load();
        let outcome = feed(&mut registry, "general", "x");
        assert_eq!(outcome.dispatch().unwrap().action.name(), "fm.cut");
    }

    #[test]
    fn test_console_unbinds_are_local() {
        let (mut registry, _) = load();
        assert!(matches!(feed(&mut registry, "console", "Q"), Outcome::Aborted(_)));
        assert!(feed(&mut registry, "global", "Q").dispatch().is_some());
        assert!(
            registry
                .context("global")
                .unwrap()
                .directions()
                .get(&parse_keys("%").unwrap())
                .is_some()
        );
    }

    #[test]
    fn test_unknown_capability_names_context() {
        let keymap = KeymapFile::from_yaml_str(KEYMAP).unwrap();
        let mut caps = Capabilities::new();
        caps.register("fm.exit", |_: &Invocation| -> anyhow::Result<()> { Ok(()) });

        let err = apply_keymap(&mut ContextRegistry::default(), &keymap, &caps).unwrap_err();
        assert!(matches!(
            &err,
            KeymapError::InContext { context, .. } if context == "general"
        ));
        assert_eq!(
            err.innermost(),
            &KeymapError::UnknownCapability("fm.cut".to_string())
        );
    }

    #[test]
    fn test_merge_of_missing_context_fails() {
        let keymap = KeymapFile::from_yaml_str(
            "contexts:\n  - name: general\n    merge: [nowhere]\n",
        )
        .unwrap();
        let err = apply_keymap(&mut ContextRegistry::default(), &keymap, &capabilities())
            .unwrap_err();
        assert_eq!(
            err.innermost(),
            &KeymapError::UnknownContext("nowhere".to_string())
        );
    }

    #[test]
    fn test_bad_key_spec_fails() {
        let keymap = KeymapFile::from_yaml_str(
            "contexts:\n  - name: general\n    bindings:\n      - keys: [\"<C-\"]\n        action: fm.exit\n",
        )
        .unwrap();
        let err = apply_keymap(&mut ContextRegistry::default(), &keymap, &capabilities())
            .unwrap_err();
        assert!(matches!(err.innermost(), KeymapError::Parse(_)));
    }
}
