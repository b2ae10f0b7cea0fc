//! A named keymap context: its binding trie, direction trie and keybuffer.
//!
//! Responsibilities:
//! - Register bindings, direction keys and aliases into the context's tries.
//! - Materialise `<dir>` at bind time into one binding per direction key.
//! - Copy another context's entries in (`merge_from`).
//!
//! Does NOT handle:
//! - Looking contexts up by name or switching between them (see `registry.rs`).
//! - Resolution rules for typed keys (see `keybuffer.rs`).
//!
//! Invariants:
//! - `<dir>` expansion uses the directions present when `bind` runs; directions
//!   added later do not reach existing bindings.
//! - Removing an entry never touches the context it was merged from.

use crate::action::ActionRef;
use crate::binding::{ActionBinding, BindOptions, Binding, DirectionSlot};
use crate::direction::{Direction, DirectionEntry};
use crate::dispatch::Outcome;
use crate::error::KeymapError;
use crate::key::{KeyCode, KeySequence, KeyToken};
use crate::keybuffer::{Keybuffer, ResolverPolicy};
use crate::trie::Trie;

#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    bindings: Trie<Binding>,
    directions: Trie<DirectionEntry>,
    keybuffer: Keybuffer,
    counts: bool,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: Trie::new(),
            directions: Trie::new(),
            keybuffer: Keybuffer::new(),
            counts: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bindings(&self) -> &Trie<Binding> {
        &self.bindings
    }

    pub fn directions(&self) -> &Trie<DirectionEntry> {
        &self.directions
    }

    pub fn keybuffer(&self) -> &Keybuffer {
        &self.keybuffer
    }

    /// Whether leading digits form a repeat count here.
    pub fn counts(&self) -> bool {
        self.counts
    }

    /// Turn repeat counts off for contexts where digits are typed as text.
    pub fn set_counts(&mut self, counts: bool) {
        self.counts = counts;
    }

    /// Bind `keys` to `action`, returning how many sequences were stored.
    ///
    /// A `<dir>` in `keys` (or `accepts_direction` without one, which appends
    /// `<dir>`) stores one binding per direction key currently registered.
    /// A trailing `<bg>` stores a hint.
    ///
    /// # Errors
    ///
    /// `MisplacedWildcard` for `<dir>` inside a hint, and `AliasCycle` if a
    /// direction alias loops while `<dir>` is materialised.
    pub fn bind(
        &mut self,
        keys: &KeySequence,
        action: ActionRef,
        mut options: BindOptions,
        max_alias_depth: usize,
    ) -> Result<usize, KeymapError> {
        let mut tokens = keys.tokens().to_vec();

        if keys.is_hint() {
            if keys.dir_position().is_some() {
                return Err(misplaced(keys, "<dir> cannot be part of a <bg> hint"));
            }
            self.bindings
                .insert(&tokens, action_binding(action, options, None));
            return Ok(1);
        }

        let pos = match keys.dir_position() {
            Some(pos) => {
                options.accepts_direction = true;
                pos
            }
            None if options.accepts_direction => {
                tokens.push(KeyToken::DIR);
                tokens.len() - 1
            }
            None => {
                self.bindings
                    .insert(&tokens, action_binding(action, options, None));
                return Ok(1);
            }
        };

        let (prefix, rest) = tokens.split_at(pos);
        let suffix = &rest[1..];
        let mut stored = 0;

        for (dir_keys, direction) in self.materialized_directions(max_alias_depth)? {
            let mut full = prefix.to_vec();
            full.extend_from_slice(&dir_keys);
            full.extend_from_slice(suffix);

            let slot = DirectionSlot {
                direction,
                depth: pos,
            };
            self.bindings
                .insert(&full, action_binding(action.clone(), options, Some(slot)));
            stored += 1;
        }

        if stored > 0 {
            self.bindings.mark_dir_slot(prefix);
        } else {
            tracing::warn!(
                context = %self.name,
                keys = %keys,
                "<dir> binding has no direction keys to expand into"
            );
        }
        Ok(stored)
    }

    /// Bind `keys` in the direction trie.
    pub fn bind_direction(
        &mut self,
        keys: &KeySequence,
        direction: Direction,
    ) -> Result<(), KeymapError> {
        reject_wildcards(keys)?;
        self.directions
            .insert(keys, DirectionEntry::Direction(direction));
        Ok(())
    }

    /// Make the direction key `keys` stand for the direction key `target`.
    pub fn alias_direction(
        &mut self,
        keys: &KeySequence,
        target: &KeySequence,
    ) -> Result<(), KeymapError> {
        reject_wildcards(keys)?;
        reject_wildcards(target)?;
        self.directions
            .insert(keys, DirectionEntry::Alias(target.clone()));
        Ok(())
    }

    /// Make `keys` resolve to whatever `target` is bound to at dispatch time.
    pub fn alias(&mut self, keys: &KeySequence, target: &KeySequence) -> Result<(), KeymapError> {
        reject_wildcards(keys)?;
        reject_wildcards(target)?;
        self.bindings.insert(keys, Binding::Alias(target.clone()));
        Ok(())
    }

    /// Remove the binding stored under `keys` in this context only, returning
    /// how many sequences were removed. A `<dir>` removes every expansion
    /// over the current direction keys.
    pub fn unbind(&mut self, keys: &KeySequence) -> usize {
        let Some(pos) = keys.dir_position() else {
            return usize::from(self.bindings.remove(keys).is_some());
        };

        let (prefix, rest) = keys.split_at(pos);
        let suffix = &rest[1..];
        let dir_keys: Vec<KeySequence> = self
            .directions
            .entries()
            .into_iter()
            .map(|(keys, _)| keys)
            .collect();

        let mut removed = 0;
        for dir in &dir_keys {
            let mut full = prefix.to_vec();
            full.extend_from_slice(dir);
            full.extend_from_slice(suffix);
            if self.bindings.remove(&full).is_some() {
                removed += 1;
            }
        }

        // Digits after the prefix are only counts while a `<dir>` binding
        // still starts there.
        if !self.has_direction_binding_at(prefix) {
            self.bindings.unmark_dir_slot(prefix);
        }
        removed
    }

    fn has_direction_binding_at(&self, prefix: &[KeyToken]) -> bool {
        self.bindings.entries().into_iter().any(|(keys, binding)| {
            keys.starts_with(prefix)
                && matches!(
                    binding,
                    Binding::Action(ActionBinding {
                        direction: Some(slot),
                        ..
                    }) if slot.depth == prefix.len()
                )
        })
    }

    /// Remove a direction key from this context only.
    pub fn unbind_direction(&mut self, keys: &KeySequence) -> bool {
        self.directions.remove(keys).is_some()
    }

    /// Copy every binding and direction of `other` into this context.
    pub fn merge_from(&mut self, other: &Context) {
        self.bindings.merge_from(&other.bindings);
        self.directions.merge_from(&other.directions);
    }

    /// The direction `keys` stands for, following direction aliases.
    ///
    /// Returns `Ok(None)` when nothing (or a dangling alias) is bound there.
    pub fn resolve_direction(
        &self,
        keys: &KeySequence,
        max_alias_depth: usize,
    ) -> Result<Option<Direction>, KeymapError> {
        let mut current = keys;
        let mut seen: Vec<&KeySequence> = Vec::new();

        loop {
            match self.directions.get(current) {
                None => return Ok(None),
                Some(DirectionEntry::Direction(direction)) => return Ok(Some(*direction)),
                Some(DirectionEntry::Alias(target)) => {
                    if seen.len() >= max_alias_depth || seen.contains(&target) {
                        return Err(KeymapError::AliasCycle {
                            context: self.name.clone(),
                            keys: keys.to_string(),
                        });
                    }
                    seen.push(target);
                    current = target;
                }
            }
        }
    }

    fn materialized_directions(
        &self,
        max_alias_depth: usize,
    ) -> Result<Vec<(KeySequence, Direction)>, KeymapError> {
        let mut out = Vec::new();
        for (keys, _) in self.directions.entries() {
            match self.resolve_direction(&keys, max_alias_depth)? {
                Some(direction) => out.push((keys, direction)),
                None => tracing::debug!(
                    context = %self.name,
                    keys = %keys,
                    "Skipping direction alias with no target"
                ),
            }
        }
        Ok(out)
    }

    /// Feed one token to this context's keybuffer.
    pub fn feed(&mut self, token: KeyToken, policy: &ResolverPolicy) -> Outcome {
        self.keybuffer
            .feed(token, &self.bindings, policy, self.counts)
    }

    pub fn clear_keybuffer(&mut self) {
        self.keybuffer.clear();
    }

    /// The `<bg>` hint for the keys typed so far.
    pub fn hint(&self) -> Option<&Binding> {
        self.bindings.hint(self.keybuffer.tokens())
    }

    /// Keys that can follow what was typed so far.
    pub fn continuations(&self) -> Vec<(KeyToken, Option<&Binding>)> {
        self.bindings.continuations(self.keybuffer.tokens())
    }
}

fn action_binding(action: ActionRef, options: BindOptions, slot: Option<DirectionSlot>) -> Binding {
    Binding::Action(ActionBinding {
        action,
        options,
        direction: slot,
    })
}

fn misplaced(keys: &KeySequence, reason: &'static str) -> KeymapError {
    KeymapError::MisplacedWildcard {
        keys: keys.to_string(),
        reason,
    }
}

fn reject_wildcards(keys: &KeySequence) -> Result<(), KeymapError> {
    if keys.iter().any(|t| t.code == KeyCode::Dir) {
        return Err(misplaced(keys, "<dir> is only allowed in action bindings"));
    }
    if keys.is_hint() {
        return Err(misplaced(keys, "<bg> is only allowed in action bindings"));
    }
    Ok(())
}
