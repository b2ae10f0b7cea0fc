//! Values stored in a context's binding trie.

use std::fmt;

use crate::action::ActionRef;
use crate::direction::Direction;
use crate::key::KeySequence;
use crate::trie::Trie;

/// Flags recorded with an action binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindOptions {
    /// Dispatch as soon as the keys match, even if longer bindings share the prefix.
    pub quick: bool,
    /// The binding takes a `<dir>` sub-sequence.
    pub accepts_direction: bool,
}

impl BindOptions {
    pub fn quick() -> Self {
        Self {
            quick: true,
            ..Self::default()
        }
    }

    pub fn with_direction() -> Self {
        Self {
            accepts_direction: true,
            ..Self::default()
        }
    }
}

/// The direction a `<dir>` expansion baked into one binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionSlot {
    pub direction: Direction,
    /// Number of binding tokens before the direction keys.
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBinding {
    pub action: ActionRef,
    pub options: BindOptions,
    pub direction: Option<DirectionSlot>,
}

/// What a key sequence is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Resolves to whatever is bound under another key sequence.
    Alias(KeySequence),
    Action(ActionBinding),
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Alias(target) => write!(f, "-> {target}"),
            Binding::Action(binding) => {
                write!(f, "{}", binding.action)?;
                if let Some(slot) = &binding.direction {
                    write!(f, " [{}]", slot.direction)?;
                }
                if binding.options.quick {
                    write!(f, " (quick)")?;
                }
                Ok(())
            }
        }
    }
}

/// Outcome of following a binding's alias chain.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved<'a> {
    Action(&'a ActionBinding),
    /// An alias points at keys with nothing bound.
    Dangling,
    /// The chain revisited a sequence or exceeded the depth limit.
    Cycle,
}

/// Follow `binding` through aliases in `bindings` until an action is reached.
pub fn resolve_alias<'a>(
    bindings: &'a Trie<Binding>,
    binding: &'a Binding,
    max_depth: usize,
) -> Resolved<'a> {
    let mut current = binding;
    let mut seen: Vec<&KeySequence> = Vec::new();

    loop {
        let target = match current {
            Binding::Action(action) => return Resolved::Action(action),
            Binding::Alias(target) => target,
        };
        if seen.len() >= max_depth || seen.contains(&target) {
            return Resolved::Cycle;
        }
        seen.push(target);

        match bindings.find(target) {
            Some(next) => current = next,
            None => return Resolved::Dangling,
        }
    }
}
