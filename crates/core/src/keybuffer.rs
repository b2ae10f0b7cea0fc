//! Keybuffer resolver: turns single tokens into dispatch outcomes.
//!
//! Responsibilities:
//! - Accumulate the numeric prefix typed before a binding.
//! - Accumulate a second count typed at a `<dir>` slot (the `3` in `5d3gg`);
//!   without one, the outer count applies to the direction.
//! - Query the binding trie after every key and decide wait, dispatch or abort.
//! - Follow alias chains and build the `Invocation` bundle.
//!
//! Does NOT handle:
//! - Choosing the active context or notifying the host (see `registry.rs`).
//! - Invoking actions; the caller does that with the returned `Dispatch`.
//!
//! Invariants:
//! - Every terminal outcome (dispatched or aborted) leaves the buffer empty.
//! - Digits count only before the first key, except a leading `0`, which is a key.
//! - Counts saturate at `MAX_REPEAT_COUNT`.

use keychord_config::constants::{DEFAULT_MAX_ALIAS_DEPTH, MAX_REPEAT_COUNT};
use keychord_config::{ResolverSettings, UnboundPolicy};

use crate::binding::{Binding, Resolved, resolve_alias};
use crate::dispatch::{AbortReason, Dispatch, Invocation, Outcome};
use crate::error::KeymapError;
use crate::key::{KeyCode, KeySequence, KeyToken, parse_keys};
use crate::trie::{Lookup, Trie};

/// Resolver knobs, parsed from `ResolverSettings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverPolicy {
    pub cancel: KeyToken,
    pub unbound: UnboundPolicy,
    pub max_alias_depth: usize,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            cancel: KeyToken::new(KeyCode::Esc),
            unbound: UnboundPolicy::default(),
            max_alias_depth: DEFAULT_MAX_ALIAS_DEPTH,
        }
    }
}

impl ResolverPolicy {
    /// Build a policy from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns `KeymapError::InvalidCancelKey` if the cancel key is not exactly
    /// one concrete key.
    pub fn from_settings(settings: &ResolverSettings) -> Result<Self, KeymapError> {
        let invalid = |reason: String| KeymapError::InvalidCancelKey {
            keys: settings.cancel_key.clone(),
            reason,
        };
        let seq = parse_keys(&settings.cancel_key).map_err(|e| invalid(e.to_string()))?;
        let cancel = match seq.tokens() {
            [token] if !token.is_wildcard() => *token,
            _ => return Err(invalid("expected a single concrete key".to_string())),
        };

        Ok(Self {
            cancel,
            unbound: settings.unbound_policy,
            max_alias_depth: settings.max_alias_depth,
        })
    }
}

/// Transient per-context input state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keybuffer {
    count: Option<u32>,
    tokens: Vec<KeyToken>,
    inner_count: Option<u32>,
    /// Token index at which `inner_count` is being typed.
    inner_at: Option<usize>,
}

impl Keybuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count.is_none() && self.tokens.is_empty() && self.inner_count.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Keys captured so far, without counts.
    pub fn tokens(&self) -> &[KeyToken] {
        &self.tokens
    }

    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// Feed one token, consulting `bindings` for matches.
    ///
    /// With `counts` off, digits are ordinary keys.
    pub fn feed(
        &mut self,
        token: KeyToken,
        bindings: &Trie<Binding>,
        policy: &ResolverPolicy,
        counts: bool,
    ) -> Outcome {
        if token.is_wildcard() {
            return Outcome::None;
        }

        if token == policy.cancel {
            if !self.is_empty() {
                self.clear();
                return Outcome::Aborted(AbortReason::Cancelled);
            }
            if bindings.lookup(&[token]) == Lookup::None {
                return Outcome::None;
            }
        }

        if counts && let Some(digit) = token.digit() {
            if self.tokens.is_empty() && (self.count.is_some() || digit != 0) {
                self.count = Some(accumulate(self.count, digit));
                return Outcome::Waiting;
            }
            if self.accepts_inner_digit(token, digit, bindings) {
                self.inner_count = Some(accumulate(self.inner_count, digit));
                self.inner_at = Some(self.tokens.len());
                return Outcome::Waiting;
            }
        }

        self.tokens.push(token);
        match bindings.lookup(&self.tokens) {
            Lookup::None => {
                let keys = KeySequence::new(std::mem::take(&mut self.tokens)).to_string();
                self.clear();
                Outcome::Aborted(AbortReason::NoBinding { keys })
            }
            Lookup::Ambiguous { exact: None, .. } => Outcome::Waiting,
            Lookup::Ambiguous {
                exact: Some(binding),
                ..
            } if !is_quick(binding, bindings, policy) => Outcome::Waiting,
            Lookup::Ambiguous {
                exact: Some(binding),
                ..
            }
            | Lookup::Exact(binding) => self.dispatch(binding, bindings, policy),
        }
    }

    /// A digit typed at a `<dir>` slot counts for the direction unless it
    /// continues a binding itself.
    fn accepts_inner_digit(&self, token: KeyToken, digit: u32, bindings: &Trie<Binding>) -> bool {
        if self.tokens.is_empty() || !bindings.is_dir_slot(&self.tokens) {
            return false;
        }
        if self.inner_at == Some(self.tokens.len()) {
            return true;
        }
        if digit == 0 {
            return false;
        }

        let mut extended = self.tokens.clone();
        extended.push(token);
        bindings.lookup(&extended) == Lookup::None
    }

    fn dispatch(
        &mut self,
        binding: &Binding,
        bindings: &Trie<Binding>,
        policy: &ResolverPolicy,
    ) -> Outcome {
        let keys = KeySequence::new(std::mem::take(&mut self.tokens)).to_string();
        let count = self.count;
        let inner_count = self.inner_count;
        self.clear();

        let action = match resolve_alias(bindings, binding, policy.max_alias_depth) {
            Resolved::Action(action) => action,
            Resolved::Dangling => return Outcome::Aborted(AbortReason::NoBinding { keys }),
            Resolved::Cycle => return Outcome::Aborted(AbortReason::AliasCycle { keys }),
        };

        // A count typed at the direction slot wins over the outer count.
        let direction = action
            .direction
            .map(|slot| slot.direction.with_count(inner_count.or(count)));

        Outcome::Dispatched(Dispatch {
            action: action.action.clone(),
            invocation: Invocation {
                repeat_count: count,
                direction,
                matched_keys: keys,
                args: action.action.args().to_vec(),
            },
        })
    }
}

/// True when `binding`, after following aliases, is a quick action.
fn is_quick(binding: &Binding, bindings: &Trie<Binding>, policy: &ResolverPolicy) -> bool {
    matches!(
        resolve_alias(bindings, binding, policy.max_alias_depth),
        Resolved::Action(action) if action.options.quick
    )
}

fn accumulate(current: Option<u32>, digit: u32) -> u32 {
    current
        .unwrap_or(0)
        .saturating_mul(10)
        .saturating_add(digit)
        .min(MAX_REPEAT_COUNT)
}
