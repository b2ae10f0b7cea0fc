//! The context registry: named contexts, registration API and token feed.
//!
//! Responsibilities:
//! - Own every `Context` by name and create them on first use.
//! - Parse key specs for the registration API and route them to a context.
//! - Track the active context, clearing the previous keybuffer on a switch.
//! - Report aborted outcomes to the host notifier per `ResolverPolicy`.
//!
//! Does NOT handle:
//! - Invoking actions (`Dispatch::invoke` is the caller's call).
//! - Reading keymap files (see `keymap.rs`).
//!
//! Invariants:
//! - Registration and feeding against a never-created context fail with
//!   `KeymapError::UnknownContext`.
//! - At most one context has a non-empty keybuffer.

use std::collections::BTreeMap;
use std::fmt;

use keychord_config::UnboundPolicy;
use tracing::{debug, warn};

use crate::action::ActionRef;
use crate::binding::{BindOptions, Binding};
use crate::context::Context;
use crate::direction::Direction;
use crate::dispatch::{
    AbortReason, Notification, NotificationLevel, Notifier, Outcome, TracingNotifier,
};
use crate::error::KeymapError;
use crate::key::{KeySequence, KeyToken, parse_keys};
use crate::keybuffer::{Keybuffer, ResolverPolicy};
use crate::telemetry;

pub struct ContextRegistry {
    contexts: BTreeMap<String, Context>,
    active: Option<String>,
    policy: ResolverPolicy,
    notifier: Box<dyn Notifier>,
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::new(ResolverPolicy::default())
    }
}

impl fmt::Debug for ContextRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextRegistry")
            .field("contexts", &self.contexts.keys().collect::<Vec<_>>())
            .field("active", &self.active)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ContextRegistry {
    /// An empty registry that reports notifications to the tracing log.
    pub fn new(policy: ResolverPolicy) -> Self {
        Self {
            contexts: BTreeMap::new(),
            active: None,
            policy,
            notifier: Box::new(TracingNotifier),
        }
    }

    /// Send notifications to `notifier` instead of the tracing log.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn policy(&self) -> &ResolverPolicy {
        &self.policy
    }

    /// The context named `name`, created empty on first use.
    pub fn get_or_create(&mut self, name: &str) -> &mut Context {
        self.contexts
            .entry(name.to_string())
            .or_insert_with(|| Context::new(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.contexts.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }

    /// Name of the context that received the last token.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn context(&self, name: &str) -> Result<&Context, KeymapError> {
        self.contexts
            .get(name)
            .ok_or_else(|| KeymapError::UnknownContext(name.to_string()))
    }

    fn context_mut(&mut self, name: &str) -> Result<&mut Context, KeymapError> {
        self.contexts
            .get_mut(name)
            .ok_or_else(|| KeymapError::UnknownContext(name.to_string()))
    }

    /// Bind every spec in `keys` to `action`. All specs are parsed before
    /// anything is stored, so a parse error leaves the context unchanged.
    ///
    /// Returns the number of sequences stored after `<dir>` expansion.
    pub fn bind(
        &mut self,
        context: &str,
        keys: &[&str],
        action: ActionRef,
        options: BindOptions,
    ) -> Result<usize, KeymapError> {
        let sequences = keys
            .iter()
            .map(|spec| parse_keys(spec))
            .collect::<Result<Vec<_>, _>>()?;
        let depth = self.policy.max_alias_depth;
        let ctx = self.context_mut(context)?;

        let mut stored = 0;
        for seq in &sequences {
            stored += ctx.bind(seq, action.clone(), options, depth)?;
        }
        Ok(stored)
    }

    pub fn bind_direction(
        &mut self,
        context: &str,
        keys: &str,
        direction: Direction,
    ) -> Result<(), KeymapError> {
        let keys = parse_keys(keys)?;
        self.context_mut(context)?.bind_direction(&keys, direction)
    }

    pub fn alias_direction(
        &mut self,
        context: &str,
        keys: &str,
        target: &str,
    ) -> Result<(), KeymapError> {
        let keys = parse_keys(keys)?;
        let target = parse_keys(target)?;
        self.context_mut(context)?.alias_direction(&keys, &target)
    }

    pub fn alias(&mut self, context: &str, keys: &str, target: &str) -> Result<(), KeymapError> {
        let keys = parse_keys(keys)?;
        let target = parse_keys(target)?;
        self.context_mut(context)?.alias(&keys, &target)
    }

    /// Remove a binding from `context` only. Returns how many sequences went.
    pub fn unbind(&mut self, context: &str, keys: &str) -> Result<usize, KeymapError> {
        let keys = parse_keys(keys)?;
        Ok(self.context_mut(context)?.unbind(&keys))
    }

    pub fn unbind_direction(&mut self, context: &str, keys: &str) -> Result<bool, KeymapError> {
        let keys = parse_keys(keys)?;
        Ok(self.context_mut(context)?.unbind_direction(&keys))
    }

    /// Copy `source`'s bindings and directions into `target`. Later merges
    /// win on conflicting sequences.
    pub fn merge_context(&mut self, target: &str, source: &str) -> Result<(), KeymapError> {
        let source_ctx = self.context(source)?.clone();
        self.context_mut(target)?.merge_from(&source_ctx);
        debug!(into = target, from = source, "Merged context");
        Ok(())
    }

    /// Make `context` the active one, clearing the previous context's keybuffer.
    pub fn activate(&mut self, context: &str) -> Result<(), KeymapError> {
        if !self.contains(context) {
            return Err(KeymapError::UnknownContext(context.to_string()));
        }
        if self.active.as_deref() == Some(context) {
            return Ok(());
        }

        if let Some(previous) = self.active.take()
            && let Some(ctx) = self.contexts.get_mut(&previous)
        {
            ctx.clear_keybuffer();
        }
        debug!(context, "Switched active context");
        telemetry::record_context_switch();
        self.active = Some(context.to_string());
        Ok(())
    }

    /// Feed one token to `context`, activating it first.
    pub fn feed_token(&mut self, context: &str, token: KeyToken) -> Result<Outcome, KeymapError> {
        self.activate(context)?;
        let ctx = self
            .contexts
            .get_mut(context)
            .ok_or_else(|| KeymapError::UnknownContext(context.to_string()))?;
        let outcome = ctx.feed(token, &self.policy);

        telemetry::record_outcome(&outcome);
        self.report(context, token, &outcome);
        Ok(outcome)
    }

    fn report(&self, context: &str, token: KeyToken, outcome: &Outcome) {
        match outcome {
            Outcome::Dispatched(dispatch) => debug!(
                context,
                action = dispatch.action.name(),
                keys = %dispatch.invocation.matched_keys,
                count = ?dispatch.invocation.repeat_count,
                "Dispatching action"
            ),
            Outcome::Aborted(AbortReason::AliasCycle { keys }) => {
                warn!(context, keys = %keys, "Alias cycle while resolving keys");
                self.notifier.notify(Notification {
                    level: NotificationLevel::Error,
                    message: format!("Alias cycle at '{keys}' in context '{context}'"),
                });
            }
            Outcome::Aborted(reason @ AbortReason::NoBinding { .. }) => {
                debug!(context, %reason, "Aborted key sequence");
                if self.policy.unbound == UnboundPolicy::Notify {
                    self.notifier.notify(Notification {
                        level: NotificationLevel::Warning,
                        message: format!("{reason} in context '{context}'"),
                    });
                }
            }
            other => debug!(context, token = %token, outcome = other.label(), "Fed key token"),
        }
    }

    /// Discard whatever `context` has buffered. Returns true if it held keys.
    pub fn cancel(&mut self, context: &str) -> Result<bool, KeymapError> {
        let ctx = self.context_mut(context)?;
        let pending = !ctx.keybuffer().is_empty();
        ctx.clear_keybuffer();
        Ok(pending)
    }

    /// The keys buffered in `context`.
    pub fn pending(&self, context: &str) -> Result<&Keybuffer, KeymapError> {
        Ok(self.context(context)?.keybuffer())
    }

    /// The `<bg>` hint for the prefix buffered in `context`.
    pub fn hint(&self, context: &str) -> Result<Option<&Binding>, KeymapError> {
        Ok(self.context(context)?.hint())
    }

    /// Keys that can follow the prefix buffered in `context`.
    pub fn continuations(
        &self,
        context: &str,
    ) -> Result<Vec<(KeyToken, Option<&Binding>)>, KeymapError> {
        Ok(self.context(context)?.continuations())
    }

    /// Every binding in `context`, in key order.
    pub fn bindings(&self, context: &str) -> Result<Vec<(KeySequence, &Binding)>, KeymapError> {
        Ok(self.context(context)?.bindings().entries())
    }
}
