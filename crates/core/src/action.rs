//! Action capabilities and the registry that names them.
//!
//! Responsibilities:
//! - Define the `Action` contract a host implements for every bindable operation.
//! - Register capabilities under stable names and hand out `ActionRef`s
//!   carrying per-binding static arguments.
//!
//! Does NOT handle:
//! - Performing file, pager or console operations; those are host code.
//! - Surfacing action failures (the caller of `Dispatch::invoke` does).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::Invocation;
use crate::error::KeymapError;

/// A bindable operation provided by the host application.
pub trait Action: Send + Sync {
    fn invoke(&self, invocation: &Invocation) -> anyhow::Result<()>;
}

impl<F> Action for F
where
    F: Fn(&Invocation) -> anyhow::Result<()> + Send + Sync,
{
    fn invoke(&self, invocation: &Invocation) -> anyhow::Result<()> {
        self(invocation)
    }
}

/// A resolved capability plus the static arguments of one binding.
#[derive(Clone)]
pub struct ActionRef {
    name: String,
    args: Vec<String>,
    action: Arc<dyn Action>,
}

impl ActionRef {
    pub fn new(name: impl Into<String>, action: Arc<dyn Action>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            action,
        }
    }

    /// The same capability with different static arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn invoke(&self, invocation: &Invocation) -> anyhow::Result<()> {
        self.action.invoke(invocation)
    }
}

impl fmt::Debug for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRef")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "({})", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// Two references are equal when they name the same capability with the same
/// arguments.
impl PartialEq for ActionRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

impl Eq for ActionRef {}

/// Named action capabilities, registered once at startup.
#[derive(Default, Clone)]
pub struct Capabilities {
    actions: BTreeMap<String, Arc<dyn Action>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` under `name`, replacing any previous registration.
    pub fn register<A>(&mut self, name: impl Into<String>, action: A) -> &mut Self
    where
        A: Action + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    /// Register one shared action under several names.
    pub fn register_all<'a, I>(&mut self, names: I, action: Arc<dyn Action>) -> &mut Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            self.actions.insert(name.to_string(), Arc::clone(&action));
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Look up a capability by name.
    ///
    /// # Errors
    ///
    /// Returns `KeymapError::UnknownCapability` if nothing was registered
    /// under `name`.
    pub fn resolve(&self, name: &str) -> Result<ActionRef, KeymapError> {
        self.actions
            .get(name)
            .map(|action| ActionRef::new(name, Arc::clone(action)))
            .ok_or_else(|| KeymapError::UnknownCapability(name.to_string()))
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.actions.keys()).finish()
    }
}
