//! Resolver outcomes and the invocation bundle handed to actions.

use std::fmt;

use serde::Serialize;

use crate::action::ActionRef;
use crate::direction::Direction;

/// Everything an action learns about the keys that triggered it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Number typed before the keys, if any.
    pub repeat_count: Option<u32>,
    /// Movement resolved from the direction keys of a `<dir>` binding.
    pub direction: Option<Direction>,
    /// The keys that matched, without count digits.
    pub matched_keys: String,
    /// Static arguments recorded with the binding.
    pub args: Vec<String>,
}

/// A resolved binding ready to be delivered to its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub action: ActionRef,
    pub invocation: Invocation,
}

impl Dispatch {
    /// Deliver the invocation. Failures belong to the caller to surface.
    pub fn invoke(&self) -> anyhow::Result<()> {
        self.action.invoke(&self.invocation)
    }
}

/// Why the keybuffer was discarded without dispatching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The typed keys are not a prefix of any binding.
    NoBinding { keys: String },
    /// The cancel key was pressed mid-sequence.
    Cancelled,
    /// An alias chain looped or ran too deep.
    AliasCycle { keys: String },
}

impl AbortReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoBinding { .. } => "no_binding",
            Self::Cancelled => "cancelled",
            Self::AliasCycle { .. } => "alias_cycle",
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBinding { keys } => write!(f, "no binding for '{keys}'"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::AliasCycle { keys } => write!(f, "alias cycle at '{keys}'"),
        }
    }
}

/// Result of feeding one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The token left resolver state untouched.
    None,
    /// A partial match; more keys are needed.
    Waiting,
    Dispatched(Dispatch),
    Aborted(AbortReason),
}

impl Outcome {
    /// Fixed label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Waiting => "waiting",
            Self::Dispatched(_) => "dispatched",
            Self::Aborted(_) => "aborted",
        }
    }

    pub fn dispatch(&self) -> Option<&Dispatch> {
        match self {
            Self::Dispatched(dispatch) => Some(dispatch),
            _ => None,
        }
    }
}

/// Severity of a message for the host's notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// The host's notification channel (status bar, log pane, ...).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<F> Notifier for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification)
    }
}

/// Notifier that writes to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let message = notification.message;
        match notification.level {
            NotificationLevel::Info => tracing::info!("{message}"),
            NotificationLevel::Warning => tracing::warn!("{message}"),
            NotificationLevel::Error => tracing::error!("{message}"),
        }
    }
}
