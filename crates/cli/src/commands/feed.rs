//! Feed command: push key specs through one context.
//!
//! Responsibilities:
//! - Parse every KEYS argument before feeding anything.
//! - Feed each token, invoke dispatched actions and print one line per token.
//!
//! Does NOT handle:
//! - Terminal input (see `interactive`).

use std::io::Write;

use anyhow::{Context, Result};
use keychord_core::{ContextRegistry, KeyToken, parse_keys};

use crate::formatters::{FedKey, OutputFormat, format_fed_key};

pub fn run(
    registry: &mut ContextRegistry,
    context: &str,
    keys: &[String],
    format: OutputFormat,
) -> Result<()> {
    let mut tokens: Vec<KeyToken> = Vec::new();
    for spec in keys {
        let seq = parse_keys(spec).with_context(|| format!("Invalid key spec '{spec}'"))?;
        tokens.extend(seq.iter().copied());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for token in tokens {
        let outcome = registry.feed_token(context, token)?;
        if let Some(dispatch) = outcome.dispatch() {
            dispatch
                .invoke()
                .with_context(|| format!("Action '{}' failed", dispatch.action.name()))?;
        }
        writeln!(out, "{}", format_fed_key(&FedKey::new(token, &outcome), format)?)?;
    }

    let pending = registry.pending(context)?;
    if !pending.is_empty() {
        tracing::debug!(context, keys = pending.tokens().len(), "Keys left pending");
    }
    Ok(())
}
