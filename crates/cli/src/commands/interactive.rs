//! Interactive command: a raw-mode session fed from terminal key events.
//!
//! Responsibilities:
//! - Put the terminal in raw mode and restore it on every exit path.
//! - Read crossterm events from an async `EventStream` and feed key presses.
//! - Print each outcome, plus the `<bg>` hint when a prefix is pending.
//!
//! Does NOT handle:
//! - Logging setup (file logging is installed in `main()` for this command).
//!
//! Invariants:
//! - Ctrl-C with nothing pending ends the session; with keys pending it is
//!   fed like any other key.
//! - Output lines end in `\r\n` because raw mode disables newline translation.

use std::io::Write;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures_util::StreamExt;
use keychord_core::{ContextRegistry, KeyToken, key_token_from_event};

use crate::formatters::{FedKey, OutputFormat, format_fed_key};

/// Disables raw mode when dropped.
///
/// Must be created right after raw mode is enabled; `Drop` must not panic.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enable() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn print_line(line: &str) -> Result<()> {
    let mut out = std::io::stdout();
    write!(out, "{line}\r\n")?;
    out.flush()?;
    Ok(())
}

pub async fn run(registry: &mut ContextRegistry, context: &str, format: OutputFormat) -> Result<()> {
    // Fail before touching the terminal if the context does not exist.
    registry.activate(context)?;

    let _guard = TerminalGuard::enable()?;
    print_line(&format!(
        "keychord: feeding '{context}', Ctrl-C with nothing pending quits"
    ))?;

    let quit = KeyToken::ctrl('c');
    let mut events = EventStream::new();

    while let Some(event) = events.next().await {
        let event = event.context("Failed to read terminal event")?;
        let Event::Key(key) = event else {
            continue;
        };
        let Some(token) = key_token_from_event(&key) else {
            continue;
        };

        if token == quit && registry.pending(context)?.is_empty() {
            break;
        }

        let outcome = registry.feed_token(context, token)?;
        if let Some(dispatch) = outcome.dispatch()
            && let Err(e) = dispatch.invoke()
        {
            tracing::warn!(action = dispatch.action.name(), error = %e, "Action failed");
        }
        print_line(&format_fed_key(&FedKey::new(token, &outcome), format)?)?;

        if let Some(hint) = registry.hint(context)? {
            print_line(&format!("  hint: {hint}"))?;
        }
    }

    tracing::info!(context, "Interactive session ended");
    Ok(())
}
