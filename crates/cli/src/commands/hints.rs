//! Hints command: what may follow a typed prefix.
//!
//! Looks the prefix up directly in the context's binding trie, so nothing is
//! fed and no action runs.

use anyhow::{Context, Result};
use keychord_core::{ContextRegistry, parse_keys};

use crate::formatters::{HintReport, OutputFormat, format_hints};

pub fn run(
    registry: &ContextRegistry,
    context: &str,
    prefix: &str,
    format: OutputFormat,
) -> Result<()> {
    let prefix = parse_keys(prefix).with_context(|| format!("Invalid key spec '{prefix}'"))?;
    let bindings = registry.context(context)?.bindings();

    let report = HintReport::new(
        context,
        &prefix,
        bindings.hint(&prefix),
        bindings.continuations(&prefix),
    );
    print!("{}", format_hints(&report, format)?);
    Ok(())
}
