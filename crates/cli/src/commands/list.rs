//! List command: dump the bindings, directions and hints of contexts.

use anyhow::Result;
use keychord_core::ContextRegistry;

use crate::formatters::{ContextListing, OutputFormat, format_listings};

pub fn run(registry: &ContextRegistry, context: Option<&str>, format: OutputFormat) -> Result<()> {
    let listings = match context {
        Some(name) => vec![ContextListing::new(registry.context(name)?)],
        None => registry
            .names()
            .map(|name| registry.context(name).map(ContextListing::new))
            .collect::<Result<Vec<_>, _>>()?,
    };

    print!("{}", format_listings(&listings, format)?);
    Ok(())
}
