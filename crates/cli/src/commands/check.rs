//! Check command: report what the configured keymap registered.
//!
//! Loading already validated the keymap; reaching this command means every
//! key spec parsed, every action resolved and every merge found its source.

use anyhow::Result;

use crate::formatters::{CheckReport, OutputFormat, format_check};
use crate::session::Session;

pub fn run(session: &Session, format: OutputFormat) -> Result<()> {
    let report = CheckReport {
        source: session.source.to_string(),
        summary: session.summary,
    };
    print!("{}", format_check(&report, format)?);
    Ok(())
}
