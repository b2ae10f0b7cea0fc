//! Command dispatch logic.
//!
//! Responsibilities:
//! - Open the session (settings + keymap + registry) each command needs.
//! - Route parsed CLI arguments to the matching command handler.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Logging setup and exit codes (see `main()`).

use anyhow::Result;
use keychord_core::Notification;

use crate::args::{Cli, Commands};
use crate::commands;
use crate::session::{self, stderr_notifier};

/// Dispatch CLI commands to their respective handlers.
pub(crate) async fn run_command(cli: Cli) -> Result<()> {
    let format = cli.format;
    match &cli.command {
        Commands::Feed { context, keys } => {
            let mut session = session::open(&cli, stderr_notifier)?;
            commands::feed::run(&mut session.registry, context, keys, format)?;
        }
        Commands::List { context } => {
            let session = session::open(&cli, stderr_notifier)?;
            commands::list::run(&session.registry, context.as_deref(), format)?;
        }
        Commands::Hints { context, prefix } => {
            let session = session::open(&cli, stderr_notifier)?;
            commands::hints::run(&session.registry, context, prefix, format)?;
        }
        Commands::Check => {
            let session = session::open(&cli, stderr_notifier)?;
            commands::check::run(&session, format)?;
        }
        Commands::Interactive { context, .. } => {
            let raw_notifier = |n: Notification| eprint!("{}: {}\r\n", n.level, n.message);
            let mut session = session::open(&cli, raw_notifier)?;
            commands::interactive::run(&mut session.registry, context, format).await?;
        }
    }
    Ok(())
}
