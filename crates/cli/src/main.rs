//! Keychord CLI - feed key sequences through the file-manager keymap.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Initialize logging (stderr, or a log file for the raw-mode session).
//! - Run the selected command and map failures to structured exit codes.
//!
//! Does NOT handle:
//! - Key resolution itself (see `keychord-core`).
//! - Settings and keymap schemas (see `keychord-config`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide clap defaults.
//! - stdout carries command output only; logs never go there.

mod args;
mod commands;
mod dispatch;
mod error;
mod formatters;
mod session;

use args::{Cli, Commands};
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use keychord_config::ConfigLoader;
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the log subscriber. The returned guard must outlive `main()`'s work.
fn init_logging(cli: &Cli) -> std::io::Result<Option<WorkerGuard>> {
    if let Commands::Interactive { log_dir, .. } = &cli.command {
        // Raw mode owns the terminal, so the session logs to a file.
        std::fs::create_dir_all(log_dir)?;
        let file_appender = tracing_appender::rolling::daily(log_dir, "keychord.log");
        let (writer, guard) = non_blocking(file_appender);
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .init();
        return Ok(Some(guard));
    }

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(None)
}

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::ConfigError.as_i32());
    }

    let cli = Cli::parse();

    let log_guard = match init_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let exit_code = match run_command(cli).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.exit_code()
        }
    };

    // Flush file logs before exiting; process::exit skips destructors.
    drop(log_guard);
    std::process::exit(exit_code.as_i32());
}
