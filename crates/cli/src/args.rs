//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not load settings or keymaps (see `session` module).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use keychord_config::constants::DEFAULT_CONTEXT;

use crate::formatters::OutputFormat;

#[derive(Parser)]
#[command(name = "keychord")]
#[command(about = "Resolve key sequences against a file-manager keymap", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  keychord feed 5dgg\n  keychord feed --context console 'cd /tmp<cr>'\n  keychord --format json feed 3j\n  keychord list --context pager\n  keychord hints g\n  keychord --keymap my-keys.yaml check\n"
)]
pub struct Cli {
    /// Keymap file (YAML or JSON) used instead of the built-in keymap.
    ///
    /// Can also be set via KEYCHORD_KEYMAP environment variable.
    #[arg(long, global = true, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Path to a custom settings file (overrides default location).
    ///
    /// Can also be set via KEYCHORD_CONFIG_PATH environment variable.
    #[arg(long, global = true, env = "KEYCHORD_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Key that abandons a pending key sequence (e.g. '<esc>', '<C-g>')
    #[arg(long, global = true, value_name = "KEY")]
    pub cancel_key: Option<String>,

    /// Report key sequences that match no binding
    #[arg(long, global = true)]
    pub notify_unbound: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Feed key specs to a context and print one outcome per key
    Feed {
        /// Context the keys are fed to
        #[arg(short, long, default_value = DEFAULT_CONTEXT)]
        context: String,

        /// Key specs, e.g. '5dgg' or 'g<C-l>'; all are fed in order
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// List bindings, directions and hints
    List {
        /// Only list this context
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Show the keys that may follow a prefix
    Hints {
        /// Context the prefix is looked up in
        #[arg(short, long, default_value = DEFAULT_CONTEXT)]
        context: String,

        /// Keys typed so far, e.g. 'g' or 'o'
        prefix: String,
    },

    /// Validate the keymap and report what it registers
    Check,

    /// Read keys from the terminal and print each outcome (Ctrl-C when idle quits)
    Interactive {
        /// Context the keys are fed to
        #[arg(short, long, default_value = DEFAULT_CONTEXT)]
        context: String,

        /// Directory for the session log file
        #[arg(long, default_value = "logs", value_name = "DIR")]
        log_dir: PathBuf,
    },
}
