//! Shared test utilities for keychord integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Point the settings file at a path that does not exist.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - Without overrides the built-in keymap and default settings are used.

use assert_cmd::Command;

/// Returns a hermetic `keychord` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - `KEYCHORD_CONFIG_PATH` names a missing file, so no user settings apply.
/// - Other `KEYCHORD_*` variables are cleared to ensure no leakage from the host.
pub fn keychord_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("keychord");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");
    cmd.env("KEYCHORD_CONFIG_PATH", "/nonexistent/keychord/config.json");

    // Clear potential host leakage
    cmd.env_remove("KEYCHORD_CANCEL_KEY")
        .env_remove("KEYCHORD_UNBOUND_POLICY")
        .env_remove("KEYCHORD_MAX_ALIAS_DEPTH")
        .env_remove("KEYCHORD_KEYMAP")
        .env_remove("RUST_LOG");

    cmd
}

/// Write `contents` to `name` inside `dir` and return the path.
#[allow(dead_code)]
pub fn write_file(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
