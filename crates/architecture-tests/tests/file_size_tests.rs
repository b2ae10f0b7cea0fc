//! Architecture tests for file size limits.
//!
//! - Files >500 LOC are reported (warning logged)
//! - Files >800 LOC are presumed mis-scoped (test failure)
//!
//! Walks every .rs file under crates/ and counts non-blank, non-comment lines.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

const WARNING_THRESHOLD: usize = 500;
const FAILURE_THRESHOLD: usize = 800;

/// Files excluded from size checks, as (path_suffix, justification).
const EXCLUDED_FILES: &[(&str, &str)] = &[];

#[test]
fn file_size_limits() {
    let workspace_root = find_workspace_root();
    let crates_dir = workspace_root.join("crates");
    assert!(
        crates_dir.exists(),
        "crates/ directory not found at {:?}",
        crates_dir
    );

    let rust_files = find_rust_files(&crates_dir);
    let mut failures = Vec::new();
    let mut warnings = Vec::new();

    for file_path in &rust_files {
        let loc = count_loc(file_path);
        let relative = file_path.strip_prefix(&workspace_root).unwrap_or(file_path);
        let relative = relative.to_string_lossy().to_string();

        let is_excluded = EXCLUDED_FILES
            .iter()
            .any(|(suffix, _)| relative.ends_with(suffix));

        if loc > FAILURE_THRESHOLD && !is_excluded {
            failures.push((relative, loc));
        } else if loc > WARNING_THRESHOLD {
            warnings.push((relative, loc));
        }
    }

    for (path, loc) in &warnings {
        eprintln!("[architecture] {path}: {loc} LOC (warning threshold {WARNING_THRESHOLD})");
    }

    assert!(
        failures.is_empty(),
        "Files exceeding {} LOC must be split or added to EXCLUDED_FILES with a justification:\n{}",
        FAILURE_THRESHOLD,
        failures
            .iter()
            .map(|(path, loc)| format!("  - {path}: {loc} lines"))
            .collect::<Vec<_>>()
            .join("\n")
    );

    eprintln!(
        "[architecture] Checked {} Rust files for size limits.",
        rust_files.len()
    );
}

/// Count lines of code, skipping blank lines, `//` comments and block-comment
/// continuation lines starting with `*`.
fn count_loc(path: &Path) -> usize {
    let content = fs::read_to_string(path).expect("Failed to read file");
    let mut count = 0;
    let mut in_block_comment = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with("/*") {
            in_block_comment = true;
        }
        if trimmed.ends_with("*/") {
            in_block_comment = false;
            continue;
        }
        if (in_block_comment && trimmed.starts_with('*')) || trimmed.starts_with("//") {
            continue;
        }

        count += 1;
    }

    count
}

/// All .rs files under `dir`, skipping build output and this crate.
fn find_rust_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name();
            name != "target" && name != "architecture-tests"
        })
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|e| e.into_path())
        .collect()
}

/// Find the workspace root by looking for Cargo.toml with [workspace].
fn find_workspace_root() -> PathBuf {
    let current_dir = std::env::current_dir().expect("Failed to get current directory");

    let mut dir = current_dir.as_path();
    loop {
        let cargo_toml = dir.join("Cargo.toml");
        if let Ok(content) = fs::read_to_string(&cargo_toml)
            && content.contains("[workspace]")
        {
            return dir.to_path_buf();
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => return current_dir,
        }
    }
}

#[test]
fn test_count_loc_basic() {
    let dir = tempfile::tempdir().unwrap();
    let test_file = dir.path().join("basic.rs");
    fs::write(
        &test_file,
        r#"// This is a comment
fn main() {
    let x = 5; // inline comment

    // Another comment
    println!("Hello");
}
"#,
    )
    .unwrap();

    assert_eq!(count_loc(&test_file), 4);
}

#[test]
fn test_count_loc_skips_doc_and_block_comments() {
    let dir = tempfile::tempdir().unwrap();
    let test_file = dir.path().join("docs.rs");
    fs::write(
        &test_file,
        r#"//! Module documentation

/*
 * block
 */
/// Function documentation
fn test() {
    let x = 1;
}
"#,
    )
    .unwrap();

    assert_eq!(count_loc(&test_file), 3);
}

#[test]
fn test_find_rust_files_skips_target() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("core/src")).unwrap();
    fs::create_dir_all(dir.path().join("target/debug")).unwrap();
    fs::write(dir.path().join("core/src/lib.rs"), "").unwrap();
    fs::write(dir.path().join("target/debug/build.rs"), "").unwrap();
    fs::write(dir.path().join("core/Cargo.toml"), "").unwrap();

    let files = find_rust_files(dir.path());
    assert_eq!(files, vec![dir.path().join("core/src/lib.rs")]);
}
