//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No blocking sleeps; only the scheduler may wait on timers
//! - The core stays free of terminal/UI dependencies
//! - No `unwrap()`/`expect()` in core production code
//!
//! These tests are designed to catch violations early in the development cycle.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, resolved from this package's manifest directory
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// A production source file, already split into lines
pub struct SourceFile {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// Lines before the first `#[cfg(test)]`
    pub production_lines: Vec<String>,
}

/// Every `.rs` file under `dir` (relative to the workspace root)
///
/// Everything from the first `#[cfg(test)]` onwards is treated as test code
/// and left out of `production_lines`.
pub fn production_sources(dir: &str) -> Vec<SourceFile> {
    let root = workspace_root();
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(root.join(dir))
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };

        let production_lines = content
            .lines()
            .take_while(|line| !line.trim_start().starts_with("#[cfg(test)]"))
            .map(str::to_string)
            .collect();

        files.push(SourceFile {
            path: path.strip_prefix(&root).unwrap_or(path).to_path_buf(),
            production_lines,
        });
    }

    files
}

/// The code part of a line, without a trailing `//` comment
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Lines of `files` whose code contains any of `patterns`
pub fn find_violations(files: &[SourceFile], patterns: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in files {
        for (idx, line) in file.production_lines.iter().enumerate() {
            let code = code_part(line);
            if patterns.iter().any(|p| code.contains(p)) {
                violations.push(format!(
                    "{}:{} - {}",
                    file.path.display(),
                    idx + 1,
                    line.trim()
                ));
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_part_strips_comment() {
        assert_eq!(code_part("let x = 1; // sleep(1)"), "let x = 1; ");
        assert_eq!(code_part("/// docs"), "");
    }

    #[test]
    fn test_find_violations() {
        let files = vec![SourceFile {
            path: PathBuf::from("src/lib.rs"),
            production_lines: vec![
                "fn a() {".to_string(),
                "    std::thread::sleep(d);".to_string(),
                "    // std::thread::sleep(d);".to_string(),
                "}".to_string(),
            ],
        }];
        let violations = find_violations(&files, &["thread::sleep("]);
        assert_eq!(violations, vec!["src/lib.rs:2 - std::thread::sleep(d);"]);
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
