//! Integration Test: Core Independence
//!
//! **Policy**: `txt-rotate-core` is headless. It must not depend on terminal
//! or UI crates, and its production code propagates errors instead of
//! panicking on them.

use std::fs;

use architectural_enforcement::{find_violations, production_sources, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm", "unicode-width"];

#[test]
fn test_core_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("rotator/core/Cargo.toml"))
        .expect("core manifest should exist");

    let offenders: Vec<&str> = UI_CRATES
        .iter()
        .copied()
        .filter(|name| {
            manifest
                .lines()
                .any(|line| line.trim_start().starts_with(&format!("{name} =")))
        })
        .collect();

    assert!(
        offenders.is_empty(),
        "txt-rotate-core must stay headless, found: {offenders:?}"
    );
}

#[test]
fn test_core_sources_do_not_import_ui() {
    let files = production_sources("rotator/core/src");
    let violations = find_violations(&files, &["ratatui::", "crossterm::"]);
    assert!(violations.is_empty(), "UI imports in core: {violations:#?}");
}

#[test]
fn test_no_unwrap_in_core_production_code() {
    let files = production_sources("rotator/core/src");
    let violations = find_violations(&files, &[".unwrap()", ".expect("]);
    assert!(
        violations.is_empty(),
        "unwrap/expect in core production code: {violations:#?}"
    );
}
