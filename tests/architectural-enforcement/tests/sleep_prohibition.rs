//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Nothing blocks the single animation thread. Waiting happens
//! only inside the scheduler (`tokio::time::sleep` in `TokioScheduler`);
//! the TUI paces its redraws with `tokio::time::interval`.
//! **Exceptions**: test code

use architectural_enforcement::{find_violations, production_sources};

#[test]
fn test_no_blocking_sleep_anywhere() {
    let mut files = production_sources("rotator/core/src");
    files.extend(production_sources("tui/src"));
    assert!(!files.is_empty(), "no sources found; wrong workspace root?");

    let violations = find_violations(&files, &["thread::sleep("]);
    report("Blocking std::thread::sleep", &violations);
}

#[test]
fn test_only_scheduler_awaits_sleep() {
    let mut files = production_sources("rotator/core/src");
    files.extend(production_sources("tui/src"));
    files.retain(|f| !f.path.ends_with("rotator/core/src/scheduler.rs"));

    let violations = find_violations(&files, &["::sleep(", ".sleep("]);
    report("Sleep outside the scheduler", &violations);
}

fn report(title: &str, violations: &[String]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ CRITICAL: {title}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    eprintln!("\n✅ ACCEPTABLE:");
    eprintln!("  - Scheduler::schedule(delay, task) for continuations");
    eprintln!("  - tokio::time::interval() for redraw pacing");
    eprintln!("  - Test code (after #[cfg(test)])");

    panic!(
        "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
        violations.len()
    );
}
