//! txt-rotate TUI Entry Point
//!
//! Usage:
//!   txt-rotate-tui [OPTIONS]
//!
//! Options:
//!   -c, --config <PATH>        Configuration file
//!   -r, --rotate <JSON>        Element candidates, e.g. '["cat","dogs"]' (repeatable)
//!   --period-ms <MS>           Period for every element
//!   --plain                    Print frame markup instead of the full-screen view
//!   --log-file <PATH>          Write logs to a file
//!
//! `RUST_LOG` controls the log level.

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::rc::Rc;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::task::LocalSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use txt_rotate_core::{ElementId, RenderTarget, Rotator, RotatorConfig, TokioScheduler};
use txt_rotate_tui::{App, Args, DisplayLines, PlainTarget};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = args.resolve_config()?;
    let local = LocalSet::new();

    if args.plain {
        let out = Rc::new(RefCell::new(io::stdout()));
        let rotator = launch(&config, |_| {
            Rc::new(PlainTarget::new(Rc::clone(&out))) as Rc<dyn RenderTarget>
        })?;
        return local.run_until(run_plain(rotator)).await;
    }

    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: txt-rotate-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("Use --plain to print frames to a pipe or log instead.");
        std::process::exit(1);
    }

    // Wire elements before taking over the screen so skip warnings stay visible
    let lines = DisplayLines::new(config.elements.len());
    let rotator = launch(&config, |id| lines.target(id))?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = local.run_until(run_tui(&mut terminal, lines, rotator)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Install the tracing subscriber
///
/// The full-screen view owns the terminal, so it only logs when a file is
/// given; `--plain` logs to stderr otherwise.
fn init_logging(args: &Args) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("txt_rotate_tui=info".parse()?)
        .add_directive("txt_rotate_core=info".parse()?);

    if let Some(ref path) = args.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .with(filter)
            .init();
    } else if args.plain {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .with(filter)
            .init();
    }

    Ok(())
}

/// Build the rotator, reporting elements that were rejected
///
/// Only a configuration where every element is malformed is fatal.
fn launch<F>(config: &RotatorConfig, make_target: F) -> anyhow::Result<Rotator>
where
    F: FnMut(ElementId) -> Rc<dyn RenderTarget>,
{
    let rotator = Rotator::from_config(config, Rc::new(TokioScheduler::new()), make_target);
    for err in rotator.skipped() {
        eprintln!("Warning: {err}; element skipped");
    }
    if rotator.is_empty() {
        anyhow::bail!("none of the {} configured elements is valid", config.elements.len());
    }
    Ok(rotator)
}

async fn run_tui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    lines: DisplayLines,
    rotator: Rotator,
) -> anyhow::Result<()> {
    rotator.start();

    let mut app = App::new(lines, Rc::clone(rotator.store()));
    app.run(terminal).await
}

async fn run_plain(rotator: Rotator) -> anyhow::Result<()> {
    rotator.start();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    tracing::info!(restarts = rotator.store().restart_count(), "Interrupted");
    Ok(())
}
