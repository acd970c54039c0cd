//! txt-rotate TUI - Terminal surface for the rotating-text core
//!
//! Shows every configured element as one line of typewriter text.
//!
//! # Architecture
//!
//! - **Surface**: render targets (shared display lines, plain printer)
//! - **App**: draw/event loop on the same `LocalSet` as the drivers
//! - **Cli**: flags layered over the TOML/env configuration
//! - **Theme**: per-mode colors

pub mod app;
pub mod cli;
pub mod surface;
pub mod theme;

pub use app::App;
pub use cli::Args;
pub use surface::{DisplayLine, DisplayLines, LineTarget, PlainTarget};
