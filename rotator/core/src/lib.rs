//! txt-rotate Core - Headless Rotating-Text Animation
//!
//! This crate animates a typewriter-style "rotating text" effect for a small
//! set of display elements: each element types one of its candidate strings
//! character by character, pauses, deletes it, and moves on to the next.
//! It is independent of any rendering surface; a terminal UI, a web page or
//! a test harness supplies the [`RenderTarget`]s.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         StateStore                            │
//! │   BTreeMap<ElementId, ElementState>     GlobalPhase           │
//! │   subscribers: Vec<TickHandler>         Scheduler (Rc<dyn>)   │
//! └───────┬───────────────────┬───────────────────┬──────────────┘
//!         │ tick              │ tick              │ tick
//!  ┌──────▼──────┐     ┌──────▼──────┐     ┌──────▼──────┐
//!  │ Driver #0   │     │ Driver #1   │     │ Driver #2   │
//!  │ step loop   │     │ step loop   │     │ step loop   │
//!  └──────┬──────┘     └──────┬──────┘     └──────┬──────┘
//!         ▼                   ▼                   ▼
//!   RenderTarget        RenderTarget        RenderTarget
//! ```
//!
//! Every element runs its own loop at its own pace. When the last element
//! goes idle the store flips the global phase for all of them at once and,
//! after a short pause, ticks again.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::rc::Rc;
//! use txt_rotate_core::{load_config, MemoryTarget, Rotator, TokioScheduler};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let local = tokio::task::LocalSet::new();
//!     local.run_until(async move {
//!         let rotator = Rotator::from_config(&config, Rc::new(TokioScheduler::new()), |_| {
//!             Rc::new(MemoryTarget::new())
//!         });
//!         for err in rotator.skipped() {
//!             eprintln!("skipped: {err}");
//!         }
//!         rotator.start();
//!         std::future::pending::<()>().await;
//!         Ok(())
//!     }).await
//! }
//! ```
//!
//! # Threading
//!
//! Everything here is single-threaded (`Rc` + `RefCell`). Run it on a
//! `current_thread` runtime inside a `LocalSet`, or drive it by hand with
//! [`ManualScheduler`].

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod config;
pub mod driver;
pub mod element;
pub mod error;
pub mod launch;
pub mod render;
pub mod scheduler;
pub mod store;
pub mod timing;

pub use config::{
    default_config_path, load_config, load_config_from_path, parse_rotate_attribute,
    ConfigError, ConfigOverrides, ConfigSource, ElementConfig, RotatorConfig, RotatorToml,
};
pub use driver::{AnimationDriver, StepOutcome};
pub use element::{ElementId, ElementInit, ElementPatch, ElementState, Mode};
pub use error::{RenderError, Result, RotateError};
pub use launch::Rotator;
pub use render::{escape_html, MemoryTarget, RenderFrame, RenderTarget, WRAP_CLASS};
pub use scheduler::{ManualScheduler, Scheduler, Task, TokioScheduler};
pub use store::{StateStore, TickHandler};
pub use timing::{step_delay, PeriodPolicy, Timing};
