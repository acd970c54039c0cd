//! Animation Driver
//!
//! One driver per element. A tick starts a self-rescheduling step loop that
//! adds or removes one character per step until the element shows its full
//! candidate (typing) or nothing (deleting); the driver then reports the
//! element idle and waits for the next tick.
//!
//! ```text
//! Typing ──full candidate──▶ Idle ──restart──▶ Deleting ──empty──▶ Idle ──restart──▶ Typing …
//! ```

use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::{debug, error, trace, warn};

use crate::element::{char_prefix, ElementId, ElementPatch, Mode};
use crate::error::Result;
use crate::render::RenderFrame;
use crate::store::StateStore;
use crate::timing::step_delay;

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The element was idle; nothing changed
    Skipped,
    /// A character was added or removed and another step is scheduled
    Continued,
    /// The phase finished and the element is now idle
    Finished,
}

/// Drives one element's character-by-character progress
///
/// Holds only a weak reference to the store: the store's subscriber list
/// owns the driver, never the other way round.
pub struct AnimationDriver {
    id: ElementId,
    store: Weak<StateStore>,
    this: Weak<AnimationDriver>,
    steps: Cell<u64>,
}

impl AnimationDriver {
    /// Bind a driver to `id` and subscribe it to the store's tick
    ///
    /// # Errors
    ///
    /// [`RotateError::NotFound`](crate::RotateError::NotFound) if `id` is
    /// not registered; a driver is never attached to a missing element.
    pub fn attach(id: ElementId, store: &Rc<StateStore>) -> Result<Rc<Self>> {
        store.read(id)?;

        let driver = Rc::new_cyclic(|this| Self {
            id,
            store: Rc::downgrade(store),
            this: this.clone(),
            steps: Cell::new(0),
        });

        let subscribed = Rc::clone(&driver);
        store.subscribe(move || subscribed.run_step());

        debug!(id = %id, "Driver attached");
        Ok(driver)
    }

    /// Element this driver animates
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Steps that changed the element's text so far
    pub fn steps_taken(&self) -> u64 {
        self.steps.get()
    }

    /// Advance the element by one character
    ///
    /// Schedules the next step unless the phase just finished. A step on an
    /// idle element, or after the store was dropped, does nothing.
    ///
    /// # Errors
    ///
    /// Propagates [`RotateError::NotFound`](crate::RotateError::NotFound)
    /// from the store.
    pub fn step(&self) -> Result<StepOutcome> {
        let Some(store) = self.store.upgrade() else {
            return Ok(StepOutcome::Skipped);
        };

        let state = store.read(self.id)?;
        let mode = state.mode;
        if mode == Mode::Idle {
            trace!(id = %self.id, "Step on idle element");
            return Ok(StepOutcome::Skipped);
        }

        let active = state.active_candidate();
        let new_len = state.text_len().saturating_add_signed(mode.direction());
        let new_text = char_prefix(active, new_len).to_string();

        store.update(self.id, ElementPatch::text(new_text.clone()))?;
        self.steps.set(self.steps.get() + 1);

        let frame = RenderFrame {
            id: self.id,
            text: &new_text,
            mode,
        };
        if let Err(e) = state.target.render(&frame) {
            warn!(id = %self.id, error = %e, "Render target rejected frame");
        }

        if new_text == active || new_text.is_empty() {
            debug!(id = %self.id, mode = %mode, text = %new_text, "Phase complete");
            store.update(self.id, ElementPatch::mode(Mode::Idle))?;
            return Ok(StepOutcome::Finished);
        }

        let delay = step_delay(state.period, active.chars().count(), mode);
        trace!(
            id = %self.id,
            text = %new_text,
            delay_ms = delay.as_millis() as u64,
            "Step"
        );

        let this = self.this.clone();
        store.scheduler().schedule(
            delay,
            Box::new(move || {
                if let Some(driver) = this.upgrade() {
                    driver.run_step();
                }
            }),
        );
        Ok(StepOutcome::Continued)
    }

    /// Step from a callback, where errors can only be logged
    ///
    /// An error stops this element's loop; other elements keep running.
    fn run_step(&self) {
        if let Err(e) = self.step() {
            error!(id = %self.id, error = %e, "Driver stopped");
        }
    }
}

impl std::fmt::Debug for AnimationDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationDriver")
            .field("id", &self.id)
            .field("steps", &self.steps.get())
            .finish_non_exhaustive()
    }
}
