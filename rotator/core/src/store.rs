//! State Store
//!
//! Authoritative per-element animation state plus the tick broadcast that
//! (re)starts every driver.
//!
//! # Restart Protocol
//!
//! ```text
//!  driver A ──update(Idle)──┐
//!  driver B ──update(Idle)──┼──▶ all idle? ──yes──▶ restart()
//!  driver C ──update(Idle)──┘                         │
//!                                   flip phase, set every mode,
//!                                   bump cycle_count (into Typing)
//!                                                     │
//!                              schedule(pause) ───▶ notify_tick()
//!                                                     │
//!                                          every subscriber steps
//! ```
//!
//! The all-idle check runs synchronously inside [`StateStore::update`], so
//! the update that idles the last element is the one that restarts.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};

use crate::element::{ElementId, ElementInit, ElementPatch, ElementState, Mode};
use crate::error::{Result, RotateError};
use crate::scheduler::Scheduler;
use crate::timing::Timing;

/// Handler invoked on every tick
pub type TickHandler = Rc<dyn Fn()>;

/// Shared owner of every element's animation state
///
/// Single-threaded: the store lives behind an `Rc` and every mutation goes
/// through [`update`](Self::update) or [`restart`](Self::restart). No
/// interior borrow is held while subscribers, the scheduler or render
/// targets run.
pub struct StateStore {
    elements: RefCell<BTreeMap<ElementId, ElementState>>,
    /// Mode applied by the most recent restart
    phase: Cell<Mode>,
    subscribers: RefCell<Vec<TickHandler>>,
    scheduler: Rc<dyn Scheduler>,
    timing: Timing,
    started: Cell<bool>,
    restarts: Cell<u64>,
    ticks: Cell<u64>,
    this: Weak<StateStore>,
}

impl StateStore {
    /// Create an empty store
    pub fn new(scheduler: Rc<dyn Scheduler>, timing: Timing) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            elements: RefCell::new(BTreeMap::new()),
            phase: Cell::new(Mode::Typing),
            subscribers: RefCell::new(Vec::new()),
            scheduler,
            timing,
            started: Cell::new(false),
            restarts: Cell::new(0),
            ticks: Cell::new(0),
            this: this.clone(),
        })
    }

    /// Insert an element in [`Mode::Typing`] with `cycle_count = 0` and empty text
    ///
    /// Registering an id twice silently replaces the earlier state; the
    /// launcher registers each id exactly once.
    ///
    /// # Errors
    ///
    /// Rejects an empty candidate list, a list of only empty strings, and a
    /// zero period.
    pub fn register(&self, id: ElementId, init: ElementInit) -> Result<()> {
        if init.candidates.is_empty() {
            return Err(RotateError::EmptyCandidates { id });
        }
        if init.candidates.iter().all(String::is_empty) {
            return Err(RotateError::BlankCandidates { id });
        }
        if init.period.is_zero() {
            return Err(RotateError::InvalidPeriod { id });
        }

        debug!(
            id = %id,
            candidates = init.candidates.len(),
            period_ms = init.period.as_millis() as u64,
            "Registering element"
        );

        let replaced = self
            .elements
            .borrow_mut()
            .insert(id, ElementState::from_init(id, init));
        if replaced.is_some() {
            debug!(id = %id, "Replaced existing element state");
        }
        Ok(())
    }

    /// Snapshot of an element's state
    ///
    /// # Errors
    ///
    /// [`RotateError::NotFound`] if `id` was never registered.
    pub fn read(&self, id: ElementId) -> Result<ElementState> {
        self.elements
            .borrow()
            .get(&id)
            .cloned()
            .ok_or(RotateError::NotFound { id })
    }

    /// Merge `patch` into an element, then restart if every element is idle
    ///
    /// # Errors
    ///
    /// [`RotateError::NotFound`] if `id` was never registered.
    pub fn update(&self, id: ElementId, patch: ElementPatch) -> Result<()> {
        let all_idle = {
            let mut elements = self.elements.borrow_mut();
            let state = elements
                .get_mut(&id)
                .ok_or(RotateError::NotFound { id })?;
            state.apply(patch);
            elements.values().all(ElementState::is_idle)
        };

        if all_idle {
            self.restart();
        }
        Ok(())
    }

    /// Flip the global phase for every element at once and schedule the next tick
    ///
    /// Entering [`Mode::Typing`] advances every element's `cycle_count`.
    /// The tick follows after [`Timing::restart_pause`] for the new mode.
    pub fn restart(&self) {
        let mode = self.phase.get().flipped();
        self.phase.set(mode);

        {
            let mut elements = self.elements.borrow_mut();
            for state in elements.values_mut() {
                if mode == Mode::Typing {
                    state.cycle_count += 1;
                }
                state.mode = mode;
            }
        }

        let count = self.restarts.get() + 1;
        self.restarts.set(count);

        let pause = self.timing.restart_pause(mode);
        info!(
            mode = %mode,
            restart = count,
            pause_ms = pause.as_millis() as u64,
            "Restarting all elements"
        );

        let store = self.this.clone();
        self.scheduler.schedule(
            pause,
            Box::new(move || {
                if let Some(store) = store.upgrade() {
                    store.notify_tick();
                }
            }),
        );
    }

    /// Invoke every subscriber synchronously
    pub fn notify_tick(&self) {
        self.ticks.set(self.ticks.get() + 1);
        // Clone the list so handlers may subscribe (or update) while we iterate.
        let handlers: Vec<TickHandler> = self.subscribers.borrow().clone();
        debug!(subscribers = handlers.len(), tick = self.ticks.get(), "Tick");
        for handler in handlers {
            handler();
        }
    }

    /// Add a tick handler; returns its position in the subscriber list
    pub fn subscribe(&self, handler: impl Fn() + 'static) -> usize {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.push(Rc::new(handler));
        subscribers.len() - 1
    }

    /// Emit the first tick
    ///
    /// Called once after every element is registered; later calls are ignored.
    pub fn start(&self) {
        if self.started.replace(true) {
            warn!("StateStore::start called more than once, ignoring");
            return;
        }
        info!(elements = self.len(), "Starting rotation");
        self.notify_tick();
    }

    /// Whether [`start`](Self::start) has been called
    pub fn is_started(&self) -> bool {
        self.started.get()
    }

    /// Mode applied at the most recent restart ([`Mode::Typing`] before any)
    pub fn phase(&self) -> Mode {
        self.phase.get()
    }

    /// Number of restarts performed
    pub fn restart_count(&self) -> u64 {
        self.restarts.get()
    }

    /// Number of ticks emitted, including the start tick
    pub fn tick_count(&self) -> u64 {
        self.ticks.get()
    }

    /// Number of registered elements
    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    /// Whether no element is registered
    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    /// Registered ids in ascending order
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.borrow().keys().copied().collect()
    }

    /// Number of tick subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Scheduler shared with drivers
    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.scheduler
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("elements", &self.elements.borrow().len())
            .field("phase", &self.phase.get())
            .field("subscribers", &self.subscribers.borrow().len())
            .field("restarts", &self.restarts.get())
            .finish_non_exhaustive()
    }
}
