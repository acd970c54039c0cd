//! Start-up Wiring
//!
//! Builds one [`StateStore`] and one [`AnimationDriver`] per configured
//! element, assigning ids `0..n` in configuration order, then emits the
//! first tick on [`Rotator::start`].
//!
//! A malformed element is reported and left out; the remaining elements are
//! wired and animate as usual. A skipped element is never registered, so the
//! all-idle check does not wait on it.

use std::rc::Rc;

use tracing::{info, warn};

use crate::config::RotatorConfig;
use crate::driver::AnimationDriver;
use crate::element::{ElementId, ElementInit};
use crate::error::{Result, RotateError};
use crate::render::RenderTarget;
use crate::scheduler::Scheduler;
use crate::store::StateStore;
use crate::timing::Timing;

/// A store plus the drivers attached to it
#[derive(Debug)]
pub struct Rotator {
    store: Rc<StateStore>,
    drivers: Vec<Rc<AnimationDriver>>,
    skipped: Vec<RotateError>,
    next_id: usize,
}

impl Rotator {
    /// Create an empty rotator
    pub fn new(scheduler: Rc<dyn Scheduler>, timing: Timing) -> Self {
        Self {
            store: StateStore::new(scheduler, timing),
            drivers: Vec::new(),
            skipped: Vec::new(),
            next_id: 0,
        }
    }

    /// Build a rotator for every element in `config`
    ///
    /// `make_target` supplies the render target for each id. Element `n` of
    /// the configuration always gets `ElementId(n)`, even when an earlier
    /// element was skipped; see [`skipped`](Self::skipped).
    pub fn from_config<F>(
        config: &RotatorConfig,
        scheduler: Rc<dyn Scheduler>,
        mut make_target: F,
    ) -> Self
    where
        F: FnMut(ElementId) -> Rc<dyn RenderTarget>,
    {
        let mut rotator = Self::new(scheduler, config.timing);
        for (index, element) in config.elements.iter().enumerate() {
            let id = ElementId(index);
            let init = ElementInit::new(
                element.candidates.clone(),
                config.period_of(index),
                make_target(id),
            );
            if let Err(e) = rotator.insert(id, init) {
                warn!(id = %id, error = %e, "Skipping element");
                rotator.skipped.push(e);
            }
        }
        rotator.next_id = config.elements.len();
        rotator
    }

    /// Register the next element and attach its driver
    ///
    /// # Errors
    ///
    /// Propagates registration validation errors; the id is not consumed.
    pub fn add(&mut self, init: ElementInit) -> Result<ElementId> {
        let id = ElementId(self.next_id);
        self.insert(id, init)?;
        self.next_id += 1;
        Ok(id)
    }

    fn insert(&mut self, id: ElementId, init: ElementInit) -> Result<()> {
        self.store.register(id, init)?;
        self.drivers.push(AnimationDriver::attach(id, &self.store)?);
        Ok(())
    }

    /// Emit the first tick
    pub fn start(&self) {
        info!(
            elements = self.len(),
            skipped = self.skipped.len(),
            "Launching rotator"
        );
        self.store.start();
    }

    /// The shared state store
    pub fn store(&self) -> &Rc<StateStore> {
        &self.store
    }

    /// Drivers in id order
    pub fn drivers(&self) -> &[Rc<AnimationDriver>] {
        &self.drivers
    }

    /// Configured elements that were rejected, in configuration order
    pub fn skipped(&self) -> &[RotateError] {
        &self.skipped
    }

    /// Number of running elements
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Whether no element is running
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}
