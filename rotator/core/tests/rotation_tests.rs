//! Rotation Integration Tests
//!
//! End-to-end behaviour of the store and drivers together, driven by the
//! virtual-clock scheduler (and once by real tokio timers on a paused clock).
//!
//! # Test Coverage
//!
//! 1. **Phase termination**: typing stops at the full candidate
//! 2. **Round trip**: two elements desynchronize, then resync on restart
//! 3. **Invariants**: prefix and ±1 length change over many cycles
//! 4. **Cycle counting**: candidates rotate only on restarts into typing
//! 5. **Tokio**: the same schedule on real timers

use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio_test::assert_ok;

use txt_rotate_core::{
    AnimationDriver, ElementId, ElementInit, ManualScheduler, MemoryTarget, Mode, Rotator,
    StateStore, StepOutcome, Timing, TokioScheduler,
};

// ============================================================================
// Helpers
// ============================================================================

struct Scene {
    sched: Rc<ManualScheduler>,
    rotator: Rotator,
    targets: Vec<Rc<MemoryTarget>>,
}

impl Scene {
    fn new(elements: &[(&[&str], u64)]) -> Self {
        let sched = Rc::new(ManualScheduler::new());
        let mut rotator = Rotator::new(sched.clone(), Timing::default());
        let mut targets = Vec::new();
        for (candidates, period) in elements {
            let target = Rc::new(MemoryTarget::new());
            assert_ok!(rotator.add(ElementInit::new(
                candidates.iter().map(|s| (*s).to_string()).collect(),
                Duration::from_millis(*period),
                target.clone(),
            )));
            targets.push(target);
        }
        Self {
            sched,
            rotator,
            targets,
        }
    }

    fn store(&self) -> &Rc<StateStore> {
        self.rotator.store()
    }

    fn text(&self, id: usize) -> String {
        self.store().read(ElementId(id)).unwrap().text
    }

    fn mode(&self, id: usize) -> Mode {
        self.store().read(ElementId(id)).unwrap().mode
    }

    fn ms(&self) -> u128 {
        self.sched.now().as_millis()
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ============================================================================
// Test 1: Phase Termination
// ============================================================================

/// Typing "cat" at 300ms takes three steps, then the element idles and
/// schedules nothing further of its own.
#[test]
fn test_phase_terminates_at_full_candidate() {
    let scene = Scene::new(&[(&["cat"], 300), (&["a-much-longer-word"], 10_000)]);
    let driver: &Rc<AnimationDriver> = &scene.rotator.drivers()[0];

    assert_eq!(driver.step().unwrap(), StepOutcome::Continued);
    assert_eq!(driver.step().unwrap(), StepOutcome::Continued);
    assert_eq!(driver.step().unwrap(), StepOutcome::Finished);

    assert_eq!(scene.text(0), "cat");
    assert_eq!(scene.mode(0), Mode::Idle);

    // The two continuations scheduled earlier remain; running them is a no-op
    // because the element is idle now.
    assert_eq!(scene.sched.pending(), 2);
    scene.sched.run_tasks(2);
    assert_eq!(scene.targets[0].frame_count(), 3);
    assert_eq!(scene.sched.pending(), 0);
}

// ============================================================================
// Test 2: Round Trip
// ============================================================================

#[test]
fn test_two_element_round_trip() {
    let scene = Scene::new(&[(&["cat"], 300), (&["dogs"], 400)]);
    scene.rotator.start();

    // t=0: both typed their first character.
    assert_eq!(scene.text(0), "c");
    assert_eq!(scene.text(1), "d");

    // Element 0 finishes at t=200, element 1 is still typing.
    scene.sched.advance(ms(200));
    assert_eq!(scene.text(0), "cat");
    assert_eq!(scene.mode(0), Mode::Idle);
    assert_eq!(scene.text(1), "dog");
    assert_eq!(scene.store().restart_count(), 0);

    // Element 1 finishes at t=300 and its idle update restarts everything.
    scene.sched.advance(ms(100));
    assert_eq!(scene.text(1), "dogs");
    assert_eq!(scene.store().restart_count(), 1);
    assert_eq!(scene.store().phase(), Mode::Deleting);
    for id in 0..2 {
        assert_eq!(scene.mode(id), Mode::Deleting);
        assert_eq!(scene.store().read(ElementId(id)).unwrap().cycle_count, 0);
    }
    assert_eq!(scene.sched.pending(), 1);
    assert_eq!(scene.sched.next_delay(), Some(ms(2000)));

    // Tick at t=2300; deletion runs at half the typing delay (50ms each).
    scene.sched.advance(ms(2000));
    assert_eq!(scene.ms(), 2300);
    assert_eq!(scene.text(0), "ca");
    assert_eq!(scene.text(1), "dog");

    scene.sched.advance(ms(100));
    assert_eq!(scene.text(0), "");
    assert_eq!(scene.mode(0), Mode::Idle);
    assert_eq!(scene.text(1), "d");

    // Element 1 empties at t=2450: restart into typing, cycle advances.
    scene.sched.advance(ms(50));
    assert_eq!(scene.store().restart_count(), 2);
    assert_eq!(scene.store().phase(), Mode::Typing);
    for id in 0..2 {
        let state = scene.store().read(ElementId(id)).unwrap();
        assert_eq!(state.mode, Mode::Typing);
        assert_eq!(state.cycle_count, 1);
    }
    assert_eq!(scene.sched.next_delay(), Some(ms(500)));

    assert_eq!(
        scene.targets[0].frames(),
        vec!["c", "ca", "cat", "ca", "c", ""]
    );
    assert_eq!(
        scene.targets[1].last_markup().as_deref(),
        Some("<span class=\"wrap\"></span>")
    );
}

// ============================================================================
// Test 3: Invariants Over Many Cycles
// ============================================================================

#[test]
fn test_prefix_and_unit_step_invariants() {
    let scene = Scene::new(&[
        (&["Rust", "Tokio", "ratatui"], 5000),
        (&["año", "", "naïve café"], 3000),
        (&["x"], 700),
    ]);
    scene.rotator.start();

    for _ in 0..2_000 {
        assert!(scene.sched.run_next(), "rotation never runs out of work");

        for id in scene.store().ids() {
            let state = scene.store().read(id).unwrap();
            let active = state.active_candidate();
            assert!(
                active.starts_with(state.text.as_str()),
                "{id}: {:?} is not a prefix of {active:?}",
                state.text
            );
            assert!(state.text_len() <= active.chars().count());
        }
    }

    for (id, target) in scene.targets.iter().enumerate() {
        let has_empty = scene
            .store()
            .read(ElementId(id))
            .unwrap()
            .candidates
            .iter()
            .any(String::is_empty);
        let lengths: Vec<usize> = target.frames().iter().map(|f| f.chars().count()).collect();
        let mut repeats = 0;
        for pair in lengths.windows(2) {
            // An empty active candidate renders "" for its typing phase and
            // again for its deleting phase; every other step moves by one.
            if has_empty && pair == [0, 0] {
                repeats += 1;
                continue;
            }
            assert_eq!(
                pair[1].abs_diff(pair[0]),
                1,
                "element {id} went from {} to {}",
                pair[0],
                pair[1]
            );
        }
        assert_eq!(repeats > 0, has_empty, "element {id}");
    }
}

// ============================================================================
// Test 4: Cycle Counting
// ============================================================================

#[test]
fn test_candidates_rotate_once_per_typing_restart() {
    let scene = Scene::new(&[(&["ab", "cd", "ef"], 200)]);
    scene.rotator.start();

    let mut seen = Vec::new();
    while seen.len() < 4 {
        scene.sched.run_next();
        let state = scene.store().read(ElementId(0)).unwrap();
        if state.mode == Mode::Deleting && seen.last() != Some(&state.cycle_count) {
            seen.push(state.cycle_count);
            assert_eq!(
                state.active_candidate(),
                ["ab", "cd", "ef"][(state.cycle_count % 3) as usize]
            );
        }
    }

    assert_eq!(seen, vec![0, 1, 2, 3]);
    // Restarts alternate: deleting, typing, deleting, ...
    assert_eq!(scene.store().restart_count(), 7);
}

/// A single update that does not idle every element never restarts.
#[test]
fn test_no_restart_until_every_element_idle() {
    let scene = Scene::new(&[(&["a"], 100), (&["bb"], 100), (&["ccc"], 100)]);
    scene.rotator.start();

    // "a" finishes on the start tick; "bb" at t=50.
    assert_eq!(scene.mode(0), Mode::Idle);
    scene.sched.advance(ms(50));
    assert_eq!(scene.mode(1), Mode::Idle);
    assert_eq!(scene.store().restart_count(), 0);

    scene.sched.advance(ms(16));
    assert_eq!(scene.text(2), "cc");
    assert_eq!(scene.store().restart_count(), 0);

    scene.sched.advance(ms(17));
    assert_eq!(scene.text(2), "ccc");
    assert_eq!(scene.store().restart_count(), 1);
}

// ============================================================================
// Test 5: Tokio Timers
// ============================================================================

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_runs_on_tokio_local_set() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let mut rotator = Rotator::new(Rc::new(TokioScheduler::new()), Timing::default());
            let targets = [Rc::new(MemoryTarget::new()), Rc::new(MemoryTarget::new())];
            for (target, word, period) in [(&targets[0], "cat", 300), (&targets[1], "dogs", 400)] {
                rotator
                    .add(ElementInit::new(
                        vec![word.to_string()],
                        ms(period),
                        target.clone(),
                    ))
                    .unwrap();
            }
            rotator.start();
            let store = Rc::clone(rotator.store());

            tokio::time::sleep(ms(301)).await;
            assert_eq!(store.restart_count(), 1);
            assert_eq!(store.phase(), Mode::Deleting);
            assert_eq!(targets[1].last_text().as_deref(), Some("dogs"));

            tokio::time::sleep(ms(2000)).await;
            assert_eq!(targets[0].last_text().as_deref(), Some("ca"));
            assert_eq!(targets[1].last_text().as_deref(), Some("dog"));
        })
        .await;
}
