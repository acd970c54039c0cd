//! Element State
//!
//! Per-element animation state owned by the [`StateStore`](crate::StateStore).

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::render::RenderTarget;

/// Stable identifier of a participating element
///
/// Assigned once at registration (in configuration order by the launcher)
/// and never reassigned for the lifetime of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub usize);

impl ElementId {
    /// Raw index value
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Animation direction of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Growing the text one character at a time
    #[default]
    Typing,
    /// Shrinking the text one character at a time
    Deleting,
    /// Waiting for the next global restart
    Idle,
}

impl Mode {
    /// Signed change in character count applied by one step
    pub fn direction(self) -> isize {
        match self {
            Mode::Typing => 1,
            Mode::Deleting => -1,
            Mode::Idle => 0,
        }
    }

    /// The phase a restart switches to from this one
    pub fn flipped(self) -> Mode {
        match self {
            Mode::Typing => Mode::Deleting,
            _ => Mode::Typing,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Typing => write!(f, "typing"),
            Mode::Deleting => write!(f, "deleting"),
            Mode::Idle => write!(f, "idle"),
        }
    }
}

/// Fields supplied by the caller when registering an element
#[derive(Clone)]
pub struct ElementInit {
    /// Strings to rotate through, in order
    pub candidates: Vec<String>,
    /// Overall cadence; one candidate is typed in roughly this long
    pub period: Duration,
    /// Where frames for this element are written
    pub target: Rc<dyn RenderTarget>,
}

impl ElementInit {
    /// Create registration fields
    pub fn new(candidates: Vec<String>, period: Duration, target: Rc<dyn RenderTarget>) -> Self {
        Self {
            candidates,
            period,
            target,
        }
    }
}

impl fmt::Debug for ElementInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementInit")
            .field("candidates", &self.candidates)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

/// Snapshot of one element's animation state
#[derive(Clone)]
pub struct ElementState {
    /// Stable identifier
    pub id: ElementId,
    /// Current direction
    pub mode: Mode,
    /// Number of restarts into [`Mode::Typing`] seen so far
    pub cycle_count: u64,
    /// Rotation list, fixed at creation
    pub candidates: Vec<String>,
    /// Currently displayed text (a prefix of the active candidate)
    pub text: String,
    /// Cadence, fixed at creation
    pub period: Duration,
    /// Render target handle
    pub target: Rc<dyn RenderTarget>,
}

impl ElementState {
    pub(crate) fn from_init(id: ElementId, init: ElementInit) -> Self {
        Self {
            id,
            mode: Mode::Typing,
            cycle_count: 0,
            candidates: init.candidates,
            text: String::new(),
            period: init.period,
            target: init.target,
        }
    }

    /// The candidate selected by the current cycle
    pub fn active_candidate(&self) -> &str {
        let index = (self.cycle_count % self.candidates.len() as u64) as usize;
        &self.candidates[index]
    }

    /// Number of characters currently displayed
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether this element is waiting for a restart
    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    /// Apply a partial update, leaving unnamed fields untouched
    pub(crate) fn apply(&mut self, patch: ElementPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
    }
}

impl fmt::Debug for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementState")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("cycle_count", &self.cycle_count)
            .field("candidates", &self.candidates)
            .field("text", &self.text)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

/// Partial update merged into an [`ElementState`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementPatch {
    /// New displayed text
    pub text: Option<String>,
    /// New mode
    pub mode: Option<Mode>,
}

impl ElementPatch {
    /// Patch that only replaces the text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            mode: None,
        }
    }

    /// Patch that only replaces the mode
    pub fn mode(mode: Mode) -> Self {
        Self {
            text: None,
            mode: Some(mode),
        }
    }
}

/// First `len` characters of `s`, respecting char boundaries
pub(crate) fn char_prefix(s: &str, len: usize) -> &str {
    match s.char_indices().nth(len) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}
