//! Render Targets for the Terminal
//!
//! - [`DisplayLines`]: the shared model the full-screen view draws from;
//!   each element's driver writes into its own [`LineTarget`] slot
//! - [`PlainTarget`]: prints each frame's markup to a writer (stdout)

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use txt_rotate_core::{ElementId, Mode, RenderError, RenderFrame, RenderTarget};

/// What one element currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLine {
    /// Displayed text
    pub text: String,
    /// Mode of the step that produced it
    pub mode: Mode,
    /// Frames received so far
    pub frames: u64,
}

/// Per-element lines shared between the drivers and the view
#[derive(Debug, Clone, Default)]
pub struct DisplayLines {
    lines: Rc<RefCell<Vec<DisplayLine>>>,
}

impl DisplayLines {
    /// Create `count` empty lines
    pub fn new(count: usize) -> Self {
        Self {
            lines: Rc::new(RefCell::new(vec![DisplayLine::default(); count])),
        }
    }

    /// Render target writing into the line of `id`
    pub fn target(&self, id: ElementId) -> Rc<dyn RenderTarget> {
        Rc::new(LineTarget {
            id,
            lines: self.clone(),
        })
    }

    /// Copy of every line, in id order
    pub fn snapshot(&self) -> Vec<DisplayLine> {
        self.lines.borrow().clone()
    }
}

/// Writes one element's frames into its [`DisplayLines`] slot
#[derive(Debug)]
pub struct LineTarget {
    id: ElementId,
    lines: DisplayLines,
}

impl RenderTarget for LineTarget {
    fn render(&self, frame: &RenderFrame<'_>) -> Result<(), RenderError> {
        let mut lines = self.lines.lines.borrow_mut();
        let line = lines
            .get_mut(self.id.index())
            .ok_or(RenderError::Detached { id: self.id })?;
        line.text.clear();
        line.text.push_str(frame.text);
        line.mode = frame.mode;
        line.frames += 1;
        Ok(())
    }
}

/// Prints `[#id] <span class="wrap">…</span>` for every frame
pub struct PlainTarget<W: Write> {
    out: Rc<RefCell<W>>,
}

impl<W: Write> PlainTarget<W> {
    /// Target printing to a shared writer
    pub fn new(out: Rc<RefCell<W>>) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderTarget for PlainTarget<W> {
    fn render(&self, frame: &RenderFrame<'_>) -> Result<(), RenderError> {
        let mut out = self.out.borrow_mut();
        writeln!(out, "[{}] {}", frame.id, frame.markup())?;
        out.flush()?;
        Ok(())
    }
}
