//! Render Targets
//!
//! Drivers write every step's text to a [`RenderTarget`]. A frame carries
//! the plain text; HTML-oriented targets use [`RenderFrame::markup`] to get
//! the `<span class="wrap">` container external styling hooks onto.

use std::cell::RefCell;

use crate::element::{ElementId, Mode};
use crate::error::RenderError;

/// CSS class of the container wrapped around displayed text
pub const WRAP_CLASS: &str = "wrap";

/// One displayed state of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFrame<'a> {
    /// Element being rendered
    pub id: ElementId,
    /// Text to display
    pub text: &'a str,
    /// Mode the step ran in
    pub mode: Mode,
}

impl RenderFrame<'_> {
    /// The text wrapped in its markup container, HTML-escaped
    pub fn markup(&self) -> String {
        format!(
            "<span class=\"{}\">{}</span>",
            WRAP_CLASS,
            escape_html(self.text)
        )
    }
}

/// Something that can display an element's text
///
/// Writes are best-effort: the driver logs a returned error and keeps going.
pub trait RenderTarget {
    /// Display a frame
    fn render(&self, frame: &RenderFrame<'_>) -> Result<(), RenderError>;
}

/// Escape the characters that would otherwise be parsed as markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Target that records every frame in memory
#[derive(Debug, Default)]
pub struct MemoryTarget {
    frames: RefCell<Vec<String>>,
    markup: RefCell<Option<String>>,
}

impl MemoryTarget {
    /// Create an empty recording target
    pub fn new() -> Self {
        Self::default()
    }

    /// Every text written so far, oldest first
    pub fn frames(&self) -> Vec<String> {
        self.frames.borrow().clone()
    }

    /// Most recent text, if any frame was written
    pub fn last_text(&self) -> Option<String> {
        self.frames.borrow().last().cloned()
    }

    /// Markup of the most recent frame
    pub fn last_markup(&self) -> Option<String> {
        self.markup.borrow().clone()
    }

    /// Number of frames written
    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl RenderTarget for MemoryTarget {
    fn render(&self, frame: &RenderFrame<'_>) -> Result<(), RenderError> {
        self.frames.borrow_mut().push(frame.text.to_string());
        *self.markup.borrow_mut() = Some(frame.markup());
        Ok(())
    }
}
