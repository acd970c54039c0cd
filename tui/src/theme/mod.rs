//! Theme and Colors
//!
//! Colors for the rotating lines, keyed by the mode that produced them.

use ratatui::style::{Color, Modifier, Style};

use txt_rotate_core::Mode;

// ============================================================================
// Palette
// ============================================================================

/// Text being typed
pub const TYPING: Color = Color::Rgb(255, 182, 193);

/// Text being deleted
pub const DELETING: Color = Color::Rgb(180, 100, 120);

/// Finished text waiting for the restart
pub const IDLE: Color = Color::Rgb(255, 218, 224);

/// Caret block
pub const CARET: Color = Color::Rgb(255, 127, 127);

/// Frame border and status line
pub const MUTED: Color = Color::DarkGray;

/// Caret glyph drawn after the text
pub const CARET_GLYPH: &str = "▌";

/// Style for a line's text
pub fn text_style(mode: Mode) -> Style {
    match mode {
        Mode::Typing => Style::default().fg(TYPING),
        Mode::Deleting => Style::default().fg(DELETING),
        Mode::Idle => Style::default().fg(IDLE).add_modifier(Modifier::BOLD),
    }
}

/// Style for the caret
pub fn caret_style() -> Style {
    Style::default().fg(CARET)
}
