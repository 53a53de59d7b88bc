//! Terminal-agnostic input event types.
//!
//! The binary converts crossterm events into these types before calling the
//! reducer, which keeps the reducer testable without a terminal.

/// Key codes the application reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKeyCode {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Enter,
    Esc,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
}

/// A keyboard event with pre-extracted modifiers.
#[derive(Debug, Clone, Copy)]
pub struct AppKeyEvent {
    pub code: AppKeyCode,
    pub ctrl: bool,
    pub alt: bool,
    /// `true` when the key was released (ignored by the reducer).
    pub is_release: bool,
}

impl AppKeyEvent {
    pub fn new(code: AppKeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            alt: false,
            is_release: false,
        }
    }
}

/// The kind of a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMouseKind {
    LeftDown,
    ScrollUp,
    ScrollDown,
}

/// A mouse event in terminal cell coordinates.
#[derive(Debug, Clone, Copy)]
pub struct AppMouseEvent {
    pub kind: AppMouseKind,
    /// Column in terminal cell coordinates.
    pub column: u16,
    /// Row in terminal cell coordinates.
    pub row: u16,
}
