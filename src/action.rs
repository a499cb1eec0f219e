//! Input actions for the plate screen.
//!
//! Crossterm events are mapped to a small [`Action`] set before they reach
//! the app, so key bindings live in one place:
//!
//! ```text
//! q / Esc / Ctrl+C     quit
//! Tab / l, Shift+Tab / h   focus next / previous card
//! Enter / Space        toggle the focused card
//! j k / ↓ ↑ / wheel    scroll
//! PgDn PgUp, g G       page, top, bottom
//! left click           toggle the card whose chevron was hit
//! ```

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// Rows one mouse wheel notch scrolls
const WHEEL_STEP: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    FocusNext,
    FocusPrev,
    Toggle,
    Click { x: u16, y: u16 },
    Scroll(i32),
    PageDown,
    PageUp,
    Top,
    Bottom,
}

impl Action {
    /// Map a terminal event; `None` for events the screen ignores
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Key(key) => Self::from_key(key),
            Event::Mouse(mouse) => Self::from_mouse(mouse),
            _ => None,
        }
    }

    fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Self::Quit,
            KeyCode::Char('q') | KeyCode::Esc => Self::Quit,
            KeyCode::Tab | KeyCode::Char('l') => Self::FocusNext,
            KeyCode::BackTab | KeyCode::Char('h') => Self::FocusPrev,
            KeyCode::Enter | KeyCode::Char(' ') => Self::Toggle,
            KeyCode::Down | KeyCode::Char('j') => Self::Scroll(1),
            KeyCode::Up | KeyCode::Char('k') => Self::Scroll(-1),
            KeyCode::PageDown => Self::PageDown,
            KeyCode::PageUp => Self::PageUp,
            KeyCode::Home | KeyCode::Char('g') => Self::Top,
            KeyCode::End | KeyCode::Char('G') => Self::Bottom,
            _ => return None,
        };
        Some(action)
    }

    fn from_mouse(mouse: &MouseEvent) -> Option<Self> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Self::Click {
                x: mouse.column,
                y: mouse.row,
            }),
            MouseEventKind::ScrollDown => Some(Self::Scroll(WHEEL_STEP)),
            MouseEventKind::ScrollUp => Some(Self::Scroll(-WHEEL_STEP)),
            _ => None,
        }
    }
}
