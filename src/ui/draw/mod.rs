//! Drawing functions for the TUI
//!
//! The screen is gated on font readiness:
//! - `loading` - Centered loading line, shown until fonts resolve
//! - `plate` - Header, calorie summary, cards and navigation bar

mod loading;
mod plate;

use ratatui::Frame;

use crate::app::{App, Readiness};
use crate::icons::ImageManager;

use loading::draw_loading;
use plate::draw_plate;

/// Main draw function
pub fn draw(f: &mut Frame, app: &mut App, images: &ImageManager) {
    match app.readiness() {
        Readiness::Ready(_) => draw_plate(f, app, images),
        // Failed looks the same as Pending: nothing but the loading line
        Readiness::Pending | Readiness::Failed => draw_loading(f, app.theme()),
    }
}
