//! Vertical layout for the plate screen
//!
//! Provides:
//! - Section placement inside the scrollable content (header, calorie box,
//!   cards, bottom spacer)
//! - Progress fill width
//! - Scroll clamping and reveal-on-focus

use ratatui::layout::Rect;

use crate::plate::FillPercent;

/// Header: avatar/menu row, blank row, back arrow + title row
pub const HEADER_HEIGHT: u16 = 3;
/// Calorie box: 2 border rows + 4 content rows
pub const CALORIE_BOX_HEIGHT: u16 = 6;
/// Blank rows between sections
pub const SECTION_GAP: u16 = 1;
/// Empty rows at the end so the last card clears the navigation bar
pub const NAVBAR_SPACER: u16 = 2;
/// Navigation bar pinned under the content
pub const NAV_BAR_HEIGHT: u16 = 3;
/// Horizontal padding around the content column
pub const CONTENT_PADDING_X: u16 = 2;

/// Cells of a `track`-wide bar that are filled
pub fn fill_width(track: u16, percent: FillPercent) -> u16 {
    ((track as u32 * percent.get() as u32) / 100) as u16
}

/// Positions of every section, in content coordinates (y = 0 is the top of
/// the scrollable area, not the screen)
#[derive(Debug, Clone, PartialEq)]
pub struct PlateLayout {
    pub header: Rect,
    pub calories: Rect,
    pub cards: Vec<Rect>,
    pub spacer: Rect,
}

impl PlateLayout {
    /// Stack the sections for a content column `width` cells wide.
    /// `card_heights` holds one entry per card, in order.
    pub fn compute(width: u16, card_heights: &[u16]) -> Self {
        let x = CONTENT_PADDING_X.min(width / 2);
        let inner_width = width.saturating_sub(x * 2);
        let row = |y: u16, height: u16| Rect::new(x, y, inner_width, height);

        let header = row(0, HEADER_HEIGHT);
        let calories = row(header.bottom() + SECTION_GAP, CALORIE_BOX_HEIGHT);

        let mut y = calories.bottom();
        let cards = card_heights
            .iter()
            .map(|&height| {
                let card = row(y + SECTION_GAP, height);
                y = card.bottom();
                card
            })
            .collect();

        Self {
            header,
            calories,
            cards,
            spacer: row(y, NAVBAR_SPACER),
        }
    }

    /// Total rows of scrollable content
    pub fn content_height(&self) -> u16 {
        self.spacer.bottom()
    }
}

/// Largest scroll offset that still fills the viewport
pub fn max_scroll(content_height: u16, viewport_height: u16) -> u16 {
    content_height.saturating_sub(viewport_height)
}

/// Smallest scroll change that brings `target` (content coordinates) into a
/// `viewport_height`-tall window. Targets taller than the window align to
/// their top.
pub fn reveal(scroll: u16, target: Rect, viewport_height: u16) -> u16 {
    if target.y < scroll || target.height >= viewport_height {
        target.y
    } else if target.bottom() > scroll + viewport_height {
        target.bottom() - viewport_height
    } else {
        scroll
    }
}
