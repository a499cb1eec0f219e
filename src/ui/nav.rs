//! Bottom navigation bar
//!
//! Static tab strip pinned under the scrollable content. It takes nothing
//! from the plate screen beyond styling; "Plate" is always the active tab.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::icons::{self, GlyphStyle};

/// (icon, label) per tab, left to right
const TABS: [(&str, &str); 4] = [
    ("home", "Home"),
    ("pie-chart", "Plate"),
    ("trending-up", "Progress"),
    ("user", "Profile"),
];
const ACTIVE_TAB: usize = 1;

/// Navigation bar widget
pub struct NavigationBar<'a> {
    theme: &'a Theme,
    glyphs: GlyphStyle,
}

impl<'a> NavigationBar<'a> {
    pub fn new(theme: &'a Theme, glyphs: GlyphStyle) -> Self {
        Self { theme, glyphs }
    }
}

impl Widget for NavigationBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(self.theme.dimmed))
            .style(Style::default().bg(self.theme.nav_background));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let slots = Layout::horizontal([Constraint::Ratio(1, TABS.len() as u32); TABS.len()])
            .split(Rect { height: 1, ..inner });

        for (i, (&(icon, label), slot)) in TABS.iter().zip(slots.iter()).enumerate() {
            let style = if i == ACTIVE_TAB {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.dimmed)
            };
            let text = format!("{} {}", icons::feather(icon, self.glyphs), label);
            let x = slot.x + slot.width.saturating_sub(text.width() as u16) / 2;
            buf.set_stringn(x, slot.y, &text, slot.width as usize, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_rendered() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        NavigationBar::new(&theme, GlyphStyle::Ascii).render(area, &mut buf);

        let row: String = (0..60).map(|x| buf[(x, 1)].symbol()).collect();
        for (_, label) in TABS {
            assert!(row.contains(label), "missing {}", label);
        }
        let plate_x = row.find("Plate").unwrap() as u16;
        assert!(buf[(plate_x, 1)].modifier.contains(Modifier::BOLD));
    }
}
