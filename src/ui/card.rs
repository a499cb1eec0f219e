//! Macro card widget
//!
//! Renders one nutrient category as a rounded card with:
//! - Icon badge + label, chevron at the right edge
//! - Progress bar with the note right-aligned inside the fill
//! - Food panel (expandable cards only, when expanded)
//!
//! Every card goes through this one widget; `MacroCardSpec::expandable`
//! decides whether the chevron does anything.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::layout::fill_width;
use super::theme::{shade, Theme};
use crate::assets::{FontBook, MANJARI_BOLD, MANJARI_REGULAR};
use crate::icons::{self, GlyphStyle, ImageManager};
use crate::plate::{ImageRef, MacroCardSpec};

/// Borders + header row + blank row + bar row
pub const CARD_BASE_HEIGHT: u16 = 5;
/// Padding row + caption row + padding row
pub const FOOD_ROW_HEIGHT: u16 = 3;
/// Columns reserved for a food thumbnail
pub const THUMBNAIL_WIDTH: u16 = 6;
/// Click target around the chevron
const CHEVRON_WIDTH: u16 = 3;

/// Text on card surfaces; card colors are light regardless of theme
const CARD_TEXT: Color = Color::Rgb(0, 0, 0);
const FOOD_ROW_BG: Color = Color::Rgb(255, 255, 255);

/// Macro card widget
pub struct MacroCard<'a> {
    spec: &'a MacroCardSpec,
    theme: &'a Theme,
    fonts: &'a FontBook,
    glyphs: GlyphStyle,
    expanded: bool,
    focused: bool,
    images: Option<&'a ImageManager>,
}

impl<'a> MacroCard<'a> {
    pub fn new(spec: &'a MacroCardSpec, theme: &'a Theme, fonts: &'a FontBook) -> Self {
        Self {
            spec,
            theme,
            fonts,
            glyphs: GlyphStyle::default(),
            expanded: false,
            focused: false,
            images: None,
        }
    }

    pub fn glyphs(mut self, glyphs: GlyphStyle) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Ignored for cards that can't expand
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded && self.spec.expandable;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Leave thumbnail cells blank for images this manager will draw
    pub fn images(mut self, images: &'a ImageManager) -> Self {
        self.images = Some(images);
        self
    }

    fn shows_panel(&self) -> bool {
        self.expanded && !self.spec.foods.is_empty()
    }

    /// Click target of the chevron for a card drawn in `area`
    pub fn chevron_area(area: Rect) -> Rect {
        let inner = inner(area);
        let width = CHEVRON_WIDTH.min(inner.width);
        Rect::new(inner.right() - width, inner.y, width, inner.height.min(1))
    }

    /// Food rows for a card drawn in `area`, clipped to the area
    pub fn food_rows(&self, area: Rect) -> Vec<Rect> {
        if !self.shows_panel() {
            return Vec::new();
        }
        let inner = inner(area);
        // Skip header, blank, bar and the blank row above the panel
        let mut y = inner.y + 4;
        let mut rows = Vec::with_capacity(self.spec.foods.len());
        for _ in &self.spec.foods {
            if y + FOOD_ROW_HEIGHT > inner.bottom() {
                break;
            }
            rows.push(Rect::new(inner.x, y, inner.width, FOOD_ROW_HEIGHT));
            y += FOOD_ROW_HEIGHT + 1;
        }
        rows
    }

    /// Where each food image goes for a card drawn in `area`
    pub fn thumbnails(&self, area: Rect) -> Vec<(Rect, &'a ImageRef)> {
        let spec: &'a MacroCardSpec = self.spec;
        self.food_rows(area)
            .into_iter()
            .zip(&spec.foods)
            .map(|(row, food)| (thumbnail_area(row), &food.image))
            .collect()
    }

    fn render_header(&self, row: Rect, buf: &mut Buffer) {
        let card_bg = self.spec.card_color;

        // Icon inside a darker badge
        let badge = format!(" {} ", icons::glyph(&self.spec.icon, self.glyphs));
        let badge_style = Style::default()
            .fg(self.theme.on_fill)
            .bg(shade(card_bg, 0.8));
        let (x, _) = buf.set_stringn(row.x, row.y, &badge, row.width as usize, badge_style);

        let label_x = x + 1;
        let label_width = row
            .right()
            .saturating_sub(label_x + CHEVRON_WIDTH + 1) as usize;
        let label_style = self.fonts.style(MANJARI_BOLD).fg(CARD_TEXT).bg(card_bg);
        if label_width > 0 {
            buf.set_string(label_x, row.y, truncate(&self.spec.label, label_width), label_style);
        }

        let chevron = if self.expanded {
            "chevron-up"
        } else {
            "chevron-down"
        };
        let mut chevron_style = Style::default().fg(CARD_TEXT).bg(card_bg);
        if self.focused && self.spec.expandable {
            chevron_style = chevron_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        if row.width > CHEVRON_WIDTH {
            let x = row.right() - CHEVRON_WIDTH + 1;
            buf.set_string(x, row.y, icons::feather(chevron, self.glyphs), chevron_style);
        }
    }

    fn render_bar(&self, row: Rect, buf: &mut Buffer) {
        let fill = fill_width(row.width, self.spec.fill_percent);
        paint(buf, row, self.spec.track_color);
        paint(buf, Rect { width: fill, ..row }, self.spec.fill_color);

        // Note sits at the right end of the fill, one cell in
        let room = fill.saturating_sub(1) as usize;
        if room == 0 {
            return;
        }
        let note = truncate(&self.spec.note, room);
        let x = row.x + fill - 1 - note.width() as u16;
        let style = self
            .fonts
            .style(MANJARI_REGULAR)
            .fg(self.theme.on_fill)
            .bg(self.spec.fill_color);
        buf.set_string(x, row.y, note, style);
    }

    fn render_food_row(&self, row: Rect, image: &ImageRef, label: &str, buf: &mut Buffer) {
        paint(buf, row, FOOD_ROW_BG);
        let style = self.fonts.style(MANJARI_REGULAR).fg(CARD_TEXT).bg(FOOD_ROW_BG);
        let y = row.y + 1;

        let image_drawn = self
            .images
            .is_some_and(|mgr| mgr.get_cached(image).is_some());
        if !image_drawn {
            let thumb = thumbnail_area(row);
            let fallback = image.fallback_glyph(self.glyphs);
            let x = thumb.x + thumb.width.saturating_sub(fallback.width() as u16) / 2;
            buf.set_stringn(x, y, fallback, thumb.width as usize, style);
        }

        let caption_x = row.x + THUMBNAIL_WIDTH + 2;
        let caption_width = row.right().saturating_sub(caption_x + CHEVRON_WIDTH) as usize;
        if caption_width > 0 {
            buf.set_string(caption_x, y, truncate(label, caption_width), style);
        }
        if row.width > CHEVRON_WIDTH {
            let x = row.right() - CHEVRON_WIDTH + 1;
            buf.set_string(x, y, icons::feather("chevron-right", self.glyphs), style);
        }
    }
}

impl Widget for MacroCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 3 {
            return;
        }

        let border_color = if self.focused {
            self.theme.accent
        } else {
            shade(self.spec.card_color, 0.85)
        };
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(self.spec.card_color))
            .render(area, buf);

        let inner = inner(area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        self.render_header(Rect { height: 1, ..inner }, buf);
        if inner.height > 2 {
            self.render_bar(Rect::new(inner.x, inner.y + 2, inner.width, 1), buf);
        }
        for (row, food) in self.food_rows(area).into_iter().zip(&self.spec.foods) {
            self.render_food_row(row, &food.image, &food.label, buf);
        }
    }
}

/// Rows a card needs, food panel included when expanded
pub fn card_height(spec: &MacroCardSpec, expanded: bool) -> u16 {
    let foods = spec.foods.len() as u16;
    if expanded && spec.expandable && foods > 0 {
        // Blank row, then rows separated by one blank row each
        CARD_BASE_HEIGHT + 1 + foods * FOOD_ROW_HEIGHT + (foods - 1)
    } else {
        CARD_BASE_HEIGHT
    }
}

fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn thumbnail_area(row: Rect) -> Rect {
    Rect::new(row.x + 1, row.y, THUMBNAIL_WIDTH.min(row.width), row.height)
}

/// Set the background of every cell in `area`
pub(crate) fn paint(buf: &mut Buffer, area: Rect, bg: Color) {
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_bg(bg);
            }
        }
    }
}

/// Truncate string to fit within max_width, adding ellipsis if needed
pub(crate) fn truncate(s: &str, max_width: usize) -> String {
    let width = s.width();
    if width <= max_width {
        s.to_string()
    } else if max_width <= 1 {
        "…".to_string()
    } else {
        let mut result = String::new();
        let mut current_width = 0;

        for c in s.chars() {
            let char_width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width + 1 > max_width {
                result.push('…');
                break;
            }
            result.push(c);
            current_width += char_width;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plate::PlateSnapshot;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.left()..buf.area.right())
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    fn count_bg(buf: &Buffer, y: u16, bg: Color) -> usize {
        (buf.area.left()..buf.area.right())
            .filter(|&x| buf[(x, y)].bg == bg)
            .count()
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello w…");
        assert_eq!(truncate("hi", 2), "hi");
        assert_eq!(truncate("hello", 1), "…");
    }

    #[test]
    fn test_card_height() {
        let plate = PlateSnapshot::builtin();
        let carbs = &plate.cards[0];
        assert_eq!(card_height(carbs, false), 5);
        assert_eq!(card_height(carbs, true), 17);
        // Non-expandable cards ignore the flag
        assert_eq!(card_height(&plate.cards[1], true), 5);
    }

    #[test]
    fn test_fill_matches_percent() {
        let plate = PlateSnapshot::builtin();
        let theme = Theme::default();
        let fonts = FontBook::default();
        // 102 wide leaves a 100-cell track inside the borders
        let area = Rect::new(0, 0, 102, CARD_BASE_HEIGHT);

        for spec in &plate.cards[1..] {
            let mut buf = Buffer::empty(area);
            MacroCard::new(spec, &theme, &fonts).render(area, &mut buf);
            assert_eq!(
                count_bg(&buf, 3, spec.fill_color),
                spec.fill_percent.get() as usize,
                "{}",
                spec.label
            );
            assert!(row_text(&buf, 3).contains(&spec.note));
            assert!(row_text(&buf, 1).contains(&spec.label));
        }
    }

    #[test]
    fn test_note_right_aligned_in_fill() {
        let plate = PlateSnapshot::builtin();
        let fats = &plate.cards[4];
        let theme = Theme::default();
        let fonts = FontBook::default();
        let area = Rect::new(0, 0, 102, CARD_BASE_HEIGHT);
        let mut buf = Buffer::empty(area);
        MacroCard::new(fats, &theme, &fonts).render(area, &mut buf);

        // Fill covers x = 1..41; note ends one cell short of its edge
        assert_eq!(buf[(31, 3)].symbol(), "2");
        assert_eq!(buf[(39, 3)].symbol(), "o");
        assert_eq!(buf[(40, 3)].symbol(), " ");
        assert_eq!(buf[(40, 3)].bg, fats.fill_color);
        assert_eq!(buf[(41, 3)].bg, fats.track_color);
    }

    #[test]
    fn test_food_panel_only_when_expanded() {
        let plate = PlateSnapshot::builtin();
        let carbs = &plate.cards[0];
        let theme = Theme::default();
        let fonts = FontBook::default();

        let collapsed = MacroCard::new(carbs, &theme, &fonts);
        assert!(collapsed.food_rows(Rect::new(0, 0, 80, 17)).is_empty());

        let expanded = MacroCard::new(carbs, &theme, &fonts).expanded(true);
        let area = Rect::new(0, 0, 80, card_height(carbs, true));
        let rows = expanded.food_rows(area);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].y, 5);
        assert_eq!(rows[2].bottom(), area.bottom() - 1);

        let mut buf = Buffer::empty(area);
        expanded.render(area, &mut buf);
        assert!(row_text(&buf, 6).contains("90 Second Brown Rice"));
        assert!(row_text(&buf, 10).contains("Quaker Express Maple Brown Sugar Oatmeal"));
        assert!(row_text(&buf, 6).contains('›'));
        assert!(row_text(&buf, 1).contains('▴'));
    }

    #[test]
    fn test_chevron_area() {
        let area = Rect::new(2, 10, 40, 5);
        assert_eq!(MacroCard::chevron_area(area), Rect::new(38, 11, 3, 1));
    }
}
