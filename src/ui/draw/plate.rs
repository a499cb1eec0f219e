//! Plate screen drawing functions
//!
//! This module handles rendering the ready screen:
//! - Scrollable content (header, calorie summary, cards, spacer), drawn
//!   into an off-screen buffer and copied through the viewport
//! - Navigation bar pinned to the bottom
//! - Graphics images, placed only when fully visible

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, BorderType, Widget},
    Frame,
};
use ratatui_image::{Resize, StatefulImage};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, HitZone};
use crate::assets::{FontBook, MANJARI_BOLD, MANJARI_REGULAR, PUBLIC_SANS_BOLD};
use crate::icons::{self, GlyphStyle, IconRef, IconSet, ImageManager};
use crate::plate::{CalorieSummary, ImageRef, PlateSnapshot};
use crate::ui::card::{self, paint, truncate, MacroCard};
use crate::ui::layout::{fill_width, PlateLayout, NAV_BAR_HEIGHT};
use crate::ui::nav::NavigationBar;
use crate::ui::theme::Theme;

/// Cells the avatar image takes in the header
const AVATAR_SIZE: (u16, u16) = (4, 2);

/// Draw the plate screen
pub(crate) fn draw_plate(f: &mut Frame, app: &mut App, images: &ImageManager) {
    let area = f.area();
    let theme = app.theme().clone();
    let glyphs = app.glyphs();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let [content_area, nav_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(NAV_BAR_HEIGHT)]).areas(area);

    // Lay out first so the scroll offset is settled before anything is copied
    let heights: Vec<u16> = app
        .snapshot()
        .cards
        .iter()
        .enumerate()
        .map(|(i, spec)| card::card_height(spec, app.is_expanded(i)))
        .collect();
    let layout = PlateLayout::compute(content_area.width, &heights);
    let focused_card = layout.cards.get(app.focused()).copied();
    app.update_viewport(layout.content_height(), content_area.height, focused_card);

    let viewport = Viewport {
        screen: content_area,
        scroll: app.scroll(),
    };
    let Some(fonts) = app.fonts() else {
        return;
    };

    let content_rect = Rect::new(0, 0, content_area.width, layout.content_height());
    let mut content = Buffer::empty(content_rect);
    paint(&mut content, content_rect, theme.background);

    let snapshot = app.snapshot();
    let avatar_drawn = images.get_cached(&snapshot.avatar).is_some();
    render_header(&mut content, layout.header, snapshot, &theme, fonts, glyphs, avatar_drawn);
    render_calories(&mut content, layout.calories, &snapshot.calories, &theme, fonts);

    let mut zones = Vec::new();
    let mut placements: Vec<(Rect, &ImageRef)> = vec![(avatar_area(layout.header), &snapshot.avatar)];
    for (i, (spec, &card_area)) in snapshot.cards.iter().zip(&layout.cards).enumerate() {
        let card = MacroCard::new(spec, &theme, fonts)
            .glyphs(glyphs)
            .expanded(app.is_expanded(i))
            .focused(i == app.focused())
            .images(images);
        placements.extend(card.thumbnails(card_area));
        card.render(card_area, &mut content);

        if spec.expandable {
            if let Some(area) = viewport.to_screen(MacroCard::chevron_area(card_area)) {
                zones.push(HitZone { area, card: i });
            }
        }
    }

    viewport.blit(&content, f.buffer_mut());

    if images.supports_graphics() {
        for (area, image) in placements {
            let (Some(screen), Some(protocol)) = (viewport.to_screen(area), images.get_cached(image)) else {
                continue;
            };
            let widget = StatefulImage::new(None).resize(Resize::Fit(None));
            let mut proto = protocol.lock();
            f.render_stateful_widget(widget, screen, &mut *proto);
        }
    }

    f.render_widget(NavigationBar::new(&theme, glyphs), nav_area);
    app.set_hit_zones(zones);
}

/// Window of the content buffer shown on screen
struct Viewport {
    screen: Rect,
    scroll: u16,
}

impl Viewport {
    /// Screen rect for a content rect, if it is fully visible
    fn to_screen(&self, area: Rect) -> Option<Rect> {
        if area.y < self.scroll || area.bottom() > self.scroll + self.screen.height {
            return None;
        }
        if area.right() > self.screen.width {
            return None;
        }
        Some(Rect::new(
            self.screen.x + area.x,
            self.screen.y + area.y - self.scroll,
            area.width,
            area.height,
        ))
    }

    /// Copy the visible rows of `content` onto the screen buffer
    fn blit(&self, content: &Buffer, screen: &mut Buffer) {
        for row in 0..self.screen.height {
            let src_y = self.scroll + row;
            if src_y >= content.area.bottom() {
                break;
            }
            for x in 0..self.screen.width.min(content.area.width) {
                let (Some(src), Some(dst)) = (
                    content.cell((x, src_y)),
                    screen.cell_mut((self.screen.x + x, self.screen.y + row)),
                ) else {
                    continue;
                };
                *dst = src.clone();
            }
        }
    }
}

fn avatar_area(header: Rect) -> Rect {
    Rect::new(
        header.x,
        header.y,
        AVATAR_SIZE.0.min(header.width),
        AVATAR_SIZE.1.min(header.height),
    )
}

/// Avatar and menu on top, back arrow and title underneath
fn render_header(
    buf: &mut Buffer,
    area: Rect,
    snapshot: &PlateSnapshot,
    theme: &Theme,
    fonts: &FontBook,
    glyphs: GlyphStyle,
    avatar_drawn: bool,
) {
    if area.width == 0 || area.height < 3 {
        return;
    }
    let accent = Style::default().fg(theme.accent).bg(theme.background);

    if !avatar_drawn {
        let avatar = snapshot.avatar.fallback_glyph(glyphs);
        buf.set_stringn(area.x, area.y, avatar, area.width as usize, accent);
    }
    let menu = icons::feather("menu", glyphs);
    let menu_x = area.right().saturating_sub(menu.width() as u16 + 1);
    buf.set_string(menu_x, area.y, menu, accent);

    let title_y = area.y + 2;
    let arrow = icons::glyph(&IconRef::new(IconSet::Ionicons, "arrow-back"), glyphs);
    let (x, _) = buf.set_stringn(area.x, title_y, arrow, area.width as usize, accent);
    let title_x = x + 2;
    let room = area.right().saturating_sub(title_x) as usize;
    if room > 0 {
        let style = fonts
            .style(MANJARI_BOLD)
            .fg(theme.foreground)
            .bg(theme.background);
        buf.set_string(title_x, title_y, truncate(&snapshot.title, room), style);
    }
}

/// Calorie box: consumed on the left, remaining on the right, bar below
fn render_calories(
    buf: &mut Buffer,
    area: Rect,
    calories: &CalorieSummary,
    theme: &Theme,
    fonts: &FontBook,
) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.calorie_track))
        .style(Style::default().bg(theme.surface));
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.width == 0 || inner.height < 4 {
        return;
    }

    let number = fonts
        .style(PUBLIC_SANS_BOLD)
        .fg(theme.foreground)
        .bg(theme.surface);
    let label = fonts
        .style(MANJARI_REGULAR)
        .fg(theme.dimmed)
        .bg(theme.surface);

    let right = |text: &str| inner.right().saturating_sub(text.width() as u16);

    buf.set_string(inner.x, inner.y, calories.consumed.to_string(), number);
    buf.set_string(inner.x, inner.y + 1, "Calories", label);

    let goal_label = "Until goal:";
    buf.set_string(right(goal_label), inner.y, goal_label, number);
    let remaining = calories.remaining.to_string();
    buf.set_string(right(&remaining), inner.y + 1, &remaining, number);

    let bar = Rect::new(inner.x, inner.y + 3, inner.width, 1);
    paint(buf, bar, theme.calorie_track);
    paint(
        buf,
        Rect {
            width: fill_width(bar.width, calories.fill_percent),
            ..bar
        },
        theme.calorie_fill,
    );
}
