//! Screen-level tests, drawn into a `TestBackend`

use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};
use tokio::sync::oneshot;

use super::draw;
use crate::action::Action;
use crate::app::App;
use crate::assets::{AssetError, FontBook};
use crate::config::Config;
use crate::icons::{GlyphStyle, ImageManager};
use crate::plate::PlateSnapshot;
use crate::ui::Theme;

/// 100-cell bars: 2 padding + 1 border on each side
const WIDE: u16 = 106;

const CAPTIONS: [&str; 3] = [
    "90 Second Brown Rice, Quinoa & Red Rice with Flaxseeds...",
    "Quaker Express Maple Brown Sugar Oatmeal 1.69oz",
    "Sliced Sourdough Bread - 17oz - Favorite Day™",
];

const FOOD_GLYPHS: [&str; 3] = ["🍚", "🥣", "🍞"];

fn render(app: &mut App, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    let images = ImageManager::disabled();
    terminal.draw(|f| draw(f, app, &images)).unwrap();
    terminal.backend().buffer().clone()
}

fn rows(buf: &Buffer) -> Vec<String> {
    (0..buf.area.height)
        .map(|y| (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect())
        .collect()
}

fn count(buf: &Buffer, needle: &str) -> usize {
    rows(buf).iter().map(|r| r.matches(needle).count()).sum()
}

fn row_of(buf: &Buffer, needle: &str) -> Option<u16> {
    rows(buf)
        .iter()
        .position(|r| r.contains(needle))
        .map(|y| y as u16)
}

fn cells_with_bg(buf: &Buffer, y: u16, bg: Color) -> usize {
    (0..buf.area.width).filter(|&x| buf[(x, y)].bg == bg).count()
}

async fn ready_app() -> App {
    let mut app = App::new(PlateSnapshot::builtin(), Config::default());
    app.mount_with(async { Ok(FontBook::default()) });
    app.settle().await;
    app
}

fn assert_only_loading(buf: &Buffer) {
    assert_eq!(count(buf, "Loading..."), 1);
    for absent in ["Today's Plate", "Calories", "Carbohydrates", "Protein", "Home"] {
        assert_eq!(count(buf, absent), 0, "{} drawn before fonts are ready", absent);
    }
}

#[tokio::test]
async fn test_loading_gate() {
    let mut app = App::new(PlateSnapshot::builtin(), Config::default());
    let (_hold_tx, hold_rx) = oneshot::channel::<()>();
    app.mount_with(async move {
        let _ = hold_rx.await;
        Ok(FontBook::default())
    });
    app.poll_assets();

    let buf = render(&mut app, 80, 40);
    assert_only_loading(&buf);
    // Loading line sits mid-screen
    let row = row_of(&buf, "Loading...").unwrap();
    assert!((18..=21).contains(&row), "loading line at row {}", row);
}

#[tokio::test]
async fn test_failed_load_keeps_loading_screen() {
    let mut app = App::new(PlateSnapshot::builtin(), Config::default());
    app.mount_with(async { Err(AssetError::Cancelled) });
    app.settle().await;

    assert_only_loading(&render(&mut app, 80, 40));
}

#[tokio::test]
async fn test_ready_screen_composition() {
    let mut app = ready_app().await;
    let buf = render(&mut app, WIDE, 80);

    assert_eq!(count(&buf, "Loading..."), 0);
    assert_eq!(count(&buf, "Today's Plate"), 1);
    assert_eq!(count(&buf, "Calories"), 1);
    assert_eq!(count(&buf, "Until goal:"), 1);
    for label in ["Carbohydrates", "Protein", "Vegetables", "Fruits", "Fats"] {
        assert_eq!(count(&buf, label), 1, "{}", label);
    }
    assert_eq!(count(&buf, "Home"), 1);
    assert_eq!(count(&buf, "Profile"), 1);

    // Navigation bar is the last thing on screen
    let nav = row_of(&buf, "Home").unwrap();
    assert!(nav > row_of(&buf, "Fats").unwrap());
    assert_eq!(nav, 78);
}

#[tokio::test]
async fn test_food_panel_toggles_from_chevron() {
    let mut app = ready_app().await;
    let buf = render(&mut app, WIDE, 80);
    for caption in CAPTIONS {
        assert_eq!(count(&buf, caption), 0);
    }

    // Only the carbohydrate chevron is clickable
    assert_eq!(app.hit_zones().len(), 1);
    let zone = app.hit_zones()[0];
    assert_eq!(zone.card, 0);
    assert_eq!(row_of(&buf, "Carbohydrates"), Some(zone.area.y));

    assert!(app.apply(Action::Click {
        x: zone.area.x + 1,
        y: zone.area.y,
    }));
    let buf = render(&mut app, WIDE, 80);
    let caption_rows: Vec<u16> = CAPTIONS
        .iter()
        .map(|c| {
            assert_eq!(count(&buf, c), 1, "{}", c);
            row_of(&buf, c).unwrap()
        })
        .collect();
    // Each row carries its own image next to its caption
    let screen = rows(&buf);
    for (i, &row) in caption_rows.iter().enumerate() {
        let line = &screen[row as usize];
        let glyph_at = line.find(FOOD_GLYPHS[i]).unwrap();
        assert!(glyph_at < line.find(CAPTIONS[i]).unwrap());
        for (j, other) in FOOD_GLYPHS.iter().enumerate() {
            if j != i {
                assert!(!line.contains(other), "row {} shows image {}", i, j);
            }
        }
    }
    assert!(caption_rows.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(count(&buf, "›"), 3);
    // Panel sits between the carbohydrate bar and the next card
    assert!(caption_rows[0] > row_of(&buf, "115g to go").unwrap());
    assert!(caption_rows[2] < row_of(&buf, "Protein").unwrap());

    // Second tap removes it again
    app.apply(Action::Click {
        x: zone.area.x + 1,
        y: zone.area.y,
    });
    let buf = render(&mut app, WIDE, 80);
    for caption in CAPTIONS {
        assert_eq!(count(&buf, caption), 0);
    }
}

#[tokio::test]
async fn test_even_toggles_restore_collapsed() {
    let mut app = ready_app().await;
    let before = render(&mut app, WIDE, 80);
    for _ in 0..4 {
        app.apply(Action::Toggle);
    }
    let after = render(&mut app, WIDE, 80);
    assert_eq!(rows(&before), rows(&after));
}

#[tokio::test]
async fn test_card_fills_match_snapshot() {
    let mut app = ready_app().await;
    let buf = render(&mut app, WIDE, 80);
    let plate = PlateSnapshot::builtin();

    let expected = [
        ("12g to go", 80),
        ("Great job!", 100),
        ("1/4 cup to go", 80),
        ("28g to go", 40),
    ];
    for (spec, (note, percent)) in plate.cards[1..].iter().zip(expected) {
        assert_eq!(spec.note, note);
        let bar = row_of(&buf, note).unwrap();
        assert_eq!(cells_with_bg(&buf, bar, spec.fill_color), percent, "{}", spec.label);
    }
}

#[tokio::test]
async fn test_calorie_summary() {
    let mut app = ready_app().await;
    let fill = Theme::default().calorie_fill;

    let buf = render(&mut app, WIDE, 80);
    assert_eq!(count(&buf, "1030"), 1);
    assert_eq!(count(&buf, "800"), 1);
    let bar = row_of(&buf, "Calories").unwrap() + 2;
    assert_eq!(cells_with_bg(&buf, bar, fill), 56);

    // Expanding a card doesn't move or resize the calorie bar
    app.toggle(0);
    let buf = render(&mut app, WIDE, 80);
    assert_eq!(cells_with_bg(&buf, bar, fill), 56);
}

#[tokio::test]
async fn test_scroll_keeps_nav_bar() {
    let mut app = ready_app().await;
    let buf = render(&mut app, WIDE, 20);
    assert_eq!(row_of(&buf, "Today's Plate"), Some(2));

    app.apply(Action::Scroll(5));
    let buf = render(&mut app, WIDE, 20);
    assert_eq!(count(&buf, "Today's Plate"), 0);
    assert_eq!(row_of(&buf, "Home"), Some(18));

    // Scrolling past the end stops at the spacer
    app.apply(Action::Bottom);
    app.apply(Action::Scroll(50));
    let buf = render(&mut app, WIDE, 20);
    assert_eq!(count(&buf, "Fats"), 1);
}

#[tokio::test]
async fn test_focus_scrolls_card_into_view() {
    let mut app = ready_app().await;
    let buf = render(&mut app, WIDE, 20);
    assert_eq!(count(&buf, "Fats"), 0);

    app.apply(Action::FocusPrev);
    let buf = render(&mut app, WIDE, 20);
    assert_eq!(count(&buf, "Fats"), 1);
    assert!(app.scroll() > 0);
}

#[tokio::test]
async fn test_ascii_glyphs_cover_image_fallbacks() {
    let mut config = Config::default();
    config.appearance.glyphs = GlyphStyle::Ascii;
    let mut app = App::new(PlateSnapshot::builtin(), config);
    app.mount_with(async { Ok(FontBook::default()) });
    app.settle().await;
    app.toggle(0);

    let buf = render(&mut app, WIDE, 80);
    for glyph in FOOD_GLYPHS.iter().chain(&["☺"]) {
        assert_eq!(count(&buf, glyph), 0, "{} drawn in ascii mode", glyph);
    }
    // Avatar fallback opens the header row
    assert_eq!(rows(&buf)[0].trim_start().chars().next(), Some('@'));
    for (caption, ascii) in CAPTIONS.iter().zip(["R", "O", "B"]) {
        let line = &rows(&buf)[row_of(&buf, caption).unwrap() as usize];
        let before_caption = &line[..line.find(caption).unwrap()];
        assert_eq!(before_caption.matches(ascii).count(), 1, "{}", caption);
    }
}

#[tokio::test]
async fn test_hidden_chevron_not_clickable() {
    let mut app = ready_app().await;
    render(&mut app, WIDE, 20);
    app.apply(Action::Scroll(20));
    render(&mut app, WIDE, 20);
    // Carbohydrate card scrolled out of view
    assert!(app.hit_zones().is_empty());
}
