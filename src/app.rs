use std::future::Future;

use ratatui::layout::Rect;

use crate::action::Action;
use crate::assets::{self, AssetError, AssetLoad, FontBook};
use crate::config::Config;
use crate::icons::GlyphStyle;
use crate::plate::PlateSnapshot;
use crate::ui::layout;
use crate::ui::Theme;

/// Font readiness - gates everything but the loading line
#[derive(Debug)]
pub enum Readiness {
    /// Fonts still loading
    Pending,
    /// Fonts resolved; never leaves this state
    Ready(FontBook),
    /// Loading failed; drawn exactly like `Pending`
    Failed,
}

/// Clickable chevron from the last draw, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitZone {
    pub area: Rect,
    pub card: usize,
}

/// Application state for the plate screen
pub struct App {
    /// What the screen shows
    snapshot: PlateSnapshot,
    /// Configuration
    config: Config,
    /// Resolved theme
    theme: Theme,
    /// Font readiness
    readiness: Readiness,
    /// Running font load, if any
    load: Option<AssetLoad>,
    /// Whether the font load was ever started
    mounted: bool,
    /// Expand flag per card
    expanded: Vec<bool>,
    /// Card with keyboard focus
    focused: usize,
    /// Scroll the focused card into view on the next draw
    reveal_focus: bool,
    /// First content row shown
    scroll: u16,
    /// Largest valid scroll offset, from the last draw
    max_scroll: u16,
    /// Content viewport height, from the last draw
    viewport_height: u16,
    /// Chevrons from the last draw
    hit_zones: Vec<HitZone>,
}

impl App {
    pub fn new(snapshot: PlateSnapshot, config: Config) -> Self {
        let theme = config.resolve_theme();
        let expanded = vec![false; snapshot.cards.len()];
        Self {
            snapshot,
            config,
            theme,
            readiness: Readiness::Pending,
            load: None,
            mounted: false,
            expanded,
            focused: 0,
            reveal_focus: false,
            scroll: 0,
            max_scroll: 0,
            viewport_height: 0,
            hit_zones: Vec::new(),
        }
    }

    /// Start loading the configured fonts. Only the first call does anything.
    pub fn mount(&mut self) {
        let manifest = self.config.assets.fonts.clone();
        let root = self.config.assets.root.clone();
        self.mount_with(assets::load_fonts(manifest, root));
    }

    /// Start `load` as the font load. Only the first mount does anything.
    pub fn mount_with<F>(&mut self, load: F)
    where
        F: Future<Output = Result<FontBook, AssetError>> + Send + 'static,
    {
        if self.mounted {
            return;
        }
        self.mounted = true;
        tracing::debug!("Loading fonts");
        self.load = Some(AssetLoad::spawn(load));
    }

    /// Pick up the font load result without blocking
    pub fn poll_assets(&mut self) {
        let Some(load) = self.load.as_mut() else {
            return;
        };
        if let Some(result) = load.try_take() {
            self.finish_load(result);
        }
    }

    /// Wait for the font load to finish
    #[cfg(test)]
    pub async fn settle(&mut self) {
        let Some(load) = self.load.as_mut() else {
            return;
        };
        let result = load.wait().await;
        self.finish_load(result);
    }

    fn finish_load(&mut self, result: Result<FontBook, AssetError>) {
        self.load = None;
        if !matches!(self.readiness, Readiness::Pending) {
            return;
        }
        self.readiness = match result {
            Ok(fonts) => {
                if fonts.is_empty() {
                    tracing::warn!("No font families declared; text draws plain");
                }
                tracing::info!("Fonts ready ({} families)", fonts.len());
                Readiness::Ready(fonts)
            }
            Err(e) => {
                tracing::error!("Font loading failed: {}", e);
                Readiness::Failed
            }
        };
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    /// Fonts, once ready
    pub fn fonts(&self) -> Option<&FontBook> {
        match &self.readiness {
            Readiness::Ready(fonts) => Some(fonts),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.fonts().is_some()
    }

    pub fn snapshot(&self) -> &PlateSnapshot {
        &self.snapshot
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn glyphs(&self) -> GlyphStyle {
        self.config.appearance.glyphs
    }

    pub fn is_expanded(&self, card: usize) -> bool {
        self.expanded.get(card).copied().unwrap_or(false)
    }

    /// Expand state of the carbohydrate card, the first expandable card
    #[cfg(test)]
    pub fn carb_expanded(&self) -> bool {
        self.snapshot
            .cards
            .iter()
            .position(|c| c.expandable)
            .is_some_and(|i| self.is_expanded(i))
    }

    /// Flip a card's expand state. Returns false, changing nothing, for
    /// cards that can't expand or before the screen is ready.
    pub fn toggle(&mut self, card: usize) -> bool {
        if !self.is_ready() {
            return false;
        }
        let Some(spec) = self.snapshot.cards.get(card) else {
            return false;
        };
        if !spec.expandable {
            tracing::debug!("Card '{}' is not expandable", spec.label);
            return false;
        }
        let flag = &mut self.expanded[card];
        *flag = !*flag;
        tracing::debug!(
            "Card '{}' {}",
            spec.label,
            if *flag { "expanded" } else { "collapsed" }
        );
        true
    }

    pub fn toggle_focused(&mut self) -> bool {
        self.toggle(self.focused)
    }

    /// Toggle the card whose chevron is at (x, y)
    pub fn click(&mut self, x: u16, y: u16) -> bool {
        let hit = self
            .hit_zones
            .iter()
            .find(|zone| zone.area.contains((x, y).into()))
            .map(|zone| zone.card);
        match hit {
            Some(card) => {
                self.focused = card;
                self.toggle(card)
            }
            None => false,
        }
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Move focus to the next card, wrapping
    pub fn focus_next(&mut self) {
        let total = self.snapshot.cards.len();
        if total > 0 {
            self.focused = (self.focused + 1) % total;
            self.reveal_focus = true;
        }
    }

    /// Move focus to the previous card, wrapping
    pub fn focus_prev(&mut self) {
        let total = self.snapshot.cards.len();
        if total > 0 {
            self.focused = (self.focused + total - 1) % total;
            self.reveal_focus = true;
        }
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Scroll by `delta` rows, clamped to the content
    pub fn scroll_by(&mut self, delta: i32) {
        let target = (self.scroll as i32 + delta).clamp(0, self.max_scroll as i32);
        self.scroll = target as u16;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll;
    }

    /// Rows one page scroll moves
    pub fn page_height(&self) -> u16 {
        self.viewport_height.saturating_sub(1).max(1)
    }

    /// Called by the draw pass with the geometry it just laid out.
    /// `focused_card` is the focused card's rect in content coordinates.
    pub fn update_viewport(
        &mut self,
        content_height: u16,
        viewport_height: u16,
        focused_card: Option<Rect>,
    ) {
        self.viewport_height = viewport_height;
        self.max_scroll = layout::max_scroll(content_height, viewport_height);
        if self.reveal_focus {
            if let Some(card) = focused_card {
                self.scroll = layout::reveal(self.scroll, card, viewport_height);
            }
            self.reveal_focus = false;
        }
        self.scroll = self.scroll.min(self.max_scroll);
    }

    pub fn set_hit_zones(&mut self, zones: Vec<HitZone>) {
        self.hit_zones = zones;
    }

    #[cfg(test)]
    pub fn hit_zones(&self) -> &[HitZone] {
        &self.hit_zones
    }

    /// Apply an input action. Returns false when the app should exit.
    pub fn apply(&mut self, action: Action) -> bool {
        if action == Action::Quit {
            return false;
        }
        if !self.is_ready() {
            // Nothing on screen is interactive yet
            return true;
        }
        match action {
            Action::Quit => return false,
            Action::FocusNext => self.focus_next(),
            Action::FocusPrev => self.focus_prev(),
            Action::Toggle => {
                self.toggle_focused();
            }
            Action::Click { x, y } => {
                self.click(x, y);
            }
            Action::Scroll(delta) => self.scroll_by(delta),
            Action::PageDown => self.scroll_by(self.page_height() as i32),
            Action::PageUp => self.scroll_by(-(self.page_height() as i32)),
            Action::Top => self.scroll_to_top(),
            Action::Bottom => self.scroll_to_bottom(),
        }
        true
    }
}
