//! Plate snapshot - the read-only data the screen renders.
//!
//! Everything on screen (calorie numbers, macro goals, food lists) comes
//! from a [`PlateSnapshot`] injected into the app. The built-in snapshot
//! carries the stock values; `[plate]` in the config file replaces it.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::icons::{GlyphStyle, IconRef, IconSet, UNKNOWN_GLYPH};
use crate::ui::theme::serde_color;

/// Errors raised while building a snapshot
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("fill percent {value} for '{label}' is outside 0..=100")]
    FillOutOfRange { label: String, value: i64 },
    #[error("plate has no cards")]
    NoCards,
}

/// What to do with a fill percent outside `0..=100`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPolicy {
    /// Pin to the nearest bound
    #[default]
    Clamp,
    /// Refuse the snapshot
    Reject,
}

/// Progress bar fill, always within `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FillPercent(u8);

impl FillPercent {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self(100);

    /// Build a fill percent, pinning out-of-range values to the bounds
    pub const fn clamped(raw: i64) -> Self {
        if raw < 0 {
            Self::EMPTY
        } else if raw > 100 {
            Self::FULL
        } else {
            Self(raw as u8)
        }
    }

    /// Build a fill percent under the given policy.
    /// `label` names the owner for the error message.
    pub fn with_policy(raw: i64, policy: FillPolicy, label: &str) -> Result<Self, SnapshotError> {
        let in_range = (0..=100).contains(&raw);
        match policy {
            FillPolicy::Clamp => {
                if !in_range {
                    tracing::warn!("Fill percent {} for '{}' clamped", raw, label);
                }
                Ok(Self::clamped(raw))
            }
            FillPolicy::Reject if in_range => Ok(Self(raw as u8)),
            FillPolicy::Reject => Err(SnapshotError::FillOutOfRange {
                label: label.to_string(),
                value: raw,
            }),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Reference to an image asset, with a glyph shown when the image can't be drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image file; relative paths resolve against `assets.root`
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Glyph used without graphics support
    pub fallback: String,
    /// Stand-in for `fallback` when icons are drawn as ascii
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascii: Option<String>,
}

impl ImageRef {
    pub fn new(path: &str, fallback: &str) -> Self {
        Self {
            path: Some(PathBuf::from(path)),
            fallback: fallback.to_string(),
            ascii: None,
        }
    }

    pub fn with_ascii(mut self, ascii: &str) -> Self {
        self.ascii = Some(ascii.to_string());
        self
    }

    /// Text drawn in place of the image for the given glyph style.
    /// Ascii mode never emits a non-ascii fallback.
    pub fn fallback_glyph(&self, style: GlyphStyle) -> &str {
        match style {
            GlyphStyle::Emoji => &self.fallback,
            GlyphStyle::Ascii => match &self.ascii {
                Some(ascii) => ascii,
                None if self.fallback.is_ascii() => &self.fallback,
                None => UNKNOWN_GLYPH,
            },
        }
    }
}

/// One food row in an expanded card: the image and its caption travel together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub image: ImageRef,
    pub label: String,
}

/// Everything needed to draw one macro card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroCardSpec {
    pub label: String,
    /// Text shown inside the filled part of the bar
    pub note: String,
    #[serde(with = "serde_color")]
    pub card_color: Color,
    #[serde(with = "serde_color")]
    pub fill_color: Color,
    /// Unfilled part of the bar
    #[serde(with = "serde_color")]
    pub track_color: Color,
    pub fill_percent: FillPercent,
    pub icon: IconRef,
    /// Whether the chevron toggles a food panel
    pub expandable: bool,
    pub foods: Vec<FoodItem>,
}

/// Calorie summary box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalorieSummary {
    pub consumed: u32,
    /// Calories left until the daily goal
    pub remaining: u32,
    pub fill_percent: FillPercent,
}

/// The full read-only snapshot behind the screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateSnapshot {
    pub title: String,
    pub avatar: ImageRef,
    pub calories: CalorieSummary,
    pub cards: Vec<MacroCardSpec>,
}

impl Default for PlateSnapshot {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PlateSnapshot {
    /// Stock plate shipped with the app
    pub fn builtin() -> Self {
        Self {
            title: "Today's Plate".to_string(),
            avatar: ImageRef::new("images/Intersect.png", "☺").with_ascii("@"),
            calories: CalorieSummary {
                consumed: 1030,
                remaining: 800,
                fill_percent: FillPercent::clamped(56),
            },
            cards: vec![
                MacroCardSpec {
                    label: "Carbohydrates".to_string(),
                    note: "115g to go".to_string(),
                    card_color: Color::Rgb(0xFD, 0xC4, 0x8C),
                    fill_color: Color::Rgb(0xE4, 0x7A, 0x00),
                    track_color: Color::Rgb(0xF8, 0xB0, 0x6A),
                    fill_percent: FillPercent::clamped(60),
                    icon: IconRef::new(IconSet::MaterialCommunity, "rice"),
                    expandable: true,
                    foods: vec![
                        FoodItem {
                            image: ImageRef::new("images/image26.png", "🍚").with_ascii("R"),
                            label: "90 Second Brown Rice, Quinoa & Red Rice with Flaxseeds..."
                                .to_string(),
                        },
                        FoodItem {
                            image: ImageRef::new("images/image27.png", "🥣").with_ascii("O"),
                            label: "Quaker Express Maple Brown Sugar Oatmeal 1.69oz".to_string(),
                        },
                        FoodItem {
                            image: ImageRef::new("images/image28.png", "🍞").with_ascii("B"),
                            label: "Sliced Sourdough Bread - 17oz - Favorite Day™".to_string(),
                        },
                    ],
                },
                simple_card(
                    "Protein",
                    "12g to go",
                    [(0x9C, 0xCE, 0xDF), (0x5F, 0x99, 0xC9), (0x70, 0xB9, 0xD2)],
                    80,
                    IconRef::new(IconSet::MaterialCommunity, "egg"),
                ),
                simple_card(
                    "Vegetables",
                    "Great job!",
                    [(0xB4, 0xCE, 0xB3), (0x87, 0xA8, 0x78), (0xAE, 0xDF, 0xA3)],
                    100,
                    IconRef::new(IconSet::MaterialCommunity, "carrot"),
                ),
                simple_card(
                    "Fruits",
                    "1/4 cup to go",
                    [(0xFA, 0xD4, 0xD8), (0xE3, 0x88, 0x9D), (0xF4, 0xB8, 0xC6)],
                    80,
                    IconRef::new(IconSet::MaterialCommunity, "fruit-cherries"),
                ),
                simple_card(
                    "Fats",
                    "28g to go",
                    [(0xFF, 0xE6, 0xB7), (0xD7, 0xB3, 0x51), (0xE8, 0xD3, 0x9B)],
                    40,
                    IconRef::new(IconSet::FontAwesome5, "hamburger"),
                ),
            ],
        }
    }

    /// Every image the screen may draw, avatar first
    pub fn image_refs(&self) -> impl Iterator<Item = &ImageRef> {
        std::iter::once(&self.avatar)
            .chain(self.cards.iter().flat_map(|c| c.foods.iter().map(|f| &f.image)))
    }
}

/// Card without a food panel; colors are (card, fill, track)
fn simple_card(
    label: &str,
    note: &str,
    colors: [(u8, u8, u8); 3],
    percent: i64,
    icon: IconRef,
) -> MacroCardSpec {
    let [card, fill, track] = colors.map(|(r, g, b)| Color::Rgb(r, g, b));
    MacroCardSpec {
        label: label.to_string(),
        note: note.to_string(),
        card_color: card,
        fill_color: fill,
        track_color: track,
        fill_percent: FillPercent::clamped(percent),
        icon,
        expandable: false,
        foods: Vec::new(),
    }
}
