use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::assets::FontManifest;
use crate::icons::{GlyphStyle, IconRef};
use crate::plate::{
    CalorieSummary, FillPercent, FillPolicy, FoodItem, ImageRef, MacroCardSpec, PlateSnapshot,
    SnapshotError,
};
use crate::ui::theme::{serde_color, Theme};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub assets: AssetsConfig,
    pub appearance: AppearanceConfig,
    pub images: ImagesConfig,
    /// Replaces the built-in plate when present
    pub plate: Option<PlateConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Base directory for relative font and image paths
    pub root: PathBuf,
    /// Fonts that must load before the screen renders
    pub fonts: FontManifest,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        let root = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("todays-plate");
        Self {
            root,
            fonts: FontManifest::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Theme preset: "plate" or "cocoa"
    pub theme: String,
    /// Glyph table for icons: "emoji" or "ascii"
    pub glyphs: GlyphStyle,
    /// Use 24-bit colors; off approximates to the 256-color palette
    pub true_color: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: "plate".to_string(),
            glyphs: GlyphStyle::default(),
            true_color: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Enable graphics-protocol images
    pub enabled: bool,
    /// Force images over SSH (normally disabled)
    pub force_over_ssh: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            force_over_ssh: false,
        }
    }
}

/// `[plate]` section: a full replacement for the built-in snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateConfig {
    #[serde(default)]
    pub fill_policy: FillPolicy,
    pub title: String,
    pub avatar: ImageRef,
    pub calories: CaloriesConfig,
    pub cards: Vec<CardConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaloriesConfig {
    pub consumed: u32,
    pub remaining: u32,
    pub fill_percent: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConfig {
    pub label: String,
    pub note: String,
    #[serde(with = "serde_color")]
    pub card_color: Color,
    #[serde(with = "serde_color")]
    pub fill_color: Color,
    #[serde(with = "serde_color")]
    pub track_color: Color,
    pub fill_percent: i64,
    pub icon: IconRef,
    #[serde(default)]
    pub expandable: bool,
    #[serde(default)]
    pub foods: Vec<FoodItem>,
}

impl PlateConfig {
    /// Validate the section into a snapshot, applying the fill policy
    pub fn into_snapshot(self) -> Result<PlateSnapshot, SnapshotError> {
        if self.cards.is_empty() {
            return Err(SnapshotError::NoCards);
        }
        let policy = self.fill_policy;
        let calories = CalorieSummary {
            consumed: self.calories.consumed,
            remaining: self.calories.remaining,
            fill_percent: FillPercent::with_policy(self.calories.fill_percent, policy, "calories")?,
        };
        let cards = self
            .cards
            .into_iter()
            .map(|card| {
                let fill_percent = FillPercent::with_policy(card.fill_percent, policy, &card.label)?;
                if !card.expandable && !card.foods.is_empty() {
                    tracing::warn!("Card '{}' lists foods but is not expandable", card.label);
                }
                Ok(MacroCardSpec {
                    label: card.label,
                    note: card.note,
                    card_color: card.card_color,
                    fill_color: card.fill_color,
                    track_color: card.track_color,
                    fill_percent,
                    icon: card.icon,
                    expandable: card.expandable,
                    foods: card.foods,
                })
            })
            .collect::<Result<Vec<_>, SnapshotError>>()?;

        Ok(PlateSnapshot {
            title: self.title,
            avatar: self.avatar,
            calories,
            cards,
        })
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            tracing::info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        let root = shellexpand::tilde(&config.assets.root.to_string_lossy()).into_owned();
        config.assets.root = PathBuf::from(root);
        Ok(config)
    }

    /// Resolve theme from config, falling back to the default preset
    pub fn resolve_theme(&self) -> Theme {
        let theme = Theme::from_preset(&self.appearance.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme '{}', using default", self.appearance.theme);
            Theme::default()
        });
        if self.appearance.true_color {
            theme
        } else {
            theme.to_256_color()
        }
    }

    /// Snapshot to render: the `[plate]` section if present, else the built-in one
    pub fn snapshot(&self) -> Result<PlateSnapshot> {
        match &self.plate {
            Some(plate) => plate
                .clone()
                .into_snapshot()
                .context("Invalid [plate] section"),
            None => Ok(PlateSnapshot::builtin()),
        }
    }

    /// Whether graphics images should be attempted
    pub fn images_enabled(&self) -> bool {
        if !self.images.enabled {
            return false;
        }
        let over_ssh = std::env::var_os("SSH_CONNECTION").is_some();
        if over_ssh && !self.images.force_over_ssh {
            tracing::info!("Images disabled over SSH");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATE_TOML: &str = r##"
[appearance]
theme = "cocoa"
glyphs = "ascii"

[plate]
fill_policy = "reject"
title = "Lunch"
avatar = { fallback = "@" }
calories = { consumed = 400, remaining = 1200, fill_percent = 25 }

[[plate.cards]]
label = "Protein"
note = "30g to go"
card_color = "#9CCEDF"
fill_color = "#5F99C9"
track_color = "#70B9D2"
fill_percent = 50
icon = { set = "material-community", name = "egg" }
"##;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.appearance.theme, "plate");
        assert_eq!(config.appearance.glyphs, GlyphStyle::Emoji);
        assert_eq!(config.assets.fonts, FontManifest::default());
        assert_eq!(config.snapshot().unwrap(), PlateSnapshot::builtin());
    }

    #[test]
    fn test_plate_section() {
        let config = Config::parse(PLATE_TOML).unwrap();
        assert_eq!(config.resolve_theme(), Theme::cocoa());
        assert_eq!(config.appearance.glyphs, GlyphStyle::Ascii);

        let plate = config.snapshot().unwrap();
        assert_eq!(plate.title, "Lunch");
        assert_eq!(plate.calories.fill_percent.get(), 25);
        assert_eq!(plate.cards.len(), 1);
        assert_eq!(plate.cards[0].card_color, Color::Rgb(0x9C, 0xCE, 0xDF));
        assert!(!plate.cards[0].expandable);
    }

    #[test]
    fn test_fill_policy_applied() {
        let rejecting = PLATE_TOML.replace("fill_percent = 50", "fill_percent = 150");
        let config = Config::parse(&rejecting).unwrap();
        assert!(config.snapshot().is_err());

        let clamping = rejecting.replace("\"reject\"", "\"clamp\"");
        let config = Config::parse(&clamping).unwrap();
        assert_eq!(config.snapshot().unwrap().cards[0].fill_percent.get(), 100);
    }

    #[test]
    fn test_bad_color_rejected() {
        let broken = PLATE_TOML.replace("#5F99C9", "#5F99");
        assert!(Config::parse(&broken).is_err());
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let config = Config::parse("[appearance]\ntheme = \"neon\"\ntrue_color = false").unwrap();
        assert_eq!(config.resolve_theme(), Theme::plate().to_256_color());
    }

    #[test]
    fn test_load_missing_file() {
        let config = Config::load("/nonexistent/todays-plate.toml").unwrap();
        assert!(config.plate.is_none());
    }
}
