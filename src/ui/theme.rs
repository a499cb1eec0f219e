//! Theme system for the plate screen
//!
//! Provides:
//! - Theme struct with the screen chrome colors
//! - Built-in presets (plate, cocoa)
//! - Hex color parsing
//! - 256-color fallback
//!
//! Card colors are not part of the theme; they belong to each card in the
//! plate snapshot.

use ratatui::style::Color;
use thiserror::Error;

/// Theme colors for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Screen background
    pub background: Color,
    /// Calorie box and food row background
    pub surface: Color,
    /// Primary text color
    pub foreground: Color,
    /// Header icons, active navigation tab, focus ring
    pub accent: Color,
    /// Secondary text (labels, inactive tabs)
    pub dimmed: Color,
    /// Unfilled part of the calorie bar
    pub calorie_track: Color,
    /// Filled part of the calorie bar
    pub calorie_fill: Color,
    /// Note text drawn on top of a card's fill
    pub on_fill: Color,
    /// Navigation bar background
    pub nav_background: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::plate()
    }
}

impl Theme {
    /// Plate theme - default, warm light palette
    pub fn plate() -> Self {
        Self {
            background: Color::Rgb(250, 238, 232),    // #faeee8
            surface: Color::Rgb(255, 255, 255),       // #ffffff
            foreground: Color::Rgb(0, 0, 0),          // #000000
            accent: Color::Rgb(168, 124, 95),         // #a87c5f
            dimmed: Color::Rgb(120, 104, 92),         // #78685c
            calorie_track: Color::Rgb(224, 216, 206), // #e0d8ce
            calorie_fill: Color::Rgb(91, 61, 31),     // #5b3d1f
            on_fill: Color::Rgb(255, 255, 255),       // #ffffff
            nav_background: Color::Rgb(255, 255, 255), // #ffffff
        }
    }

    /// Cocoa theme - dark variant for dark terminals
    pub fn cocoa() -> Self {
        Self {
            background: Color::Rgb(36, 28, 24),       // #241c18
            surface: Color::Rgb(58, 46, 40),          // #3a2e28
            foreground: Color::Rgb(245, 235, 225),    // #f5ebe1
            accent: Color::Rgb(214, 168, 132),        // #d6a884
            dimmed: Color::Rgb(168, 150, 136),        // #a89688
            calorie_track: Color::Rgb(86, 72, 62),    // #56483e
            calorie_fill: Color::Rgb(228, 122, 0),    // #e47a00
            on_fill: Color::Rgb(255, 255, 255),       // #ffffff
            nav_background: Color::Rgb(48, 38, 33),   // #302621
        }
    }

    /// Load theme from preset name
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "plate" | "default" | "light" => Some(Self::plate()),
            "cocoa" | "dark" => Some(Self::cocoa()),
            _ => None,
        }
    }

    /// Convert to 256-color approximation for limited terminals
    pub fn to_256_color(&self) -> Self {
        Self {
            background: approximate_256(self.background),
            surface: approximate_256(self.surface),
            foreground: approximate_256(self.foreground),
            accent: approximate_256(self.accent),
            dimmed: approximate_256(self.dimmed),
            calorie_track: approximate_256(self.calorie_track),
            calorie_fill: approximate_256(self.calorie_fill),
            on_fill: approximate_256(self.on_fill),
            nav_background: approximate_256(self.nav_background),
        }
    }
}

/// Parse hex color string to Color
/// Supports: #rrggbb, #rgb, rrggbb, rgb, #rrggbbaa (alpha ignored)
pub fn parse_hex_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(ColorError::InvalidHex);
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| ColorError::InvalidHex)
    };

    match s.len() {
        // #rgb -> #rrggbb
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        6 | 8 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        _ => Err(ColorError::InvalidLength),
    }
}

/// Format a color as #rrggbb; non-RGB colors fall back to their name
pub fn format_hex_color(color: Color) -> String {
    match color {
        Color::Rgb(r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
        other => other.to_string(),
    }
}

/// Darken a color toward black; `keep` is the share of each channel kept
pub fn shade(color: Color, keep: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |c: u8| (c as f32 * keep.clamp(0.0, 1.0)).round() as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        c => c,
    }
}

/// Color parsing error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("invalid color length (expected 3, 6, or 8 hex chars)")]
    InvalidLength,
    #[error("invalid hex character")]
    InvalidHex,
}

/// Approximate RGB color to nearest 256-color palette entry
fn approximate_256(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            // 6x6x6 color cube starts at index 16
            // Each axis: 0, 95, 135, 175, 215, 255 -> indices 0-5
            let idx = |c: u8| if c < 48 { 0 } else { (c - 35) / 40 };
            Color::Indexed(16 + 36 * idx(r) + 6 * idx(g) + idx(b))
        }
        c => c,
    }
}

/// Serde helpers for hex colors, usable with `#[serde(with = "serde_color")]`
pub mod serde_color {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(color: &Color, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_hex_color(*color))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_hex_color(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        assert_eq!(parse_hex_color("#FDC48C"), Ok(Color::Rgb(253, 196, 140)));
        assert_eq!(parse_hex_color("e47a00"), Ok(Color::Rgb(228, 122, 0)));
    }

    #[test]
    fn test_parse_hex_3_and_8() {
        assert_eq!(parse_hex_color("#fff"), Ok(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#00000033"), Ok(Color::Rgb(0, 0, 0)));
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert_eq!(parse_hex_color("#gg0000"), Err(ColorError::InvalidHex));
        assert_eq!(parse_hex_color("#ff00"), Err(ColorError::InvalidLength));
        assert_eq!(parse_hex_color("#ééé"), Err(ColorError::InvalidHex));
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex_color(Color::Rgb(91, 61, 31)), "#5b3d1f");
    }

    #[test]
    fn test_shade() {
        // Badge circle: 20% black over the card color
        assert_eq!(shade(Color::Rgb(250, 100, 0), 0.8), Color::Rgb(200, 80, 0));
        assert_eq!(shade(Color::Reset, 0.8), Color::Reset);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Theme::from_preset("plate"), Some(Theme::plate()));
        assert_eq!(Theme::from_preset("Dark"), Some(Theme::cocoa()));
        assert!(Theme::from_preset("nonexistent").is_none());
    }

    #[test]
    fn test_256_fallback() {
        let theme = Theme::plate().to_256_color();
        assert!(matches!(theme.background, Color::Indexed(_)));
        assert_eq!(theme.foreground, Color::Indexed(16));
    }
}
