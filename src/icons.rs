//! Icon glyphs and image loading.
//!
//! Icons are looked up by (icon set, name) and drawn as text glyphs.
//! Images (avatar, food thumbnails) go through a terminal graphics protocol
//! when one is available:
//! - Kitty graphics protocol (kitty terminal)
//! - Sixel graphics (foot, mlterm, xterm)
//! - iTerm2 protocol (iTerm2, WezTerm)
//!
//! Without one, an image is drawn as its fallback glyph.

use parking_lot::Mutex;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::plate::ImageRef;

/// Vector icon families the plate screen draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconSet {
    Feather,
    Ionicons,
    MaterialCommunity,
    FontAwesome5,
}

/// A named icon within a set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconRef {
    pub set: IconSet,
    pub name: String,
}

impl IconRef {
    pub fn new(set: IconSet, name: &str) -> Self {
        Self {
            set,
            name: name.to_string(),
        }
    }
}

/// Which glyph table to draw icons from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphStyle {
    #[default]
    Emoji,
    Ascii,
}

/// Shown for icons missing from the table
pub const UNKNOWN_GLYPH: &str = "?";

/// (set, name, emoji, ascii)
const GLYPHS: &[(IconSet, &str, &str, &str)] = &[
    (IconSet::Feather, "menu", "☰", "="),
    (IconSet::Feather, "chevron-down", "▾", "v"),
    (IconSet::Feather, "chevron-up", "▴", "^"),
    (IconSet::Feather, "chevron-right", "›", ">"),
    (IconSet::Feather, "home", "⌂", "H"),
    (IconSet::Feather, "pie-chart", "◔", "P"),
    (IconSet::Feather, "trending-up", "↗", "%"),
    (IconSet::Feather, "user", "☺", "@"),
    (IconSet::Ionicons, "arrow-back", "←", "<"),
    (IconSet::MaterialCommunity, "rice", "🍚", "R"),
    (IconSet::MaterialCommunity, "egg", "🥚", "E"),
    (IconSet::MaterialCommunity, "carrot", "🥕", "V"),
    (IconSet::MaterialCommunity, "fruit-cherries", "🍒", "F"),
    (IconSet::FontAwesome5, "hamburger", "🍔", "B"),
];

/// Resolve an icon to the glyph drawn for it
pub fn glyph(icon: &IconRef, style: GlyphStyle) -> &'static str {
    GLYPHS
        .iter()
        .find(|(set, name, _, _)| *set == icon.set && *name == icon.name)
        .map(|&(_, _, emoji, ascii)| match style {
            GlyphStyle::Emoji => emoji,
            GlyphStyle::Ascii => ascii,
        })
        .unwrap_or(UNKNOWN_GLYPH)
}

/// Shorthand for the Feather icons the screen chrome uses
pub fn feather(name: &str, style: GlyphStyle) -> &'static str {
    glyph(&IconRef::new(IconSet::Feather, name), style)
}

/// Image manager - handles image loading and caching
/// Must be initialized once at startup before entering raw mode
pub struct ImageManager {
    /// The picker determines the graphics protocol and font size
    picker: Option<Picker>,
    /// Base directory for relative image paths
    root: PathBuf,
    /// Cache of loaded protocols by resolved path
    cache: HashMap<PathBuf, Arc<Mutex<StatefulProtocol>>>,
}

impl ImageManager {
    /// Create a new image manager by querying the terminal
    /// MUST be called before entering raw mode / alternate screen
    pub fn new(root: PathBuf) -> Self {
        let picker = match Picker::from_query_stdio() {
            Ok(p) => {
                tracing::info!("Graphics protocol detected: {:?}", p.protocol_type());
                Some(p)
            }
            Err(e) => {
                tracing::debug!("No graphics protocol available: {}", e);
                None
            }
        };

        Self {
            picker,
            root,
            cache: HashMap::new(),
        }
    }

    /// Manager that never draws images; every image renders as its glyph
    pub fn disabled() -> Self {
        Self {
            picker: None,
            root: PathBuf::new(),
            cache: HashMap::new(),
        }
    }

    /// Check if graphics images are supported
    pub fn supports_graphics(&self) -> bool {
        self.picker.is_some()
    }

    /// Load every image up front so drawing only reads the cache
    pub fn preload<'a>(&mut self, images: impl IntoIterator<Item = &'a ImageRef>) {
        if !self.supports_graphics() {
            return;
        }
        let loaded = images
            .into_iter()
            .filter(|image| self.load(image).is_some())
            .count();
        tracing::debug!("Preloaded {} images", loaded);
    }

    /// Load an image, returning a cached protocol if available
    pub fn load(&mut self, image: &ImageRef) -> Option<Arc<Mutex<StatefulProtocol>>> {
        let path = resolve_image_path(&self.root, image)?;
        if let Some(cached) = self.cache.get(&path) {
            return Some(cached.clone());
        }

        let picker = self.picker.as_mut()?;
        let dyn_img = match image::open(&path) {
            Ok(img) => img,
            Err(e) => {
                tracing::debug!("Failed to load image {}: {}", path.display(), e);
                return None;
            }
        };

        let protocol = picker.new_resize_protocol(dyn_img);
        let arc = Arc::new(Mutex::new(protocol));
        self.cache.insert(path, arc.clone());
        Some(arc)
    }

    /// Get a cached image protocol
    pub fn get_cached(&self, image: &ImageRef) -> Option<Arc<Mutex<StatefulProtocol>>> {
        let path = resolve_image_path(&self.root, image)?;
        self.cache.get(&path).cloned()
    }
}

/// Resolve an image reference to an existing file
pub fn resolve_image_path(root: &Path, image: &ImageRef) -> Option<PathBuf> {
    let path = image.path.as_ref()?;
    let path = if path.is_absolute() {
        path.clone()
    } else {
        root.join(path)
    };
    path.exists().then_some(path)
}
