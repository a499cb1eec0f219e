//! UI module - handles all TUI rendering
//!
//! Structure:
//! - `draw/` - Screen draw functions (loading gate, plate screen)
//! - `theme.rs` - Color themes and presets
//! - `layout.rs` - Section stacking and scroll math
//! - `card.rs` - Macro card widget
//! - `nav.rs` - Bottom navigation bar

pub mod card;
mod draw;
pub mod layout;
pub mod nav;
pub mod theme;

#[cfg(test)]
mod tests;

// Re-export main draw function
pub use draw::draw;

pub use theme::Theme;
