//! Shape color palette.
//!
//! A fixed, ordered list of line colors. Shapes carry only an index into it;
//! the index is reduced modulo the palette length on every lookup, so any
//! `usize` is a valid index.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Color;

/// Ordered line colors. Never empty.
#[derive(Resource, Debug, Clone)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic()
    }
}

impl Palette {
    /// The classic idle-display colors.
    pub fn classic() -> Self {
        Self {
            colors: vec![
                Color::new(0, 170, 255, 255), // cyan
                Color::new(255, 0, 170, 255), // magenta
                Color::new(255, 255, 0, 255), // yellow
                Color::new(0, 255, 0, 255),   // green
                Color::new(255, 128, 0, 255), // orange
                Color::new(128, 0, 255, 255), // violet
                Color::new(255, 0, 0, 255),   // red
                Color::new(0, 255, 255, 255), // turquoise
            ],
        }
    }

    /// Build a palette from explicit colors. Returns `None` for an empty list.
    #[cfg(test)]
    pub(crate) fn from_colors(colors: Vec<Color>) -> Option<Self> {
        (!colors.is_empty()).then_some(Self { colors })
    }

    /// Color for `index`, wrapping around the palette.
    pub fn color(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
