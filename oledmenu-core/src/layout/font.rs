//! Font selection by pixel-height budget
//!
//! The driver owns the actual glyph data; the menu only deals in opaque
//! [`FontId`]s ordered from the smallest to the largest glyph height.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest glyph height covered by a font table
pub const DEFAULT_MIN_FONT_HEIGHT: u8 = 3;

/// Largest glyph height covered by a font table
pub const DEFAULT_MAX_FONT_HEIGHT: u8 = 23;

/// Driver-specific font identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontId(pub u8);

/// Ordered mapping from pixel-height buckets to fonts
///
/// Entry `i` is the font for a target height of `min_height + i` pixels.
#[derive(Debug, Clone, Copy)]
pub struct FontTable {
    fonts: &'static [FontId],
    fallback: FontId,
    min_height: u8,
    max_height: u8,
}

impl FontTable {
    /// Create a table covering the default height range
    pub const fn new(fonts: &'static [FontId], fallback: FontId) -> Self {
        Self {
            fonts,
            fallback,
            min_height: DEFAULT_MIN_FONT_HEIGHT,
            max_height: DEFAULT_MAX_FONT_HEIGHT,
        }
    }

    /// Table with a single font used for every height
    pub const fn single(font: FontId) -> Self {
        Self::new(&[], font)
    }

    /// Override the covered height range
    pub const fn with_height_range(mut self, min_height: u8, max_height: u8) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self
    }

    /// Font used whenever the lookup falls outside the table
    pub const fn fallback(&self) -> FontId {
        self.fallback
    }

    /// Number of fonts in the table
    pub const fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Check if the table has no fonts (always falls back)
    pub const fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Glyph height that fits `lines` rows into `display_height` pixels
    pub fn target_height(display_height: u16, lines: u8) -> u16 {
        display_height / u16::from(lines.max(1))
    }

    /// Pick the font for `lines` rows on a panel `display_height` pixels tall
    pub fn select(&self, display_height: u16, lines: u8) -> FontId {
        let height = Self::target_height(display_height, lines);

        if height < u16::from(self.min_height) || height > u16::from(self.max_height) {
            return self.fallback;
        }

        let index = usize::from(height - u16::from(self.min_height));
        self.fonts.get(index).copied().unwrap_or(self.fallback)
    }
}
