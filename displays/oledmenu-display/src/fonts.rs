//! Font metrics for the raster target
//!
//! Fonts are identified by index. Ids `0..=20` are ordered by glyph height
//! so that id `n` suits a line budget of `n + 3` pixels; id 21 is the
//! fallback used outside that range.

use oledmenu_core::layout::{DEFAULT_MAX_FONT_HEIGHT, DEFAULT_MIN_FONT_HEIGHT};
use oledmenu_core::{FontId, FontTable};

/// Bounding box of the widest and tallest glyph of a font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GlyphMetrics {
    pub width: u8,
    pub height: u8,
}

impl GlyphMetrics {
    const fn new(width: u8, height: u8) -> Self {
        Self { width, height }
    }
}

/// Number of height-indexed fonts
pub const SIZED_FONTS: usize = (DEFAULT_MAX_FONT_HEIGHT - DEFAULT_MIN_FONT_HEIGHT) as usize + 1;

/// Font used when no sized font matches
pub const FALLBACK_FONT: FontId = FontId(SIZED_FONTS as u8);

const METRICS: [GlyphMetrics; SIZED_FONTS + 1] = [
    GlyphMetrics::new(3, 3),
    GlyphMetrics::new(4, 4),
    GlyphMetrics::new(4, 5),
    GlyphMetrics::new(5, 6),
    GlyphMetrics::new(5, 7),
    GlyphMetrics::new(6, 8),
    GlyphMetrics::new(6, 9),
    GlyphMetrics::new(7, 10),
    GlyphMetrics::new(7, 11),
    GlyphMetrics::new(8, 12),
    GlyphMetrics::new(10, 13),
    GlyphMetrics::new(11, 14),
    GlyphMetrics::new(11, 15),
    GlyphMetrics::new(12, 16),
    GlyphMetrics::new(12, 17),
    GlyphMetrics::new(13, 18),
    GlyphMetrics::new(14, 19),
    GlyphMetrics::new(14, 20),
    GlyphMetrics::new(15, 21),
    GlyphMetrics::new(15, 22),
    GlyphMetrics::new(16, 23),
    // Fallback
    GlyphMetrics::new(9, 11),
];

static SIZED_IDS: [FontId; SIZED_FONTS] = {
    let mut ids = [FontId(0); SIZED_FONTS];
    let mut i = 0;
    while i < SIZED_FONTS {
        ids[i] = FontId(i as u8);
        i += 1;
    }
    ids
};

/// Font table matching [`metrics`]
pub fn font_table() -> FontTable {
    FontTable::new(&SIZED_IDS, FALLBACK_FONT)
}

/// Glyph box of `font`, or of the fallback for unknown ids
pub fn metrics(font: FontId) -> GlyphMetrics {
    METRICS
        .get(usize::from(font.0))
        .copied()
        .unwrap_or(METRICS[SIZED_FONTS])
}
