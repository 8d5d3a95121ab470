//! 1 bpp raster display
//!
//! Frames are composed into a back buffer and become visible on
//! `send_buffer`, like a panel driven from a local frame buffer over I2C or
//! SPI. Filled shapes are rasterized; text is kept as [`TextRun`]s (see
//! [`crate::screen`]) with its glyph boxes cleared in solid font mode.

use oledmenu_core::{DisplayError, FontId, FontMode, MenuDisplay};

use crate::fonts::{self, GlyphMetrics, FALLBACK_FONT};
use crate::screen::{Screen, TextRun};

/// Widest supported panel in pixels
pub const MAX_WIDTH: usize = 128;

/// One bit per pixel, one word per row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framebuffer<const W: usize, const H: usize> {
    rows: [u128; H],
}

impl<const W: usize, const H: usize> Default for Framebuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> Framebuffer<W, H> {
    const WIDTH_FITS: () = assert!(W <= MAX_WIDTH, "panel wider than 128 px");

    /// Create a blank frame
    pub const fn new() -> Self {
        let () = Self::WIDTH_FITS;
        Self { rows: [0; H] }
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.rows = [0; H];
    }

    /// Pixel state, false outside the panel
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) if x < W && y < H => self.rows[y] & (1u128 << x) != 0,
            _ => false,
        }
    }

    /// Number of lit pixels
    pub fn lit(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Set or clear a rectangle, clipped to the panel
    pub fn fill(&mut self, x: i32, y: i32, width: u16, height: u16, on: bool) {
        let Some((x0, x1)) = clip(x, width, W) else {
            return;
        };
        let Some((y0, y1)) = clip(y, height, H) else {
            return;
        };

        let mask = span_mask(x0, x1);
        for row in &mut self.rows[y0..y1] {
            if on {
                *row |= mask;
            } else {
                *row &= !mask;
            }
        }
    }
}

/// Clip `[start, start + len)` to `[0, limit)`
fn clip(start: i32, len: u16, limit: usize) -> Option<(usize, usize)> {
    let end = i64::from(start) + i64::from(len);
    let lo = i64::from(start).max(0);
    let hi = end.min(limit as i64);
    if lo >= hi {
        return None;
    }
    Some((lo as usize, hi as usize))
}

/// Bits `lo..hi` set
fn span_mask(lo: usize, hi: usize) -> u128 {
    let upper = if hi >= 128 { u128::MAX } else { (1u128 << hi) - 1 };
    let lower = (1u128 << lo) - 1;
    upper & !lower
}

/// Monochrome panel of `W` x `H` pixels
pub struct RasterDisplay<const W: usize, const H: usize> {
    back: Framebuffer<W, H>,
    front: Framebuffer<W, H>,
    back_text: Screen,
    front_text: Screen,
    font: FontId,
    glyph: GlyphMetrics,
    mode: FontMode,
    detected: bool,
    frames: u32,
}

impl<const W: usize, const H: usize> Default for RasterDisplay<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> RasterDisplay<W, H> {
    /// Create a panel that responds to initialization
    pub fn new() -> Self {
        Self {
            back: Framebuffer::new(),
            front: Framebuffer::new(),
            back_text: Screen::new(),
            front_text: Screen::new(),
            font: FALLBACK_FONT,
            glyph: fonts::metrics(FALLBACK_FONT),
            mode: FontMode::Solid,
            detected: true,
            frames: 0,
        }
    }

    /// Create a panel whose controller never answers
    pub fn absent() -> Self {
        Self {
            detected: false,
            ..Self::new()
        }
    }

    /// Visible frame
    pub fn frame(&self) -> &Framebuffer<W, H> {
        &self.front
    }

    /// Text of the visible frame
    pub fn screen(&self) -> &Screen {
        &self.front_text
    }

    /// Text runs of the visible frame
    pub fn runs(&self) -> &[TextRun] {
        self.front_text.runs()
    }

    /// Frames transferred so far
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Font selected last
    pub fn font(&self) -> FontId {
        self.font
    }

    /// Font mode selected last
    pub fn font_mode(&self) -> FontMode {
        self.mode
    }

    fn text_width(&self, text: &str) -> u16 {
        let chars = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        chars.saturating_mul(u16::from(self.glyph.width))
    }
}

impl<const W: usize, const H: usize> MenuDisplay for RasterDisplay<W, H> {
    fn begin(&mut self) -> Result<(), DisplayError> {
        if !self.detected {
            return Err(DisplayError::NotDetected);
        }
        self.back.clear();
        self.back_text.clear();
        Ok(())
    }

    fn clear_buffer(&mut self) {
        self.back.clear();
        self.back_text.clear();
    }

    fn send_buffer(&mut self) {
        self.front = self.back;
        self.front_text = self.back_text.clone();
        self.frames = self.frames.wrapping_add(1);
    }

    fn set_font(&mut self, font: FontId) {
        self.font = font;
        self.glyph = fonts::metrics(font);
    }

    fn set_font_mode(&mut self, mode: FontMode) {
        self.mode = mode;
    }

    fn display_width(&self) -> u16 {
        W as u16
    }

    fn display_height(&self) -> u16 {
        H as u16
    }

    fn max_glyph_width(&self) -> u16 {
        u16::from(self.glyph.width)
    }

    fn max_glyph_height(&self) -> u16 {
        u16::from(self.glyph.height)
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        if self.mode == FontMode::Solid {
            let height = self.glyph.height;
            self.back.fill(
                x,
                y - i32::from(height),
                self.text_width(text),
                u16::from(height),
                false,
            );
        }
        self.back_text.push(x, y, self.font, text);
    }

    fn draw_filled_rect(&mut self, x: i32, y: i32, width: u16, height: u16) {
        self.back.fill(x, y, width, height, true);
    }

    fn draw_vertical_line(&mut self, x: i32, y: i32, height: u16) {
        self.back.fill(x, y, 1, height, true);
    }
}
