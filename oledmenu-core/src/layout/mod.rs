//! Text layout engine
//!
//! Selects a font for the requested number of display lines, splits the
//! page buffer into lines, and draws as many as fit on the panel. Overflow
//! lines are dropped silently; missing lines leave blank rows.

pub mod font;
pub mod text;

pub use font::{FontId, FontTable, DEFAULT_MAX_FONT_HEIGHT, DEFAULT_MIN_FONT_HEIGHT};
pub use text::{line_str, scan, text_of, Lines, TextMetrics};

use crate::traits::{FontMode, MenuDisplay};

/// Fewest display lines a font may be selected for
pub const DEFAULT_MIN_LINES: u8 = 1;

/// Most display lines a font may be selected for
pub const DEFAULT_MAX_LINES: u8 = 10;

/// Display lines requested until configured otherwise
pub const DEFAULT_DISPLAY_LINES: u8 = 4;

/// Panel and glyph geometry after font selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Viewport {
    /// Panel width in pixels
    pub width: u16,
    /// Panel height in pixels
    pub height: u16,
    /// Widest glyph of the selected font
    pub glyph_width: u16,
    /// Tallest glyph of the selected font, also the line spacing
    pub glyph_height: u16,
}

impl Viewport {
    /// Line spacing in pixels (never zero)
    pub fn line_spacing(&self) -> u16 {
        self.glyph_height.max(1)
    }

    /// Number of text rows that fit on the panel
    pub fn rows(&self) -> u16 {
        self.height / self.line_spacing()
    }
}

/// Per-frame drawing inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawParams {
    /// Horizontal scroll offset of the text in pixels
    pub anchor_x: i32,
    /// Vertical scroll offset of the text in pixels
    pub anchor_y: i32,
    /// Line (relative to the text) to draw with a highlight bar
    pub highlight_line: Option<u16>,
    /// Pixel position of the blinking cursor bar, if visible this frame
    pub cursor: Option<(i32, i32)>,
}

/// Font selection and line rendering
#[derive(Debug, Clone, Copy)]
pub struct TextLayout {
    fonts: FontTable,
    display_lines: u8,
    min_lines: u8,
    max_lines: u8,
}

impl TextLayout {
    /// Create a layout with the default line range
    pub fn new(fonts: FontTable) -> Self {
        Self {
            fonts,
            display_lines: DEFAULT_DISPLAY_LINES,
            min_lines: DEFAULT_MIN_LINES,
            max_lines: DEFAULT_MAX_LINES,
        }
    }

    /// Override the range that requested line counts are clamped into
    pub fn with_line_range(mut self, min_lines: u8, max_lines: u8) -> Self {
        self.min_lines = min_lines;
        self.max_lines = max_lines;
        self.display_lines = self.display_lines.clamp(min_lines, max_lines);
        self
    }

    /// Request a number of display lines, clamped to the configured range
    pub fn set_display_lines(&mut self, lines: u8) {
        self.display_lines = lines.clamp(self.min_lines, self.max_lines);
    }

    /// Currently requested number of display lines
    pub fn display_lines(&self) -> u8 {
        self.display_lines
    }

    /// Font table in use
    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    /// Select and apply the font for the requested line count
    pub fn apply_font<D: MenuDisplay>(&self, display: &mut D) -> Viewport {
        let height = display.display_height();
        let font = self.fonts.select(height, self.display_lines);
        display.set_font(font);
        trace!("font {} for {} lines", font.0, self.display_lines);

        Viewport {
            width: display.display_width(),
            height,
            glyph_width: display.max_glyph_width(),
            glyph_height: display.max_glyph_height(),
        }
    }

    /// Draw one frame of page text
    ///
    /// Clears the frame buffer, draws at most [`Viewport::rows`] lines
    /// starting at the line scrolled to by `anchor_y`, and transfers the
    /// frame. Returns the viewport used and the number of lines drawn.
    pub fn draw<D: MenuDisplay>(
        &self,
        display: &mut D,
        buffer: &[u8],
        params: &DrawParams,
    ) -> (Viewport, u16) {
        display.clear_buffer();
        let viewport = self.apply_font(display);
        display.set_font_mode(FontMode::Transparent);

        let spacing = i32::from(viewport.line_spacing());
        let anchor_y = params.anchor_y.max(0);
        let first_line = usize::try_from(anchor_y / spacing).unwrap_or(0);
        let mut baseline = spacing - anchor_y % spacing;
        let mut drawn: u16 = 0;

        for (index, line) in Lines::new(buffer)
            .enumerate()
            .skip(first_line)
            .take(usize::from(viewport.rows()))
        {
            let selected = params
                .highlight_line
                .is_some_and(|h| usize::from(h) == index);
            if selected {
                display.draw_filled_rect(0, baseline - spacing, viewport.width, viewport.line_spacing());
            }
            display.draw_text(-params.anchor_x, baseline, line_str(line));
            baseline += spacing;
            drawn += 1;
        }

        // Rows past the last line stay blank; an empty page gets no cursor
        if drawn > 0 {
            if let Some((x, y)) = params.cursor {
                display.draw_vertical_line(x, y, viewport.line_spacing());
            }
        }

        display.send_buffer();
        (viewport, drawn)
    }

    /// Clear the panel without drawing anything
    pub fn blank<D: MenuDisplay>(&self, display: &mut D) {
        display.clear_buffer();
        display.send_buffer();
    }
}
