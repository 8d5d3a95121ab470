//! Display driver trait for a monochrome raster display

use crate::layout::FontId;

/// Errors that can occur when bringing up the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer to the controller failed
    Communication,
    /// Controller did not respond to initialization
    NotDetected,
}

/// How glyph backgrounds are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontMode {
    /// Glyph background pixels are cleared
    #[default]
    Solid,
    /// Glyph background pixels are left untouched (needed over highlights)
    Transparent,
}

/// Trait for the pixel-drawing collaborator
///
/// The menu owns the render pipeline; the driver only draws into its frame
/// buffer and transfers it to the panel. All calls are synchronous.
///
/// Coordinates are in pixels; `draw_text` positions the glyph baseline at
/// `y`. Coordinates may be negative or past the panel edge when text is
/// scrolled; implementations clip.
pub trait MenuDisplay {
    /// Initialize the controller
    ///
    /// On failure the menu marks itself disconnected and stops rendering.
    fn begin(&mut self) -> Result<(), DisplayError>;

    /// Clear the frame buffer
    fn clear_buffer(&mut self);

    /// Transfer the frame buffer to the panel
    fn send_buffer(&mut self);

    /// Select the font used by subsequent `draw_text` calls
    fn set_font(&mut self, font: FontId);

    /// Select solid or transparent glyph backgrounds
    fn set_font_mode(&mut self, mode: FontMode);

    /// Panel width in pixels
    fn display_width(&self) -> u16;

    /// Panel height in pixels
    fn display_height(&self) -> u16;

    /// Widest glyph of the current font in pixels
    fn max_glyph_width(&self) -> u16;

    /// Tallest glyph of the current font in pixels (used as line spacing)
    fn max_glyph_height(&self) -> u16;

    /// Draw a single line of text with its baseline at `y`
    fn draw_text(&mut self, x: i32, y: i32, text: &str);

    /// Fill a rectangle (XOR-style highlight on monochrome panels)
    fn draw_filled_rect(&mut self, x: i32, y: i32, width: u16, height: u16);

    /// Draw a vertical line
    fn draw_vertical_line(&mut self, x: i32, y: i32, height: u16);
}
