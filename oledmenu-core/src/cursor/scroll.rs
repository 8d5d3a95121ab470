//! Cursor movement with edge-triggered scrolling
//!
//! The cursor moves freely inside the viewport. When a move pins it against
//! an edge, the text anchor on that axis shifts by the requested delta
//! instead, so content larger than the panel can be explored.

use crate::layout::Viewport;

/// A pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Anchor (text offset) and cursor (on-screen position) of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollPosition {
    /// Scroll offset of the text in pixels
    pub anchor: Point,
    /// Cursor position on the panel in pixels
    pub cursor: Point,
}

/// Size of the laid-out text in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    /// Extent of `lines` lines of at most `max_chars` characters
    pub fn of_text(max_chars: u16, lines: u16, viewport: &Viewport) -> Self {
        Self {
            width: i32::from(max_chars) * i32::from(viewport.glyph_width),
            height: i32::from(lines) * i32::from(viewport.line_spacing()),
        }
    }
}

/// Move along one axis
///
/// Returns the new (anchor, cursor) pair for that axis.
fn scroll_axis(anchor: i32, cursor: i32, delta: i32, display: i32, glyph: i32, content: i32) -> (i32, i32) {
    let upper = (display - glyph).max(0);
    let cursor = cursor.saturating_add(delta).clamp(0, upper);

    if delta != 0 && (cursor == 0 || cursor == upper) {
        let overflow = (content - display).max(0);
        let anchor = anchor.saturating_add(delta).clamp(0, overflow);
        return (anchor, cursor);
    }

    (anchor, cursor)
}

impl ScrollPosition {
    /// Move the cursor by `(dx, dy)` pixels
    ///
    /// Each axis is clamped to `[0, display - glyph]`. When the clamped
    /// cursor lands on either boundary, that axis's anchor shifts by the
    /// delta, bounded so the text never scrolls past its own end.
    pub fn scroll(&mut self, dx: i32, dy: i32, viewport: &Viewport, extent: &Extent) {
        let (ax, cx) = scroll_axis(
            self.anchor.x,
            self.cursor.x,
            dx,
            i32::from(viewport.width),
            i32::from(viewport.glyph_width),
            extent.width,
        );
        let (ay, cy) = scroll_axis(
            self.anchor.y,
            self.cursor.y,
            dy,
            i32::from(viewport.height),
            i32::from(viewport.line_spacing()),
            extent.height,
        );

        self.anchor = Point::new(ax, ay);
        self.cursor = Point::new(cx, cy);
    }
}
