//! Cursor, scroll, and blink control
//!
//! Anchor and cursor are stored per page (see
//! [`crate::page::PageDescriptor`]); the controller holds the state shared
//! by all pages: the blink timer and the geometry of the last rendered
//! frame.

pub mod blink;
pub mod scroll;

pub use blink::{Blink, BlinkState, BLINK_INTERVAL_MS};
pub use scroll::{Extent, Point, ScrollPosition};

use crate::layout::Viewport;

/// Coordinates cursor movement and visibility across refreshes
#[derive(Debug, Clone)]
pub struct CursorController {
    blink: Blink,
    viewport: Viewport,
}

impl CursorController {
    /// Create a controller with the given blink interval
    pub fn new(blink_interval_ms: u32) -> Self {
        Self {
            blink: Blink::new(blink_interval_ms),
            viewport: Viewport::default(),
        }
    }

    /// Blink timer
    pub fn blink(&self) -> &Blink {
        &self.blink
    }

    /// Enable or disable the blinking cursor
    pub fn set_blink(&mut self, enabled: bool, now_ms: u32) {
        self.blink.set_enabled(enabled, now_ms);
    }

    /// Geometry of the most recently rendered frame
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Record the geometry used by a render
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Move a page's cursor within the last rendered viewport
    pub fn scroll(&self, position: &mut ScrollPosition, dx: i32, dy: i32, extent: &Extent) {
        position.scroll(dx, dy, &self.viewport, extent);
    }

    /// Cursor bar position for this frame, if visible
    pub fn visible_cursor(&self, position: &ScrollPosition) -> Option<(i32, i32)> {
        if self.blink.is_on() {
            Some((position.cursor.x, position.cursor.y))
        } else {
            None
        }
    }

    /// Advance the blink timer
    pub fn tick(&mut self, now_ms: u32) -> bool {
        self.blink.tick(now_ms)
    }
}

impl Default for CursorController {
    fn default() -> Self {
        Self::new(BLINK_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_visible_only_when_blink_on() {
        let mut controller = CursorController::new(100);
        let position = ScrollPosition {
            cursor: Point::new(4, 8),
            ..ScrollPosition::default()
        };
        assert_eq!(controller.visible_cursor(&position), None);

        controller.set_blink(true, 0);
        controller.tick(100);
        assert_eq!(controller.visible_cursor(&position), Some((4, 8)));
    }

    #[test]
    fn test_scroll_uses_recorded_viewport() {
        let mut controller = CursorController::default();
        controller.set_viewport(Viewport {
            width: 64,
            height: 32,
            glyph_width: 4,
            glyph_height: 8,
        });

        let mut position = ScrollPosition::default();
        controller.scroll(&mut position, 100, 100, &Extent::default());
        assert_eq!(position.cursor, Point::new(60, 24));
    }
}
