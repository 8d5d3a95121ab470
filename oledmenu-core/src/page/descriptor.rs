//! Page descriptors

use crate::arena::{Arena, ArenaError, Handle};
use crate::cursor::{Extent, ScrollPosition};
use crate::error::MenuError;
use crate::layout::text::{self, TextMetrics, TERMINATOR};
use crate::layout::Viewport;

use super::content::{ContentSource, ContextState, PageContext};

/// Text substituted into a buffer whose content did not fit
pub const BUFFER_TOO_SMALL_MSG: &str = "ERR: buffer too small";

/// Page categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageType {
    /// Application page
    #[default]
    User,
    /// Error overlay page
    Error,
    /// Page registered by the menu itself
    Default,
}

/// Storage behind a page's text
pub enum PageBuffer<'a> {
    /// Region of the menu arena
    Arena(Handle),
    /// Caller-owned memory
    Borrowed(&'a mut [u8]),
}

impl<'a> PageBuffer<'a> {
    /// Buffer length in bytes
    pub fn len(&self) -> usize {
        match self {
            PageBuffer::Arena(handle) => handle.len(),
            PageBuffer::Borrowed(bytes) => bytes.len(),
        }
    }

    /// Check if the buffer has no room at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read access to the bytes
    pub fn bytes<'s, const N: usize>(&'s self, arena: &'s Arena<N>) -> Result<&'s [u8], ArenaError> {
        match self {
            PageBuffer::Arena(handle) => arena.get(*handle),
            PageBuffer::Borrowed(bytes) => Ok(&**bytes),
        }
    }

    /// Write access to the bytes
    pub fn bytes_mut<'s, const N: usize>(
        &'s mut self,
        arena: &'s mut Arena<N>,
    ) -> Result<&'s mut [u8], ArenaError> {
        match self {
            PageBuffer::Arena(handle) => arena.get_mut(*handle),
            PageBuffer::Borrowed(bytes) => Ok(&mut **bytes),
        }
    }
}

/// One menu page: content buffer, navigation state, and geometry
pub struct PageDescriptor<'a> {
    page_type: PageType,
    interactive: bool,
    pub(crate) content: ContentSource<'a>,
    pub(crate) buffer: PageBuffer<'a>,
    target_capacity: usize,
    needed_capacity: usize,
    pub(crate) position: ScrollPosition,
    pub(crate) page_line: u16,
    pub(crate) page_col: u16,
    metrics: TextMetrics,
}

impl<'a> PageDescriptor<'a> {
    /// Create a descriptor over `buffer`
    ///
    /// The target capacity is the full buffer length.
    pub fn new(
        page_type: PageType,
        interactive: bool,
        content: ContentSource<'a>,
        buffer: PageBuffer<'a>,
    ) -> Self {
        let target_capacity = buffer.len();
        Self {
            page_type,
            interactive,
            content,
            buffer,
            target_capacity,
            needed_capacity: 0,
            position: ScrollPosition::default(),
            page_line: 0,
            page_col: 0,
            metrics: TextMetrics::default(),
        }
    }

    /// Page category
    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    /// Check if the page accepts `enter`
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Check if the page is regenerated on every refresh
    pub fn is_dynamic(&self) -> bool {
        self.content.is_dynamic()
    }

    /// Bytes available for text plus terminator
    pub fn target_capacity(&self) -> usize {
        self.target_capacity
    }

    /// Bytes the last regeneration asked for, terminator included
    pub fn needed_capacity(&self) -> usize {
        self.needed_capacity
    }

    /// Check the capacity invariant
    pub fn fits(&self) -> bool {
        self.needed_capacity <= self.target_capacity
    }

    /// Scroll anchor and cursor
    pub fn position(&self) -> &ScrollPosition {
        &self.position
    }

    /// Selected line
    pub fn page_line(&self) -> u16 {
        self.page_line
    }

    /// Selected column
    pub fn page_col(&self) -> u16 {
        self.page_col
    }

    /// Lines produced by the last regeneration
    pub fn num_lines(&self) -> u16 {
        self.metrics.num_lines
    }

    /// Characters on the selected line
    pub fn chars_on_line(&self) -> u16 {
        self.metrics.chars_on_line
    }

    /// Longest line in characters
    pub fn max_chars_on_line(&self) -> u16 {
        self.metrics.max_chars_on_line
    }

    /// Pixel size of the text for the given font geometry
    pub fn extent(&self, viewport: &Viewport) -> Extent {
        Extent::of_text(self.metrics.max_chars_on_line, self.metrics.num_lines, viewport)
    }

    /// Read the page text (up to the terminator)
    pub fn text<'s, const N: usize>(&'s self, arena: &'s Arena<N>) -> Result<&'s [u8], MenuError> {
        Ok(text::text_of(self.buffer.bytes(arena)?))
    }

    /// Select the next line, wrapping to the first
    pub fn line_down(&mut self) {
        let lines = self.metrics.num_lines;
        if lines == 0 {
            return;
        }
        self.page_line = (self.page_line + 1) % lines;
    }

    /// Select the previous line, wrapping to the last
    pub fn line_up(&mut self) {
        let lines = self.metrics.num_lines;
        if lines == 0 {
            return;
        }
        self.page_line = if self.page_line == 0 {
            lines - 1
        } else {
            (self.page_line - 1).min(lines - 1)
        };
    }

    /// Regenerate the buffer from the content source and re-measure it
    ///
    /// Returns [`MenuError::BufferTooSmall`] if the content needed more than
    /// the target capacity; the buffer then holds a truncated prefix.
    pub(crate) fn regenerate<const N: usize>(
        &mut self,
        arena: &mut Arena<N>,
        entered: bool,
        now_ms: u32,
    ) -> Result<(), MenuError> {
        let state = ContextState {
            page_line: self.page_line,
            page_col: self.page_col,
            num_lines: self.metrics.num_lines,
            interactive: self.interactive,
            entered,
            now_ms,
        };

        let bytes = self.buffer.bytes_mut(arena)?;

        if self.content.is_dynamic() {
            let mut ctx = PageContext::new(bytes, state);
            self.content.render(&mut ctx);
            self.needed_capacity = ctx.needed();
            self.page_line = ctx.page_line;
            self.page_col = ctx.page_col;
        } else {
            self.needed_capacity = static_needed(bytes);
        }

        self.rescan(arena)?;

        if !self.fits() {
            return Err(MenuError::BufferTooSmall);
        }
        Ok(())
    }

    /// Replace the buffer content with the overflow diagnostic
    pub(crate) fn write_diagnostic<const N: usize>(&mut self, arena: &mut Arena<N>) -> Result<(), MenuError> {
        let bytes = self.buffer.bytes_mut(arena)?;
        write_diagnostic(bytes);
        self.rescan(arena)
    }

    /// Swap the arena region after an in-place resize
    pub(crate) fn resize_buffer(&mut self, handle: Handle) {
        self.buffer = PageBuffer::Arena(handle);
        self.target_capacity = handle.len();
    }

    fn rescan<const N: usize>(&mut self, arena: &Arena<N>) -> Result<(), MenuError> {
        let bytes = self.buffer.bytes(arena)?;
        self.metrics = text::scan(bytes, self.page_line);
        if self.metrics.num_lines == 0 {
            self.page_line = 0;
        } else if self.page_line >= self.metrics.num_lines {
            self.page_line = self.metrics.num_lines - 1;
            self.metrics = text::scan(bytes, self.page_line);
        }
        Ok(())
    }
}

/// Bytes occupied by caller-provided text, terminator included
///
/// An unterminated buffer needs one byte more than it has.
fn static_needed(bytes: &[u8]) -> usize {
    text::text_of(bytes).len() + 1
}

/// Overwrite `bytes` with the overflow diagnostic, truncated to fit
pub fn write_diagnostic(bytes: &mut [u8]) {
    let Some(room) = bytes.len().checked_sub(1) else {
        return;
    };
    let msg = BUFFER_TOO_SMALL_MSG.as_bytes();
    let len = msg.len().min(room);
    bytes[..len].copy_from_slice(&msg[..len]);
    bytes[len] = TERMINATOR;
}
