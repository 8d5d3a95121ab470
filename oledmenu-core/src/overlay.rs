//! Error overlay
//!
//! Errors are pages drawn into one dedicated arena buffer. While any error is
//! unacknowledged the overlay overrides normal rendering; the page index and
//! navigation state underneath are left as they were.
//!
//! The newest error is shown and retired first. Every error page writes the
//! same buffer, so the top error's content is regenerated on each refresh.

use core::fmt;

use heapless::Vec;

use crate::arena::{Arena, Handle};
use crate::error::MenuError;
use crate::page::{ContentSource, Measure, PageBuffer, PageDescriptor, PageType, PageWriter};

/// Default number of unacknowledged errors kept
pub const MAX_ERROR_PAGES: usize = 8;

/// Error pages and the override flag
pub struct ErrorOverlay<'a, const E: usize = MAX_ERROR_PAGES> {
    stack: Vec<PageDescriptor<'a>, E>,
    override_active: bool,
    buffer: Handle,
}

impl<'a, const E: usize> ErrorOverlay<'a, E> {
    /// Create an overlay drawing into `buffer`
    pub fn new(buffer: Handle) -> Self {
        Self {
            stack: Vec::new(),
            override_active: false,
            buffer,
        }
    }

    /// Arena region holding the error text
    pub fn buffer(&self) -> Handle {
        self.buffer
    }

    /// Bytes available in the error buffer, terminator included
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Unacknowledged error count
    pub fn active_errors(&self) -> usize {
        self.stack.len()
    }

    /// Check if errors preempt normal rendering
    pub fn is_override_active(&self) -> bool {
        self.override_active
    }

    /// Newest unacknowledged error
    pub fn current_mut(&mut self) -> Option<&mut PageDescriptor<'a>> {
        self.stack.last_mut()
    }

    /// Register an error generated by `content`
    ///
    /// The content is rendered once to check that it fits. If it does not,
    /// the error buffer is overwritten with the overflow diagnostic, nothing
    /// is registered, and [`MenuError::BufferTooSmall`] is returned; the
    /// caller is expected to show the buffer right away.
    pub fn add_error<const N: usize>(
        &mut self,
        arena: &mut Arena<N>,
        content: ContentSource<'a>,
        now_ms: u32,
    ) -> Result<(), MenuError> {
        if self.stack.is_full() {
            warn!("error overlay full ({} errors)", self.stack.len());
            return Err(MenuError::AllocationExhausted);
        }

        let mut page = self.error_page(content);
        match page.regenerate(arena, false, now_ms) {
            Ok(()) => {}
            Err(MenuError::BufferTooSmall) => {
                warn!(
                    "error needs {} bytes, buffer holds {}",
                    page.needed_capacity(),
                    page.target_capacity()
                );
                page.write_diagnostic(arena)?;
                return Err(MenuError::BufferTooSmall);
            }
            Err(e) => return Err(e),
        }

        self.push(page)
    }

    /// Format a static message into the error buffer and show it
    ///
    /// Returns the formatted length. Fails with
    /// [`MenuError::BufferTooSmall`] if the message plus terminator does not
    /// fit; the buffer is then left untouched.
    pub fn show_message<const N: usize>(
        &mut self,
        arena: &mut Arena<N>,
        args: fmt::Arguments<'_>,
    ) -> Result<usize, MenuError> {
        let len = Measure::of(args);
        if len >= self.capacity() {
            warn!("message of {} bytes does not fit in {}", len, self.capacity());
            return Err(MenuError::BufferTooSmall);
        }
        if self.stack.is_full() {
            warn!("error overlay full ({} errors)", self.stack.len());
            return Err(MenuError::AllocationExhausted);
        }

        let mut writer = PageWriter::new(arena.get_mut(self.buffer)?);
        let _ = fmt::write(&mut writer, args);

        let mut page = self.error_page(ContentSource::None);
        page.regenerate(arena, false, 0)?;
        self.push(page)?;
        Ok(len)
    }

    /// Retire the newest error
    ///
    /// The override is cleared once no errors remain. Returns the number of
    /// errors still active.
    pub fn acknowledge(&mut self) -> usize {
        if self.stack.pop().is_some() {
            debug!("error acknowledged, {} remaining", self.stack.len());
        }
        if self.stack.is_empty() && self.override_active {
            self.override_active = false;
            info!("error overlay cleared");
        }
        self.stack.len()
    }

    /// Drop every error and draw into `buffer` from now on
    pub fn reset(&mut self, buffer: Handle) {
        self.stack.clear();
        self.override_active = false;
        self.buffer = buffer;
    }

    fn error_page(&self, content: ContentSource<'a>) -> PageDescriptor<'a> {
        PageDescriptor::new(PageType::Error, false, content, PageBuffer::Arena(self.buffer))
    }

    fn push(&mut self, page: PageDescriptor<'a>) -> Result<(), MenuError> {
        self.stack
            .push(page)
            .map_err(|_| MenuError::AllocationExhausted)?;
        self.override_active = true;
        info!("error overlay active ({} errors)", self.stack.len());
        Ok(())
    }
}
