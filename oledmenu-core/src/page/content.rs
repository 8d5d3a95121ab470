//! Page content generation
//!
//! A page's text is regenerated on every refresh by its content source.
//! The source writes line-break-delimited text through a [`PageContext`],
//! which bounds writes to the page buffer while still measuring how many
//! bytes the content asked for.

use core::fmt;

use super::builtin::BuiltinPage;
use crate::layout::text::TERMINATOR;

/// Render capability of a page
///
/// Implementations own whatever state they need (counters, spinners,
/// borrowed status objects). `render` must only touch that state and the
/// context.
pub trait PageContent {
    /// Write the page text into `page`
    fn render(&mut self, page: &mut PageContext<'_>);
}

/// Who produces a page's text
pub enum ContentSource<'a> {
    /// Buffer is filled once at registration (or by the caller) and left alone
    None,
    /// Caller-supplied generator
    User(&'a mut dyn PageContent),
    /// One of the pages shipped with the crate
    Builtin(BuiltinPage<'a>),
}

impl<'a> ContentSource<'a> {
    /// Check if the page is regenerated on refresh
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, ContentSource::None)
    }

    /// Run the generator, if any
    ///
    /// Returns false for [`ContentSource::None`].
    pub fn render(&mut self, page: &mut PageContext<'_>) -> bool {
        match self {
            ContentSource::None => false,
            ContentSource::User(content) => {
                content.render(page);
                true
            }
            ContentSource::Builtin(builtin) => {
                builtin.render(page);
                true
            }
        }
    }
}

impl<'a> From<BuiltinPage<'a>> for ContentSource<'a> {
    fn from(page: BuiltinPage<'a>) -> Self {
        ContentSource::Builtin(page)
    }
}

impl<'a, T: PageContent> From<&'a mut T> for ContentSource<'a> {
    fn from(content: &'a mut T) -> Self {
        ContentSource::User(content)
    }
}

/// Bounded writer over a page buffer
///
/// Keeps one byte for the terminator. Writes past the end are dropped but
/// still counted, so [`PageWriter::needed`] reports the full requirement.
pub struct PageWriter<'b> {
    buffer: &'b mut [u8],
    written: usize,
    requested: usize,
}

impl<'b> PageWriter<'b> {
    /// Start writing at the beginning of `buffer`
    pub fn new(buffer: &'b mut [u8]) -> Self {
        if let Some(first) = buffer.first_mut() {
            *first = TERMINATOR;
        }
        Self {
            buffer,
            written: 0,
            requested: 0,
        }
    }

    /// Bytes of text that fit (buffer length minus the terminator)
    pub fn capacity(&self) -> usize {
        self.buffer.len().saturating_sub(1)
    }

    /// Bytes of text actually stored
    pub fn written(&self) -> usize {
        self.written
    }

    /// Bytes the content asked for, including the terminator
    pub fn needed(&self) -> usize {
        self.requested + 1
    }

    /// Check if any write was dropped
    pub fn overflowed(&self) -> bool {
        self.requested > self.written
    }

    /// Discard everything written so far
    pub fn clear(&mut self) {
        self.written = 0;
        self.requested = 0;
        if let Some(first) = self.buffer.first_mut() {
            *first = TERMINATOR;
        }
    }

    /// Append raw bytes
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.requested = self.requested.saturating_add(bytes.len());

        let room = self.capacity().saturating_sub(self.written);
        let take = bytes.len().min(room);
        self.buffer[self.written..self.written + take].copy_from_slice(&bytes[..take]);
        self.written += take;

        if self.written < self.buffer.len() {
            self.buffer[self.written] = TERMINATOR;
        }
    }
}

impl fmt::Write for PageWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_bytes(s.as_bytes());
        Ok(())
    }
}

/// Writer that only counts bytes (dry-run formatting)
#[derive(Debug, Default)]
pub struct Measure {
    len: usize,
}

impl Measure {
    /// Length of `args` once formatted
    pub fn of(args: fmt::Arguments<'_>) -> usize {
        let mut measure = Measure::default();
        let _ = fmt::write(&mut measure, args);
        measure.len
    }
}

impl fmt::Write for Measure {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.len = self.len.saturating_add(s.len());
        Ok(())
    }
}

/// View of a page handed to its content source
///
/// Implements [`fmt::Write`], so content is usually produced with `write!`.
/// The buffer starts empty on every regeneration.
pub struct PageContext<'b> {
    writer: PageWriter<'b>,
    /// Selected line, may be changed by the content
    pub page_line: u16,
    /// Selected column, may be changed by the content
    pub page_col: u16,
    num_lines: u16,
    interactive: bool,
    entered: bool,
    now_ms: u32,
}

impl<'b> PageContext<'b> {
    pub(crate) fn new(buffer: &'b mut [u8], state: ContextState) -> Self {
        Self {
            writer: PageWriter::new(buffer),
            page_line: state.page_line,
            page_col: state.page_col,
            num_lines: state.num_lines,
            interactive: state.interactive,
            entered: state.entered,
            now_ms: state.now_ms,
        }
    }

    /// Underlying writer
    pub fn writer(&mut self) -> &mut PageWriter<'b> {
        &mut self.writer
    }

    /// Text bytes available (target capacity minus the terminator)
    pub fn capacity(&self) -> usize {
        self.writer.capacity()
    }

    /// Line count from the previous regeneration
    pub fn num_lines(&self) -> u16 {
        self.num_lines
    }

    /// Check if the page accepts `enter`
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Check if the user has entered this page
    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// Time of the refresh driving this regeneration
    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    pub(crate) fn needed(&self) -> usize {
        self.writer.needed()
    }
}

impl fmt::Write for PageContext<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.writer.write_str(s)
    }
}

/// Descriptor state copied into a [`PageContext`]
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ContextState {
    pub page_line: u16,
    pub page_col: u16,
    pub num_lines: u16,
    pub interactive: bool,
    pub entered: bool,
    pub now_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_writer_fits() {
        let mut buf = [0xAAu8; 8];
        let mut writer = PageWriter::new(&mut buf);
        write!(writer, "abc").unwrap();

        assert_eq!(writer.needed(), 4);
        assert!(!writer.overflowed());
        assert_eq!(&buf[..4], b"abc\0");
    }

    #[test]
    fn test_writer_truncates_and_counts() {
        let mut buf = [0u8; 4];
        let mut writer = PageWriter::new(&mut buf);
        write!(writer, "abcdef").unwrap();

        assert_eq!(writer.written(), 3);
        assert_eq!(writer.needed(), 7);
        assert!(writer.overflowed());
        assert_eq!(&buf, b"abc\0");
    }

    #[test]
    fn test_writer_exact_fit() {
        let mut buf = [0u8; 4];
        let mut writer = PageWriter::new(&mut buf);
        write!(writer, "abc").unwrap();
        // Three bytes plus terminator is exactly the buffer
        assert_eq!(writer.needed(), 4);
        assert!(!writer.overflowed());
    }

    #[test]
    fn test_writer_clear() {
        let mut buf = [0u8; 8];
        let mut writer = PageWriter::new(&mut buf);
        write!(writer, "abcdef").unwrap();
        writer.clear();
        write!(writer, "x").unwrap();
        assert_eq!(writer.needed(), 2);
        assert_eq!(&buf[..2], b"x\0");
    }

    #[test]
    fn test_empty_buffer_writer() {
        let mut buf = [0u8; 0];
        let mut writer = PageWriter::new(&mut buf);
        write!(writer, "a").unwrap();
        assert_eq!(writer.capacity(), 0);
        assert_eq!(writer.needed(), 2);
    }

    #[test]
    fn test_measure() {
        assert_eq!(Measure::of(format_args!("x={} y={}", 10, -3)), 9);
        assert_eq!(Measure::of(format_args!("")), 0);
    }

    struct Counter(u32);

    impl PageContent for Counter {
        fn render(&mut self, page: &mut PageContext<'_>) {
            self.0 += 1;
            let _ = write!(page, "count {}", self.0);
        }
    }

    #[test]
    fn test_user_content_source() {
        let mut counter = Counter(0);
        let mut source = ContentSource::from(&mut counter);
        assert!(source.is_dynamic());

        let mut buf = [0u8; 16];
        let mut ctx = PageContext::new(&mut buf, ContextState::default());
        assert!(source.render(&mut ctx));
        assert_eq!(ctx.needed(), 8);
        drop(ctx);
        assert_eq!(&buf[..8], b"count 1\0");
    }

    #[test]
    fn test_none_source_is_static() {
        let mut source = ContentSource::None;
        assert!(!source.is_dynamic());

        let mut buf = [0u8; 4];
        let mut ctx = PageContext::new(&mut buf, ContextState::default());
        assert!(!source.render(&mut ctx));
    }
}
