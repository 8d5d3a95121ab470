//! Pages and their content
//!
//! A page pairs a text buffer with an optional content source that
//! regenerates the text on refresh. Pages are described with a
//! [`PageSpec`] and handed to [`crate::Menu::add_page`].

pub mod builtin;
pub mod content;
pub mod descriptor;
pub mod registry;

pub use builtin::{BuiltinPage, ConnectionInfoPage, ConnectionStatus, OtaProgress, OtaProgressPage};
pub use content::{ContentSource, Measure, PageContent, PageContext, PageWriter};
pub use descriptor::{PageBuffer, PageDescriptor, PageType, BUFFER_TOO_SMALL_MSG};
pub use registry::{PageRegistry, MAX_PAGES};

/// Where a new page's text lives
pub enum BufferRequest<'a> {
    /// The menu's shared page buffer
    ///
    /// Only for pages regenerated on every refresh.
    Shared,
    /// A dedicated arena region of the given size
    Dedicated(usize),
    /// An arena region of at most the given size, shrunk to the content
    FitToContent(usize),
    /// Caller-owned memory
    Borrowed(&'a mut [u8]),
}

/// Description of a page to register
pub struct PageSpec<'a> {
    pub(crate) page_type: PageType,
    pub(crate) interactive: bool,
    pub(crate) content: ContentSource<'a>,
    pub(crate) buffer: BufferRequest<'a>,
    pub(crate) text: Option<&'a str>,
}

impl<'a> PageSpec<'a> {
    /// Non-interactive empty page
    ///
    /// Static pages own their text, so the default buffer is a dedicated
    /// region holding only the terminator.
    pub fn new(page_type: PageType) -> Self {
        Self {
            page_type,
            interactive: false,
            content: ContentSource::None,
            buffer: BufferRequest::Dedicated(1),
            text: None,
        }
    }

    /// User page regenerated by `content` into the shared buffer
    pub fn user(content: &'a mut dyn PageContent) -> Self {
        Self::new(PageType::User)
            .content(ContentSource::User(content))
            .buffer(BufferRequest::Shared)
    }

    /// Default page showing a builtin in the shared buffer
    pub fn builtin(page: BuiltinPage<'a>) -> Self {
        Self::new(PageType::Default)
            .content(ContentSource::Builtin(page))
            .buffer(BufferRequest::Shared)
    }

    /// Whether the page keeps text between refreshes
    ///
    /// Such pages cannot live in the shared buffer, which every dynamic
    /// page overwrites.
    pub(crate) fn is_static(&self) -> bool {
        self.text.is_some() || !self.content.is_dynamic()
    }

    /// Static page holding `text`
    ///
    /// Gets a dedicated buffer of exactly the text plus terminator unless a
    /// buffer is chosen afterwards.
    pub fn text(text: &'a str) -> Self {
        let mut spec = Self::new(PageType::User);
        spec.text = Some(text);
        spec.buffer = BufferRequest::Dedicated(text.len() + 1);
        spec
    }

    /// Allow the user to enter the page
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Set the content source
    pub fn content(mut self, content: ContentSource<'a>) -> Self {
        self.content = content;
        self
    }

    /// Set the buffer
    pub fn buffer(mut self, buffer: BufferRequest<'a>) -> Self {
        self.buffer = buffer;
        self
    }

    /// Set the page category
    pub fn page_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_spec_sizes_buffer() {
        let spec = PageSpec::text("hello");
        assert!(matches!(spec.buffer, BufferRequest::Dedicated(6)));
        assert_eq!(spec.text, Some("hello"));
        assert!(!spec.interactive);
    }

    #[test]
    fn test_builder_chain() {
        let mut storage = [0u8; 16];
        let spec = PageSpec::new(PageType::User)
            .interactive(true)
            .buffer(BufferRequest::Borrowed(&mut storage));
        assert!(spec.interactive);
        assert!(matches!(spec.buffer, BufferRequest::Borrowed(ref b) if b.len() == 16));
        assert!(!spec.content.is_dynamic());
    }

    #[test]
    fn test_static_pages_default_to_own_buffer() {
        let spec = PageSpec::new(PageType::User);
        assert!(matches!(spec.buffer, BufferRequest::Dedicated(1)));
        assert!(spec.is_static());
        assert!(PageSpec::text("home").is_static());

        let status = core::cell::RefCell::new(ConnectionStatus::default());
        let spec = PageSpec::builtin(BuiltinPage::connection_info(&status));
        assert!(matches!(spec.buffer, BufferRequest::Shared));
        assert!(!spec.is_static());
    }
}
