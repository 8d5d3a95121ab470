//! Menu controller
//!
//! Owns the arena, the page registry, and the error overlay, and drives the
//! render pipeline: regenerate the active page (or the newest error),
//! re-check its capacity, lay it out, draw it, and advance the blink timer.

use core::fmt;

use crate::arena::{Arena, Handle};
use crate::config::MenuConfig;
use crate::cursor::{CursorController, ScrollPosition};
use crate::error::MenuError;
use crate::layout::text::text_of;
use crate::layout::{DrawParams, FontTable, TextLayout, Viewport};
use crate::overlay::{ErrorOverlay, MAX_ERROR_PAGES};
use crate::page::{
    BufferRequest, ContentSource, PageBuffer, PageDescriptor, PageRegistry, PageSpec, PageWriter,
    MAX_PAGES,
};
use crate::traits::{Clock, MenuDisplay};

/// Default arena size in bytes
pub const DEFAULT_ARENA_SIZE: usize = 1024;

/// Paged text menu on a monochrome display
///
/// `A` is the arena size, `P` the number of page slots, and `E` the number
/// of unacknowledged errors kept.
pub struct Menu<
    'a,
    D: MenuDisplay,
    C: Clock,
    const A: usize = DEFAULT_ARENA_SIZE,
    const P: usize = MAX_PAGES,
    const E: usize = MAX_ERROR_PAGES,
> {
    display: D,
    clock: C,
    arena: Arena<A>,
    pages: PageRegistry<'a, P>,
    overlay: ErrorOverlay<'a, E>,
    shared: Handle,
    layout: TextLayout,
    cursor: CursorController,
    config: MenuConfig,
    current: usize,
    entered: bool,
    connected: bool,
    highlight: bool,
}

impl<'a, D, C, const A: usize, const P: usize, const E: usize> Menu<'a, D, C, A, P, E>
where
    D: MenuDisplay,
    C: Clock,
{
    /// Create a menu
    ///
    /// Reserves the error buffer and the shared page buffer in the arena.
    /// The display is not touched until [`Menu::init`].
    pub fn new(display: D, clock: C, fonts: FontTable, config: MenuConfig) -> Result<Self, MenuError> {
        config.validate()?;

        let mut arena = Arena::new();
        let (error_buffer, shared) = reserve_buffers(&mut arena, &config)?;

        let fonts = fonts.with_height_range(config.font_min_height, config.font_max_height);
        let mut layout = TextLayout::new(fonts).with_line_range(config.min_lines, config.max_lines);
        layout.set_display_lines(config.display_lines);

        let mut cursor = CursorController::new(config.blink_interval_ms);
        cursor.set_blink(config.blink_enabled, clock.now_ms());

        Ok(Self {
            display,
            clock,
            arena,
            pages: PageRegistry::new(),
            overlay: ErrorOverlay::new(error_buffer),
            shared,
            layout,
            cursor,
            config,
            current: 0,
            entered: false,
            connected: false,
            highlight: config.highlight_enabled,
        })
    }

    /// Initialize the display
    ///
    /// On failure the menu stays usable but every render is a no-op.
    pub fn init(&mut self) -> Result<(), MenuError> {
        if let Err(e) = self.display.begin() {
            self.connected = false;
            error!("display init failed: {}", e);
            return Err(MenuError::DisplayNotConnected);
        }

        self.connected = true;
        self.display.set_font(self.layout.fonts().fallback());
        let viewport = self.layout.apply_font(&mut self.display);
        self.cursor.set_viewport(viewport);
        info!("display connected ({}x{})", viewport.width, viewport.height);
        Ok(())
    }

    /// Register a page, returning its index
    ///
    /// The page's content is rendered once to check that it fits its
    /// buffer. A rejected page is not registered and its dedicated arena
    /// region is released. Static pages are refused on the shared buffer
    /// before anything is written to it.
    pub fn add_page(&mut self, spec: PageSpec<'a>) -> Result<usize, MenuError> {
        if self.pages.is_full() {
            warn!("page registry full ({} pages)", self.pages.len());
            return Err(MenuError::AllocationExhausted);
        }
        if spec.is_static() && matches!(spec.buffer, BufferRequest::Shared) {
            warn!("static page rejected on the shared buffer");
            return Err(MenuError::SharedBufferStatic);
        }

        let PageSpec {
            page_type,
            interactive,
            content,
            buffer,
            text,
        } = spec;

        let (buffer, dedicated, fit) = match buffer {
            BufferRequest::Shared => (PageBuffer::Arena(self.shared), None, false),
            BufferRequest::Dedicated(size) => {
                let handle = self.allocate(size)?;
                (PageBuffer::Arena(handle), Some(handle), false)
            }
            BufferRequest::FitToContent(size) => {
                let handle = self.allocate(size)?;
                (PageBuffer::Arena(handle), Some(handle), true)
            }
            BufferRequest::Borrowed(bytes) => (PageBuffer::Borrowed(bytes), None, false),
        };

        let mut page = PageDescriptor::new(page_type, interactive, content, buffer);
        let now = self.clock.now_ms();
        if let Err(e) = prepare(&mut page, &mut self.arena, text, now) {
            warn!("page rejected: {}", e);
            if let Some(handle) = dedicated {
                self.arena.reallocate(handle, 0)?;
            }
            return Err(e);
        }

        if let (Some(handle), true) = (dedicated, fit) {
            let handle = self.arena.reallocate(handle, page.needed_capacity())?;
            page.resize_buffer(handle);
        }

        let index = self.pages.insert_at_end(page)?;
        info!("page {} registered", index);
        Ok(index)
    }

    /// Register an error generated by `content` and show it over the pages
    ///
    /// If the content does not fit the error buffer, the overflow diagnostic
    /// is drawn immediately and [`MenuError::BufferTooSmall`] is returned.
    pub fn add_error(&mut self, content: impl Into<ContentSource<'a>>) -> Result<(), MenuError> {
        let now = self.clock.now_ms();
        let result = self.overlay.add_error(&mut self.arena, content.into(), now);
        if result == Err(MenuError::BufferTooSmall) && self.connected {
            let viewport = draw_buffer(&mut self.display, &self.layout, &self.arena, self.overlay.buffer())?;
            self.cursor.set_viewport(viewport);
        }
        result
    }

    /// Show a formatted message over the pages
    ///
    /// Returns the message length. See [`ErrorOverlay::show_message`].
    pub fn show_message(&mut self, args: fmt::Arguments<'_>) -> Result<usize, MenuError> {
        self.overlay.show_message(&mut self.arena, args)
    }

    /// Retire the newest error, returning how many remain
    pub fn acknowledge_error(&mut self) -> usize {
        self.overlay.acknowledge()
    }

    /// Check if an error overrides the pages
    pub fn has_active_error(&self) -> bool {
        self.overlay.is_override_active()
    }

    /// Unacknowledged error count
    pub fn active_errors(&self) -> usize {
        self.overlay.active_errors()
    }

    /// Show the next page, wrapping to the first
    ///
    /// Leaves the previously entered page.
    pub fn next_page(&mut self) {
        let count = self.pages.len();
        if count == 0 {
            return;
        }
        self.current = (self.current + 1) % count;
        self.entered = false;
        debug!("page {}", self.current);
    }

    /// Show the previous page, wrapping to the last
    pub fn prev_page(&mut self) {
        let count = self.pages.len();
        if count == 0 {
            return;
        }
        self.current = (self.current + count - 1) % count;
        self.entered = false;
        debug!("page {}", self.current);
    }

    /// Select the previous line of the active page
    pub fn move_up(&mut self) {
        if let Ok(page) = self.pages.get_mut(self.current) {
            page.line_up();
        }
    }

    /// Select the next line of the active page
    pub fn move_down(&mut self) {
        if let Ok(page) = self.pages.get_mut(self.current) {
            page.line_down();
        }
    }

    /// Enter the active page
    pub fn enter(&mut self) -> Result<(), MenuError> {
        let page = self.pages.get(self.current)?;
        if !page.is_interactive() {
            return Err(MenuError::NotInteractive);
        }
        self.entered = true;
        debug!("entered page {}", self.current);
        Ok(())
    }

    /// Leave the active page
    pub fn exit(&mut self) {
        self.entered = false;
    }

    /// Check if the active page has been entered
    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// Move the active page's cursor, scrolling at the panel edges
    pub fn scroll(&mut self, dx: i32, dy: i32) {
        let Ok(page) = self.pages.get_mut(self.current) else {
            return;
        };
        let extent = page.extent(self.cursor.viewport());
        self.cursor.scroll(&mut page.position, dx, dy, &extent);
    }

    /// Anchor and cursor of the active page
    pub fn position(&self) -> Option<ScrollPosition> {
        self.pages.get(self.current).ok().map(|page| *page.position())
    }

    /// Overwrite the active page's anchor and cursor
    pub fn set_position(&mut self, position: ScrollPosition) {
        if let Ok(page) = self.pages.get_mut(self.current) {
            page.position = position;
        }
    }

    /// Request a number of display lines, clamped to the configured range
    pub fn set_display_lines(&mut self, lines: u8) {
        self.layout.set_display_lines(lines);
        if self.connected {
            let viewport = self.layout.apply_font(&mut self.display);
            self.cursor.set_viewport(viewport);
        }
    }

    /// Requested number of display lines
    pub fn display_lines(&self) -> u8 {
        self.layout.display_lines()
    }

    /// Enable or disable the blinking cursor
    pub fn set_blink(&mut self, enabled: bool) {
        let now = self.clock.now_ms();
        self.cursor.set_blink(enabled, now);
    }

    /// Enable or disable the selected-line highlight
    pub fn set_highlight(&mut self, enabled: bool) {
        self.highlight = enabled;
    }

    /// Draw one frame
    ///
    /// Does nothing while the display is disconnected. An active error is
    /// drawn instead of the active page. If the page's content outgrew its
    /// buffer the overflow diagnostic is drawn and
    /// [`MenuError::BufferTooSmall`] is returned.
    pub fn refresh(&mut self) -> Result<(), MenuError> {
        if !self.connected {
            return Ok(());
        }

        let now = self.clock.now_ms();
        let result = if self.overlay.is_override_active() {
            self.render_error(now)
        } else {
            self.render_page(now)
        };
        self.cursor.tick(now);
        result
    }

    fn render_error(&mut self, now: u32) -> Result<(), MenuError> {
        let Some(page) = self.overlay.current_mut() else {
            return Ok(());
        };
        let result = regenerate_or_diagnose(page, &mut self.arena, false, now);

        let text = page.text(&self.arena)?;
        let (viewport, _) = self.layout.draw(&mut self.display, text, &DrawParams::default());
        self.cursor.set_viewport(viewport);
        result
    }

    fn render_page(&mut self, now: u32) -> Result<(), MenuError> {
        if self.pages.is_empty() {
            self.layout.blank(&mut self.display);
            return Ok(());
        }

        self.pages.touch(self.current)?;
        let entered = self.entered;
        let page = self.pages.get_mut(self.current)?;
        let result = regenerate_or_diagnose(page, &mut self.arena, entered, now);

        let highlight = entered && self.highlight && page.is_interactive();
        let params = DrawParams {
            anchor_x: page.position().anchor.x,
            anchor_y: page.position().anchor.y,
            highlight_line: highlight.then_some(page.page_line()),
            cursor: self.cursor.visible_cursor(page.position()),
        };

        let text = page.text(&self.arena)?;
        let (viewport, _) = self.layout.draw(&mut self.display, text, &params);
        self.cursor.set_viewport(viewport);
        result
    }

    /// Drop every page and error and release the arena
    pub fn reset(&mut self) -> Result<(), MenuError> {
        self.pages.clear();
        self.arena.clear();
        let (error_buffer, shared) = reserve_buffers(&mut self.arena, &self.config)?;
        self.overlay.reset(error_buffer);
        self.shared = shared;
        self.current = 0;
        self.entered = false;
        info!("menu reset");
        Ok(())
    }

    /// Page at `index`
    pub fn page(&self, index: usize) -> Result<&PageDescriptor<'a>, MenuError> {
        self.pages.get(index)
    }

    /// Text currently held by page `index`
    pub fn page_text(&self, index: usize) -> Result<&[u8], MenuError> {
        self.pages.get(index)?.text(&self.arena)
    }

    /// Number of registered pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index of the active page
    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Check if the display initialized
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Geometry of the last drawn frame
    pub fn viewport(&self) -> &Viewport {
        self.cursor.viewport()
    }

    /// Configuration the menu was built with
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Arena usage in bytes
    pub fn arena_used(&self) -> usize {
        self.arena.used()
    }

    /// Display driver
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Display driver, for driver-specific settings
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    fn allocate(&mut self, size: usize) -> Result<Handle, MenuError> {
        self.arena.allocate(size).map_err(|e| {
            warn!(
                "arena exhausted: {} bytes requested, {} left",
                size,
                self.arena.remaining()
            );
            MenuError::from(e)
        })
    }
}

/// Allocate the error buffer followed by the shared page buffer
fn reserve_buffers<const N: usize>(
    arena: &mut Arena<N>,
    config: &MenuConfig,
) -> Result<(Handle, Handle), MenuError> {
    let error_buffer = arena.allocate(usize::from(config.error_buffer_size))?;
    let shared = arena.allocate(usize::from(config.page_buffer_size))?;
    Ok((error_buffer, shared))
}

/// Copy static text into a new page and validate its capacity
fn prepare<const N: usize>(
    page: &mut PageDescriptor<'_>,
    arena: &mut Arena<N>,
    text: Option<&str>,
    now_ms: u32,
) -> Result<(), MenuError> {
    if let Some(text) = text {
        let mut writer = PageWriter::new(page.buffer.bytes_mut(arena)?);
        writer.push_bytes(text.as_bytes());
        if writer.overflowed() {
            return Err(MenuError::BufferTooSmall);
        }
    }
    page.regenerate(arena, false, now_ms)
}

/// Regenerate a page, substituting the diagnostic if it overflowed
fn regenerate_or_diagnose<const N: usize>(
    page: &mut PageDescriptor<'_>,
    arena: &mut Arena<N>,
    entered: bool,
    now_ms: u32,
) -> Result<(), MenuError> {
    match page.regenerate(arena, entered, now_ms) {
        Err(MenuError::BufferTooSmall) => {
            warn!(
                "page needs {} bytes, has {}",
                page.needed_capacity(),
                page.target_capacity()
            );
            page.write_diagnostic(arena)?;
            Err(MenuError::BufferTooSmall)
        }
        other => other,
    }
}

/// Draw a raw arena buffer without scrolling or decorations
fn draw_buffer<D: MenuDisplay, const N: usize>(
    display: &mut D,
    layout: &TextLayout,
    arena: &Arena<N>,
    handle: Handle,
) -> Result<Viewport, MenuError> {
    let text = text_of(arena.get(handle)?);
    let (viewport, _) = layout.draw(display, text, &DrawParams::default());
    Ok(viewport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::{Call, MockDisplay};
    use crate::layout::FontId;
    use crate::menu::{InputEvent, MenuAction};
    use crate::page::{PageContent, PageContext, PageType};
    use core::cell::Cell;
    use core::fmt::Write;

    const FONTS: [FontId; 3] = [FontId(1), FontId(2), FontId(3)];

    #[derive(Default)]
    struct ManualClock(Cell<u32>);

    impl ManualClock {
        fn advance(&self, ms: u32) {
            self.0.set(self.0.get().wrapping_add(ms));
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u32 {
            self.0.get()
        }
    }

    /// Writes `n` copies of 'x'
    struct Repeat<'c>(&'c Cell<usize>);

    impl PageContent for Repeat<'_> {
        fn render(&mut self, page: &mut PageContext<'_>) {
            for _ in 0..self.0.get() {
                let _ = page.write_char('x');
            }
        }
    }

    struct Fixed(&'static str);

    impl PageContent for Fixed {
        fn render(&mut self, page: &mut PageContext<'_>) {
            let _ = page.write_str(self.0);
        }
    }

    type TestMenu<'a> = Menu<'a, MockDisplay, &'a ManualClock, 512, 4, 2>;

    // 64x20 panel with 6x10 glyphs: two rows
    fn menu_with(clock: &ManualClock, display: MockDisplay, config: MenuConfig) -> TestMenu<'_> {
        Menu::new(display, clock, FontTable::new(&FONTS, FontId(0)), config).unwrap()
    }

    fn menu(clock: &ManualClock) -> TestMenu<'_> {
        let mut menu = menu_with(clock, MockDisplay::new(64, 20, 6, 10), MenuConfig::default());
        menu.init().unwrap();
        menu
    }

    #[test]
    fn test_refresh_draws_rows_that_fit() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        menu.add_page(PageSpec::text("Line1\nLine2\nLine3")).unwrap();

        menu.refresh().unwrap();
        assert_eq!(menu.display().texts().as_slice(), &["Line1", "Line2"]);
        assert_eq!(menu.display().sends(), 1);
    }

    #[test]
    fn test_refresh_without_pages_blanks() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        menu.refresh().unwrap();
        assert_eq!(menu.display().calls.as_slice(), &[Call::Clear, Call::Send]);
    }

    #[test]
    fn test_page_cycling_wraps() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        menu.next_page();
        assert_eq!(menu.current_page(), 0);

        for text in ["a", "b", "c"] {
            menu.add_page(PageSpec::text(text)).unwrap();
        }
        for _ in 0..3 {
            menu.next_page();
        }
        assert_eq!(menu.current_page(), 0);
        menu.prev_page();
        assert_eq!(menu.current_page(), 2);
    }

    #[test]
    fn test_move_down_cycles_lines() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        menu.add_page(PageSpec::text("a\nb\nc\nd").interactive(true)).unwrap();

        menu.move_down();
        assert_eq!(menu.page(0).unwrap().page_line(), 1);
        for _ in 0..4 {
            menu.move_down();
        }
        assert_eq!(menu.page(0).unwrap().page_line(), 1);
        menu.move_up();
        menu.move_up();
        assert_eq!(menu.page(0).unwrap().page_line(), 3);
    }

    #[test]
    fn test_enter_requires_interactive_page() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        assert_eq!(menu.enter(), Err(MenuError::IndexOutOfRange));

        menu.add_page(PageSpec::text("static")).unwrap();
        menu.add_page(PageSpec::text("list").interactive(true)).unwrap();

        assert_eq!(menu.enter(), Err(MenuError::NotInteractive));
        assert!(!menu.is_entered());

        menu.next_page();
        menu.enter().unwrap();
        assert!(menu.is_entered());
        menu.exit();
        assert!(!menu.is_entered());
    }

    #[test]
    fn test_disconnected_display_skips_rendering() {
        let clock = ManualClock::default();
        let mut display = MockDisplay::new(64, 20, 6, 10);
        display.begin_ok = false;
        let mut menu = menu_with(&clock, display, MenuConfig::default());

        assert_eq!(menu.init(), Err(MenuError::DisplayNotConnected));
        assert!(!menu.is_connected());

        menu.add_page(PageSpec::text("a")).unwrap();
        menu.add_page(PageSpec::text("b")).unwrap();
        menu.refresh().unwrap();
        assert!(menu.display().calls.is_empty());

        menu.next_page();
        assert_eq!(menu.current_page(), 1);
    }

    #[test]
    fn test_rejected_page_releases_arena() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        let used = menu.arena_used();

        let spec = PageSpec::text("too long").buffer(BufferRequest::Dedicated(4));
        assert_eq!(menu.add_page(spec), Err(MenuError::BufferTooSmall));
        assert_eq!(menu.arena_used(), used);
        assert_eq!(menu.page_count(), 0);
    }

    #[test]
    fn test_static_page_refused_on_shared_buffer() {
        let clock = ManualClock::default();
        let mut other = Fixed("other page");
        let mut menu = menu(&clock);
        let used = menu.arena_used();

        let spec = PageSpec::text("home").buffer(BufferRequest::Shared);
        assert_eq!(menu.add_page(spec), Err(MenuError::SharedBufferStatic));
        let spec = PageSpec::new(PageType::User).buffer(BufferRequest::Shared);
        assert_eq!(menu.add_page(spec), Err(MenuError::SharedBufferStatic));
        assert_eq!(menu.page_count(), 0);
        assert_eq!(menu.arena_used(), used);
        assert!(text_of(menu.arena.get(menu.shared).unwrap()).is_empty());

        // Default buffers keep static text apart from dynamic pages
        menu.add_page(PageSpec::text("home")).unwrap();
        menu.add_page(PageSpec::new(PageType::User)).unwrap();
        menu.add_page(PageSpec::user(&mut other)).unwrap();
        menu.next_page();
        menu.next_page();
        menu.refresh().unwrap();
        assert_eq!(menu.display().texts().as_slice(), &["other page"]);

        menu.next_page();
        menu.refresh().unwrap();
        assert_eq!(menu.display().texts().as_slice(), &["home"]);
        assert_eq!(menu.page_text(0), Ok(&b"home"[..]));
        assert_eq!(menu.page_text(1), Ok(&b""[..]));
    }

    #[test]
    fn test_arena_exhaustion() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        let spec = PageSpec::text("x").buffer(BufferRequest::Dedicated(4096));
        assert_eq!(menu.add_page(spec), Err(MenuError::AllocationExhausted));
    }

    #[test]
    fn test_registry_full() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        for _ in 0..4 {
            menu.add_page(PageSpec::text("p")).unwrap();
        }
        let used = menu.arena_used();
        assert_eq!(
            menu.add_page(PageSpec::text("p")),
            Err(MenuError::AllocationExhausted)
        );
        assert_eq!(menu.arena_used(), used);
    }

    #[test]
    fn test_fit_to_content_shrinks_buffer() {
        let clock = ManualClock::default();
        let mut content = Fixed("abc");
        let mut menu = menu(&clock);
        let used = menu.arena_used();

        let index = menu
            .add_page(PageSpec::user(&mut content).buffer(BufferRequest::FitToContent(64)))
            .unwrap();
        assert_eq!(menu.arena_used(), used + 4);
        assert_eq!(menu.page(index).unwrap().target_capacity(), 4);
        assert_eq!(menu.page_text(index).unwrap(), b"abc");
    }

    #[test]
    fn test_overflow_on_refresh_shows_diagnostic() {
        let clock = ManualClock::default();
        let count = Cell::new(4);
        let mut content = Repeat(&count);
        let mut menu = menu(&clock);
        menu.add_page(PageSpec::user(&mut content).buffer(BufferRequest::Dedicated(16)))
            .unwrap();

        count.set(40);
        assert_eq!(menu.refresh(), Err(MenuError::BufferTooSmall));
        assert_eq!(menu.display().texts().as_slice(), &["ERR: buffer too"]);

        count.set(2);
        menu.refresh().unwrap();
        assert_eq!(menu.display().texts().as_slice(), &["xx"]);
    }

    #[test]
    fn test_message_overrides_pages() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        menu.add_page(PageSpec::text("home")).unwrap();
        menu.add_page(PageSpec::text("second")).unwrap();
        menu.next_page();

        assert_eq!(menu.show_message(format_args!("fault {}", 7)), Ok(7));
        menu.refresh().unwrap();
        assert_eq!(menu.display().texts().as_slice(), &["fault 7"]);
        assert_eq!(menu.current_page(), 1);

        assert_eq!(menu.acknowledge_error(), 0);
        menu.refresh().unwrap();
        assert_eq!(menu.display().texts().as_slice(), &["second"]);
    }

    #[test]
    fn test_newest_error_shown_first() {
        let clock = ManualClock::default();
        let mut first = Fixed("first");
        let mut second = Fixed("second");
        let mut menu = menu(&clock);

        menu.add_error(&mut first).unwrap();
        menu.add_error(&mut second).unwrap();
        assert_eq!(menu.active_errors(), 2);

        menu.refresh().unwrap();
        assert_eq!(menu.display().texts().as_slice(), &["second"]);
        menu.acknowledge_error();
        menu.refresh().unwrap();
        assert_eq!(menu.display().texts().as_slice(), &["first"]);
        assert!(menu.has_active_error());
    }

    #[test]
    fn test_oversized_error_rendered_immediately() {
        let clock = ManualClock::default();
        let mut fault = Fixed("way too long for it");
        let config = MenuConfig {
            error_buffer_size: 8,
            ..MenuConfig::default()
        };
        let mut menu = menu_with(&clock, MockDisplay::new(64, 20, 6, 10), config);
        menu.init().unwrap();

        assert_eq!(menu.add_error(&mut fault), Err(MenuError::BufferTooSmall));
        assert_eq!(menu.display().texts().as_slice(), &["ERR: bu"]);
        assert!(!menu.has_active_error());
    }

    #[test]
    fn test_blinking_cursor() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        menu.add_page(PageSpec::text("text")).unwrap();
        menu.set_blink(true);

        clock.advance(500);
        menu.refresh().unwrap();
        assert!(!menu.display().calls.iter().any(|c| matches!(c, Call::VLine(..))));

        // The previous refresh turned the cursor on
        menu.refresh().unwrap();
        assert!(menu.display().calls.contains(&Call::VLine(0, 0, 10)));

        menu.set_blink(false);
        menu.refresh().unwrap();
        assert!(!menu.display().calls.iter().any(|c| matches!(c, Call::VLine(..))));
    }

    #[test]
    fn test_empty_page_blinks_nothing() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        menu.add_page(PageSpec::text("")).unwrap();
        menu.set_blink(true);

        clock.advance(500);
        menu.refresh().unwrap();
        menu.refresh().unwrap();
        assert!(menu.cursor.blink().is_on());
        assert!(!menu.display().calls.iter().any(|c| matches!(c, Call::VLine(..))));
        assert_eq!(menu.display().texts().len(), 0);
    }

    #[test]
    fn test_highlight_follows_selected_line() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        menu.add_page(PageSpec::text("a\nb").interactive(true)).unwrap();

        menu.refresh().unwrap();
        assert!(!menu.display().calls.iter().any(|c| matches!(c, Call::Rect(..))));

        menu.enter().unwrap();
        menu.move_down();
        menu.refresh().unwrap();
        assert!(menu.display().calls.contains(&Call::Rect(0, 10, 64, 10)));

        menu.set_highlight(false);
        menu.refresh().unwrap();
        assert!(!menu.display().calls.iter().any(|c| matches!(c, Call::Rect(..))));
    }

    #[test]
    fn test_scroll_moves_anchor_at_edge() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        // 20 characters of 6 px: 120 px wide on a 64 px panel
        menu.add_page(PageSpec::text("0123456789abcdefghij")).unwrap();

        menu.scroll(100, 0);
        let position = menu.position().unwrap();
        assert_eq!(position.cursor.x, 58);
        assert_eq!(position.anchor.x, 56);

        menu.refresh().unwrap();
        assert!(menu
            .display()
            .calls
            .iter()
            .any(|c| matches!(c, Call::Text(-56, 10, _))));

        menu.scroll(0, 0);
        assert_eq!(menu.position(), Some(position));
    }

    #[test]
    fn test_display_lines_clamped() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        menu.set_display_lines(0);
        assert_eq!(menu.display_lines(), 1);
        menu.set_display_lines(50);
        assert_eq!(menu.display_lines(), 10);
    }

    #[test]
    fn test_reset_releases_everything() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        let baseline = menu.arena_used();
        menu.add_page(PageSpec::text("a")).unwrap();
        menu.show_message(format_args!("err")).unwrap();

        menu.reset().unwrap();
        assert_eq!(menu.page_count(), 0);
        assert!(!menu.has_active_error());
        assert_eq!(menu.arena_used(), baseline);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let clock = ManualClock::default();
        let config = MenuConfig {
            blink_interval_ms: 0,
            ..MenuConfig::default()
        };
        let result: Result<TestMenu<'_>, _> = Menu::new(
            MockDisplay::new(64, 20, 6, 10),
            &clock,
            FontTable::single(FontId(0)),
            config,
        );
        assert!(matches!(
            result,
            Err(MenuError::Config(crate::config::ConfigError::ZeroBlinkInterval))
        ));
    }

    #[test]
    fn test_encoder_events() {
        let clock = ManualClock::default();
        let mut menu = menu(&clock);
        menu.add_page(PageSpec::text("a\nb\nc").interactive(true)).unwrap();
        menu.add_page(PageSpec::text("info")).unwrap();

        assert_eq!(menu.handle(InputEvent::EncoderCw), MenuAction::PageChanged(1));
        assert_eq!(menu.handle(InputEvent::EncoderClick), MenuAction::None);
        assert_eq!(menu.handle(InputEvent::EncoderCcw), MenuAction::PageChanged(0));

        assert_eq!(menu.handle(InputEvent::EncoderClick), MenuAction::Entered);
        assert_eq!(menu.handle(InputEvent::EncoderCw), MenuAction::LineChanged(1));
        assert_eq!(
            menu.handle(InputEvent::EncoderClick),
            MenuAction::Selected { page: 0, line: 1 }
        );
        assert_eq!(menu.handle(InputEvent::EncoderLongPress), MenuAction::Exited);
        assert_eq!(menu.handle(InputEvent::EncoderRelease), MenuAction::None);

        menu.show_message(format_args!("jam")).unwrap();
        assert_eq!(
            menu.handle(InputEvent::EncoderClick),
            MenuAction::ErrorAcknowledged { remaining: 0 }
        );
        assert!(!menu.has_active_error());
    }
}
