//! Pages shipped with the menu
//!
//! Status is gathered elsewhere (network stack, OTA updater) and shared with
//! the page through a caller-owned cell. The page only formats it.

use core::cell::{Cell, RefCell};
use core::fmt::Write;

use heapless::String;

use super::content::{PageContent, PageContext};

/// Maximum SSID / hostname length kept for display
pub const MAX_NAME_LEN: usize = 32;

/// Time between spinner frames
pub const SPINNER_INTERVAL_MS: u32 = 100;

/// Spinner animation frames
const SPINNER_FRAMES: [&str; 4] = [" | ", " / ", "---", " \\ "];

/// Network status shown by [`ConnectionInfoPage`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionStatus {
    /// Network name
    pub ssid: String<MAX_NAME_LEN>,
    /// IPv4 address
    pub ip: [u8; 4],
    /// Received signal strength in dBm
    pub rssi: i8,
    /// Hostname announced on the network
    pub hostname: String<MAX_NAME_LEN>,
}

/// Firmware update progress shown by [`OtaProgressPage`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OtaProgress {
    /// Bytes received so far
    pub written: u32,
    /// Total image size in bytes
    pub total: u32,
}

impl OtaProgress {
    /// Completion in percent, 0 while the total is unknown
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let percent = u64::from(self.written) * 100 / u64::from(self.total);
        percent.min(100) as u32
    }

    /// Check if the whole image has been received
    pub fn is_complete(&self) -> bool {
        self.percent() == 100
    }
}

/// SSID, address, signal strength, and hostname
pub struct ConnectionInfoPage<'a> {
    status: &'a RefCell<ConnectionStatus>,
}

impl<'a> ConnectionInfoPage<'a> {
    /// Show the status held in `status`
    pub fn new(status: &'a RefCell<ConnectionStatus>) -> Self {
        Self { status }
    }
}

impl PageContent for ConnectionInfoPage<'_> {
    fn render(&mut self, page: &mut PageContext<'_>) {
        // The caller may be updating the status; show the last frame's text
        let Ok(status) = self.status.try_borrow() else {
            let _ = write!(page, "Connection\nupdating...\n");
            return;
        };
        let [a, b, c, d] = status.ip;
        let _ = write!(
            page,
            "{}\n{}.{}.{}.{}\nRSSI: {}\n{}\n",
            status.ssid, a, b, c, d, status.rssi, status.hostname
        );
    }
}

/// Update progress with a spinner
pub struct OtaProgressPage<'a> {
    progress: &'a Cell<OtaProgress>,
    spinner: usize,
    spinner_timer_ms: Option<u32>,
}

impl<'a> OtaProgressPage<'a> {
    /// Show the progress held in `progress`
    pub fn new(progress: &'a Cell<OtaProgress>) -> Self {
        Self {
            progress,
            spinner: 0,
            spinner_timer_ms: None,
        }
    }

    /// Current spinner frame
    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner]
    }

    fn advance_spinner(&mut self, now_ms: u32) {
        match self.spinner_timer_ms {
            None => self.spinner_timer_ms = Some(now_ms),
            Some(last) if now_ms.wrapping_sub(last) >= SPINNER_INTERVAL_MS => {
                self.spinner = (self.spinner + 1) % SPINNER_FRAMES.len();
                self.spinner_timer_ms = Some(now_ms);
            }
            Some(_) => {}
        }
    }
}

impl PageContent for OtaProgressPage<'_> {
    fn render(&mut self, page: &mut PageContext<'_>) {
        self.advance_spinner(page.now_ms());

        let progress = self.progress.get();
        let _ = write!(
            page,
            "Updating... {}\nProgress: {}%\n",
            self.spinner_frame(),
            progress.percent()
        );
        if progress.is_complete() {
            let _ = write!(page, "Update Complete.\nRestarting...\n");
        }
    }
}

/// Builtin page variants
pub enum BuiltinPage<'a> {
    /// Network connection summary
    ConnectionInfo(ConnectionInfoPage<'a>),
    /// Firmware update progress
    OtaProgress(OtaProgressPage<'a>),
}

impl<'a> BuiltinPage<'a> {
    /// Connection summary backed by `status`
    pub fn connection_info(status: &'a RefCell<ConnectionStatus>) -> Self {
        BuiltinPage::ConnectionInfo(ConnectionInfoPage::new(status))
    }

    /// Update progress backed by `progress`
    pub fn ota_progress(progress: &'a Cell<OtaProgress>) -> Self {
        BuiltinPage::OtaProgress(OtaProgressPage::new(progress))
    }
}

impl PageContent for BuiltinPage<'_> {
    fn render(&mut self, page: &mut PageContext<'_>) {
        match self {
            BuiltinPage::ConnectionInfo(p) => p.render(page),
            BuiltinPage::OtaProgress(p) => p.render(page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::text::text_of;
    use crate::page::content::ContextState;

    fn render_at(content: &mut dyn PageContent, buf: &mut [u8], now_ms: u32) -> usize {
        let mut ctx = PageContext::new(
            buf,
            ContextState {
                now_ms,
                ..ContextState::default()
            },
        );
        content.render(&mut ctx);
        ctx.needed()
    }

    #[test]
    fn test_connection_info() {
        let status = RefCell::new(ConnectionStatus {
            ssid: String::try_from("workshop").unwrap(),
            ip: [192, 168, 1, 42],
            rssi: -61,
            hostname: String::try_from("cleaner").unwrap(),
        });
        let mut page = BuiltinPage::connection_info(&status);
        let mut buf = [0u8; 64];
        let needed = render_at(&mut page, &mut buf, 0);

        let expected = b"workshop\n192.168.1.42\nRSSI: -61\ncleaner\n";
        assert_eq!(text_of(&buf), expected);
        assert_eq!(needed, expected.len() + 1);
    }

    #[test]
    fn test_connection_info_while_borrowed() {
        let status = RefCell::new(ConnectionStatus::default());
        let mut page = ConnectionInfoPage::new(&status);
        let _guard = status.borrow_mut();
        let mut buf = [0u8; 64];
        render_at(&mut page, &mut buf, 0);
        assert_eq!(text_of(&buf), b"Connection\nupdating...\n");
    }

    #[test]
    fn test_ota_percent() {
        assert_eq!(OtaProgress { written: 0, total: 0 }.percent(), 0);
        assert_eq!(OtaProgress { written: 50, total: 200 }.percent(), 25);
        assert_eq!(OtaProgress { written: 300, total: 200 }.percent(), 100);
        assert!(OtaProgress { written: 10, total: 10 }.is_complete());
    }

    #[test]
    fn test_ota_spinner_advances_every_interval() {
        let progress = Cell::new(OtaProgress::default());
        let mut page = OtaProgressPage::new(&progress);
        let mut buf = [0u8; 64];

        render_at(&mut page, &mut buf, 1000);
        assert_eq!(page.spinner_frame(), " | ");
        render_at(&mut page, &mut buf, 1050);
        assert_eq!(page.spinner_frame(), " | ");
        render_at(&mut page, &mut buf, 1100);
        assert_eq!(page.spinner_frame(), " / ");
        assert_eq!(text_of(&buf), b"Updating...  / \nProgress: 0%\n");
    }

    #[test]
    fn test_ota_complete_message() {
        let progress = Cell::new(OtaProgress {
            written: 4096,
            total: 4096,
        });
        let mut page = BuiltinPage::ota_progress(&progress);
        let mut buf = [0u8; 96];
        render_at(&mut page, &mut buf, 0);
        assert_eq!(
            text_of(&buf),
            b"Updating...  | \nProgress: 100%\nUpdate Complete.\nRestarting...\n"
        );
    }
}
