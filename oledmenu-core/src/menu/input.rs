//! Rotary encoder input mapping

use super::controller::Menu;
use crate::traits::{Clock, MenuDisplay};

/// Input events from a rotary encoder with push button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Encoder rotated clockwise (1 detent)
    EncoderCw,
    /// Encoder rotated counter-clockwise (1 detent)
    EncoderCcw,
    /// Short press
    EncoderClick,
    /// Long press
    EncoderLongPress,
    /// Button released (after long press)
    EncoderRelease,
}

impl InputEvent {
    /// Returns true if this is a rotation event
    pub fn is_rotation(&self) -> bool {
        matches!(self, InputEvent::EncoderCw | InputEvent::EncoderCcw)
    }

    /// Returns the rotation direction as a signed delta (-1, 0, or +1)
    pub fn rotation_delta(&self) -> i8 {
        match self {
            InputEvent::EncoderCw => 1,
            InputEvent::EncoderCcw => -1,
            _ => 0,
        }
    }
}

/// What an input event did to the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    /// Event had no effect
    None,
    /// Active page changed
    PageChanged(usize),
    /// Selected line of the entered page changed
    LineChanged(u16),
    /// Active page entered
    Entered,
    /// Active page left
    Exited,
    /// Click on a line of an entered page
    Selected { page: usize, line: u16 },
    /// Newest error retired
    ErrorAcknowledged { remaining: usize },
}

impl<'a, D, C, const A: usize, const P: usize, const E: usize> Menu<'a, D, C, A, P, E>
where
    D: MenuDisplay,
    C: Clock,
{
    /// Apply an encoder event
    ///
    /// Rotation switches pages, or lines once a page is entered. A click
    /// acknowledges the newest error if one is shown, otherwise enters the
    /// page or selects the current line. A long press leaves the page.
    pub fn handle(&mut self, event: InputEvent) -> MenuAction {
        trace!("input {}", event);
        match event {
            InputEvent::EncoderCw | InputEvent::EncoderCcw => self.rotate(event.rotation_delta()),
            InputEvent::EncoderClick => self.click(),
            InputEvent::EncoderLongPress if self.is_entered() => {
                self.exit();
                MenuAction::Exited
            }
            InputEvent::EncoderLongPress | InputEvent::EncoderRelease => MenuAction::None,
        }
    }

    fn rotate(&mut self, delta: i8) -> MenuAction {
        if self.page_count() == 0 {
            return MenuAction::None;
        }

        if self.is_entered() {
            if delta > 0 {
                self.move_down();
            } else {
                self.move_up();
            }
            let line = self.page(self.current_page()).map_or(0, |page| page.page_line());
            return MenuAction::LineChanged(line);
        }

        if delta > 0 {
            self.next_page();
        } else {
            self.prev_page();
        }
        MenuAction::PageChanged(self.current_page())
    }

    fn click(&mut self) -> MenuAction {
        if self.has_active_error() {
            let remaining = self.acknowledge_error();
            return MenuAction::ErrorAcknowledged { remaining };
        }

        if self.is_entered() {
            let page = self.current_page();
            let line = self.page(page).map_or(0, |p| p.page_line());
            return MenuAction::Selected { page, line };
        }

        match self.enter() {
            Ok(()) => MenuAction::Entered,
            Err(_) => MenuAction::None,
        }
    }
}
