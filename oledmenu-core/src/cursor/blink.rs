//! Cursor blink state machine
//!
//! Two states toggled purely by elapsed time. The timer is polled, not
//! interrupt driven: each refresh calls [`Blink::tick`] with the current
//! time.

/// Default time between blink transitions
pub const BLINK_INTERVAL_MS: u32 = 500;

/// Blink states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkState {
    /// Cursor hidden
    #[default]
    Off,
    /// Cursor shown
    On,
}

impl BlinkState {
    /// The other state
    pub fn toggled(self) -> Self {
        match self {
            BlinkState::Off => BlinkState::On,
            BlinkState::On => BlinkState::Off,
        }
    }
}

/// Timer-driven two-state toggle
#[derive(Debug, Clone)]
pub struct Blink {
    state: BlinkState,
    enabled: bool,
    interval_ms: u32,
    last_toggle_ms: u32,
}

impl Default for Blink {
    fn default() -> Self {
        Self::new(BLINK_INTERVAL_MS)
    }
}

impl Blink {
    /// Create a disabled blinker
    pub fn new(interval_ms: u32) -> Self {
        Self {
            state: BlinkState::Off,
            enabled: false,
            interval_ms,
            last_toggle_ms: 0,
        }
    }

    /// Enable or disable blinking
    ///
    /// Disabling returns the cursor to the hidden state.
    pub fn set_enabled(&mut self, enabled: bool, now_ms: u32) {
        if enabled && !self.enabled {
            self.last_toggle_ms = now_ms;
        }
        if !enabled {
            self.state = BlinkState::Off;
        }
        self.enabled = enabled;
    }

    /// Check if blinking is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current state
    pub fn state(&self) -> BlinkState {
        self.state
    }

    /// Check if the cursor is visible this frame
    pub fn is_on(&self) -> bool {
        self.state == BlinkState::On
    }

    /// Time between transitions
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Advance the timer
    ///
    /// Toggles once the interval has elapsed since the last transition.
    /// Returns true if the state changed.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        if !self.enabled {
            return false;
        }

        if now_ms.wrapping_sub(self.last_toggle_ms) >= self.interval_ms {
            self.state = self.state.toggled();
            self.last_toggle_ms = now_ms;
            return true;
        }

        false
    }
}
