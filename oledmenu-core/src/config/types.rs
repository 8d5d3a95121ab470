//! Configuration type definitions
//!
//! Settings are fixed when the menu is constructed. They can be persisted as
//! postcard binary data with the `serde` feature.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cursor::BLINK_INTERVAL_MS;
use crate::layout::{
    DEFAULT_DISPLAY_LINES, DEFAULT_MAX_FONT_HEIGHT, DEFAULT_MAX_LINES, DEFAULT_MIN_FONT_HEIGHT,
    DEFAULT_MIN_LINES,
};

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Default size of the error overlay buffer
pub const DEFAULT_ERROR_BUFFER_SIZE: u16 = 128;

/// Default size of the shared page buffer
pub const DEFAULT_PAGE_BUFFER_SIZE: u16 = 128;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `min_lines` is zero or above `max_lines`, or `display_lines` outside them
    InvalidLineRange,
    /// Font height bounds inverted
    InvalidFontRange,
    /// Blink interval of zero
    ZeroBlinkInterval,
    /// Error or page buffer cannot hold a terminator
    InvalidBufferSize,
    /// Stored configuration has a different version
    VersionMismatch,
    /// Deserialization failed
    Deserialize,
    /// Serialization failed
    Serialize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::InvalidLineRange => "invalid display line range",
            ConfigError::InvalidFontRange => "invalid font height range",
            ConfigError::ZeroBlinkInterval => "blink interval must be non-zero",
            ConfigError::InvalidBufferSize => "buffer size must be at least 1",
            ConfigError::VersionMismatch => "config version mismatch",
            ConfigError::Deserialize => "deserialization failed",
            ConfigError::Serialize => "serialization failed",
        };
        f.write_str(msg)
    }
}

/// Menu settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MenuConfig {
    /// Format version
    pub version: u8,
    /// Cursor blink half-period in milliseconds
    pub blink_interval_ms: u32,
    /// Start with the cursor blinking
    pub blink_enabled: bool,
    /// Draw a bar behind the selected line of an entered page
    pub highlight_enabled: bool,
    /// Initial number of display lines
    pub display_lines: u8,
    /// Fewest display lines that may be requested
    pub min_lines: u8,
    /// Most display lines that may be requested
    pub max_lines: u8,
    /// Smallest glyph height a font may be selected for
    pub font_min_height: u8,
    /// Largest glyph height a font may be selected for
    pub font_max_height: u8,
    /// Bytes reserved for the error overlay buffer
    pub error_buffer_size: u16,
    /// Bytes reserved for the shared page buffer
    pub page_buffer_size: u16,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            blink_interval_ms: BLINK_INTERVAL_MS,
            blink_enabled: false,
            highlight_enabled: true,
            display_lines: DEFAULT_DISPLAY_LINES,
            min_lines: DEFAULT_MIN_LINES,
            max_lines: DEFAULT_MAX_LINES,
            font_min_height: DEFAULT_MIN_FONT_HEIGHT,
            font_max_height: DEFAULT_MAX_FONT_HEIGHT,
            error_buffer_size: DEFAULT_ERROR_BUFFER_SIZE,
            page_buffer_size: DEFAULT_PAGE_BUFFER_SIZE,
        }
    }
}

impl MenuConfig {
    /// Check that the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        if self.min_lines == 0
            || self.min_lines > self.max_lines
            || !(self.min_lines..=self.max_lines).contains(&self.display_lines)
        {
            return Err(ConfigError::InvalidLineRange);
        }
        if self.font_min_height > self.font_max_height {
            return Err(ConfigError::InvalidFontRange);
        }
        if self.blink_interval_ms == 0 {
            return Err(ConfigError::ZeroBlinkInterval);
        }
        if self.error_buffer_size == 0 || self.page_buffer_size == 0 {
            return Err(ConfigError::InvalidBufferSize);
        }
        Ok(())
    }

    /// Decode and validate a stored configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: MenuConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        if config.version != CONFIG_VERSION {
            warn!(
                "config version mismatch: found {}, expected {}",
                config.version, CONFIG_VERSION
            );
        }
        config.validate()?;
        debug!(
            "config loaded: {} lines, blink {} ms",
            config.display_lines, config.blink_interval_ms
        );
        Ok(config)
    }

    /// Encode into `buffer`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_slice<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::Serialize)
    }
}
