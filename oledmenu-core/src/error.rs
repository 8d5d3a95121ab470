//! Menu error taxonomy

use core::fmt;

use crate::arena::ArenaError;
use crate::config::ConfigError;

/// Errors reported by the menu, registry, and error overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuError {
    /// Arena or registry full at configuration time
    ///
    /// Unrecoverable without reconfiguring capacities.
    AllocationExhausted,
    /// Content would exceed the target buffer capacity
    BufferTooSmall,
    /// Display driver failed to initialize
    DisplayNotConnected,
    /// Page or error index past the end of the registry
    IndexOutOfRange,
    /// Active page does not accept `enter`
    NotInteractive,
    /// Static page requested the shared page buffer
    SharedBufferStatic,
    /// Arena handle misuse
    Arena(ArenaError),
    /// Rejected configuration
    Config(ConfigError),
}

impl From<ArenaError> for MenuError {
    fn from(e: ArenaError) -> Self {
        match e {
            ArenaError::OutOfSpace => MenuError::AllocationExhausted,
            other => MenuError::Arena(other),
        }
    }
}

impl From<ConfigError> for MenuError {
    fn from(e: ConfigError) -> Self {
        MenuError::Config(e)
    }
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::AllocationExhausted => f.write_str("allocation exhausted"),
            MenuError::BufferTooSmall => f.write_str("buffer too small"),
            MenuError::DisplayNotConnected => f.write_str("display not connected"),
            MenuError::IndexOutOfRange => f.write_str("index out of range"),
            MenuError::NotInteractive => f.write_str("page is not interactive"),
            MenuError::SharedBufferStatic => f.write_str("static page on shared buffer"),
            MenuError::Arena(e) => write!(f, "arena: {}", e),
            MenuError::Config(e) => write!(f, "config: {}", e),
        }
    }
}
