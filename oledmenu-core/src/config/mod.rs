//! Menu configuration
//!
//! Board-agnostic settings, optionally stored as postcard binary data.

pub mod types;

pub use types::*;
