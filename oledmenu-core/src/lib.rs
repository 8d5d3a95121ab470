//! Board-agnostic paged text menu for small monochrome displays
//!
//! This crate contains everything needed to drive a navigable text menu
//! without a general-purpose heap:
//!
//! - Fixed-capacity bump arena for page buffers
//! - Append-only page registry with regenerate-on-demand content
//! - Text layout and font selection by pixel-height budget
//! - Cursor, scroll, and blink control
//! - Error overlay channel that preempts normal rendering
//! - Menu controller tying navigation and the render pipeline together
//!
//! Pixel drawing is delegated to an implementation of
//! [`traits::MenuDisplay`]; time is sampled through [`traits::Clock`].

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod arena;
pub mod config;
pub mod cursor;
pub mod error;
pub mod layout;
pub mod menu;
pub mod overlay;
pub mod page;
pub mod traits;

pub use arena::{Arena, ArenaError, Handle};
pub use config::{ConfigError, MenuConfig};
pub use error::MenuError;
pub use layout::{FontId, FontTable};
pub use menu::{InputEvent, Menu, MenuAction};
pub use overlay::ErrorOverlay;
pub use page::{
    BufferRequest, BuiltinPage, ContentSource, PageContent, PageContext, PageSpec, PageType,
};
pub use traits::{Clock, DisplayError, FontMode, MenuDisplay};
