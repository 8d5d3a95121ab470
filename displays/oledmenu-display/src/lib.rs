//! Monochrome raster target for the oledmenu engine
//!
//! This crate provides:
//! - `RasterDisplay`, a 1 bpp frame-buffered panel implementing
//!   `oledmenu_core::MenuDisplay`
//! - A height-ordered font metrics table and the matching `FontTable`
//! - `Screen`, the text runs of a transferred frame
//!
//! The panel keeps a back buffer that the menu draws into and a front
//! buffer that holds the last transferred frame, so a host can inspect
//! exactly what a physical OLED would show.

#![no_std]
#![deny(unsafe_code)]

pub mod fonts;
pub mod raster;
pub mod screen;

// Re-export key types
pub use fonts::{font_table, GlyphMetrics, FALLBACK_FONT};
pub use raster::{Framebuffer, RasterDisplay};
pub use screen::{Screen, TextRun};
