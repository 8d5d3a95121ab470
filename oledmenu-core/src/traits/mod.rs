//! Collaborator traits
//!
//! These traits define the interface between the menu logic and the
//! hardware it runs on.

pub mod clock;
pub mod display;

pub use clock::Clock;
pub use display::{DisplayError, FontMode, MenuDisplay};
