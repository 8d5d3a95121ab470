//! Menu controller and input handling

mod controller;
mod input;

pub use controller::{Menu, DEFAULT_ARENA_SIZE};
pub use input::{InputEvent, MenuAction};
