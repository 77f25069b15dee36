//! Terminal front end: keyboard input and drawing

pub mod keyboard;
pub mod render;

pub use keyboard::{KeyAction, KeyboardState};
pub use render::{draw, LinkView};
