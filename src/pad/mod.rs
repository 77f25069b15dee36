//! Button pad firmware core
//!
//! Board-independent: pins come in through `embedded_hal::digital::InputPin`
//! and lines go out through a [`LineSink`], so the same loop runs on the
//! microcontroller, on a PC with [`VirtualPad`] pins, and under test.

pub mod controller;
pub mod debounce;
pub mod host;

pub use controller::{LineSink, Mirrored, PadController, WriteSink, DEFAULT_PINS, POLL_INTERVAL};
pub use debounce::{ButtonChannel, DEBOUNCE_MS, HELD_INTERVAL_MS};
pub use host::{VirtualPad, VirtualPin};
