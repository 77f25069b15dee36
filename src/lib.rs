//! Skyfall - dodge-and-shoot arcade game for the terminal
//!
//! Played with the keyboard or with a three-button pad that reports
//! debounced button events as text lines over a serial link.

pub mod app;
pub mod config;
pub mod game;
pub mod link;
pub mod pad;
pub mod ui;
pub mod util;
