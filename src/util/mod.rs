//! Utility modules

pub mod logging;
pub mod signal;
pub mod time;
