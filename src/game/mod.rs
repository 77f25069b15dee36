//! Game simulation modules

pub mod combat;
pub mod entities;
pub mod physics;
pub mod session;
pub mod tuning;

pub use session::{GameEvent, GameSession, SessionPhase};

/// Control flags for a single frame, after merging every input source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlVector {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// An input source that reports held movement and one-shot fire requests
pub trait ControlSource {
    fn left_held(&self) -> bool;
    fn right_held(&self) -> bool;
    /// Read and clear a pending fire request
    fn consume_shot(&mut self) -> bool;
}

impl ControlVector {
    /// Combine keyboard flags with an external source.
    ///
    /// The source's shot is only consumed when the keyboard is not already
    /// firing, so a pad press made while the fire key is down carries over
    /// to a later frame.
    pub fn merge(keyboard: ControlVector, source: &mut impl ControlSource) -> Self {
        Self {
            left: keyboard.left || source.left_held(),
            right: keyboard.right || source.right_held(),
            fire: keyboard.fire || source.consume_shot(),
        }
    }
}
