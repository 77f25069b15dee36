//! Host-side stand-in for the pad's GPIO, for running the pad loop on a PC

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use embedded_hal::digital::{ErrorType, InputPin};

use super::controller::DEFAULT_PINS;
use crate::link::protocol::{ButtonState, Channel};

/// Pull-up input whose level is driven from software. Low while pressed.
#[derive(Debug, Clone, Default)]
pub struct VirtualPin {
    pressed: Arc<AtomicBool>,
}

impl ErrorType for VirtualPin {
    type Error = Infallible;
}

impl InputPin for VirtualPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed.load(Ordering::Relaxed))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed.load(Ordering::Relaxed))
    }
}

/// Three virtual buttons wired like the real pad
#[derive(Debug, Clone, Default)]
pub struct VirtualPad {
    a: VirtualPin,
    b: VirtualPin,
    c: VirtualPin,
}

impl VirtualPad {
    pub fn new() -> Self {
        Self::default()
    }

    fn pin(&self, channel: Channel) -> &VirtualPin {
        match channel {
            Channel::A => &self.a,
            Channel::B => &self.b,
            Channel::C => &self.c,
        }
    }

    /// `(channel, gpio, pin)` triples for [`PadController::new`](super::PadController::new)
    pub fn wiring(&self) -> Vec<(Channel, u8, VirtualPin)> {
        DEFAULT_PINS
            .iter()
            .map(|&(channel, gpio)| (channel, gpio, self.pin(channel).clone()))
            .collect()
    }

    pub fn set(&self, channel: Channel, pressed: bool) {
        self.pin(channel).pressed.store(pressed, Ordering::Relaxed);
    }

    pub fn is_pressed(&self, channel: Channel) -> bool {
        self.pin(channel).pressed.load(Ordering::Relaxed)
    }

    /// Apply a console command: `<channel>` toggles the button,
    /// `<channel> down|up` sets it. Returns the new level, or `None` for
    /// anything unrecognised.
    pub fn apply_command(&self, command: &str) -> Option<(Channel, bool)> {
        let mut tokens = command.split_whitespace();
        let channel: Channel = tokens.next()?.parse().ok()?;
        let pressed = match tokens.next() {
            None => !self.is_pressed(channel),
            Some(state) => match state.parse().ok()? {
                ButtonState::Down | ButtonState::Held => true,
                ButtonState::Up => false,
            },
        };
        self.set(channel, pressed);
        Some((channel, pressed))
    }
}
