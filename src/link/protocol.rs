//! Button pad wire protocol
//! One ASCII line per event: `<CHANNEL> <STATE>\n`

use std::fmt;
use std::str::FromStr;

/// Button channels on the pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Move left
    A,
    /// Move right
    B,
    /// Fire
    C,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::A => "A",
            Channel::B => "B",
            Channel::C => "C",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for tokens that are not a known channel or state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized token: {0}")]
pub struct UnknownToken(pub String);

impl FromStr for Channel {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Channel::A),
            "B" => Ok(Channel::B),
            "C" => Ok(Channel::C),
            _ => Err(UnknownToken(s.to_string())),
        }
    }
}

/// Debounced button state keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    /// Stable press committed
    Down,
    /// Stable release committed
    Up,
    /// Heartbeat while the button stays pressed
    Held,
}

impl ButtonState {
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonState::Down => "DOWN",
            ButtonState::Up => "UP",
            ButtonState::Held => "HELD",
        }
    }

    /// DOWN and HELD both mean the button is currently pressed
    pub fn is_pressed(self) -> bool {
        matches!(self, ButtonState::Down | ButtonState::Held)
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ButtonState {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DOWN" => Ok(ButtonState::Down),
            "UP" => Ok(ButtonState::Up),
            "HELD" => Ok(ButtonState::Held),
            _ => Err(UnknownToken(s.to_string())),
        }
    }
}

/// A single button event as carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub channel: Channel,
    pub state: ButtonState,
}

impl InputEvent {
    pub fn new(channel: Channel, state: ButtonState) -> Self {
        Self { channel, state }
    }

    /// Parse one line (without its terminator).
    ///
    /// Returns `None` for empty lines, unknown channels, and lines with a
    /// missing or unknown state keyword. Tokens past the second are ignored,
    /// so the pad's free-text start/stop lines never parse as events.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let channel = tokens.next()?.parse().ok()?;
        let state = tokens.next()?.parse().ok()?;
        Some(Self { channel, state })
    }

    /// Wire form including the trailing newline
    pub fn to_line(self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.channel, self.state)
    }
}
