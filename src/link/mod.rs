//! Serial link between the button pad and the game

pub mod discovery;
pub mod line_buffer;
pub mod protocol;
pub mod reader;
pub mod transport;

pub use protocol::{ButtonState, Channel, InputEvent};
pub use reader::{HostInputState, LinkStatus, SerialLineReader, SerialPortReader};
pub use transport::{Transport, TransportError};

/// Baud rate the pad firmware uses
pub const DEFAULT_BAUD: u32 = 115_200;
