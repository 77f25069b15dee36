//! Host side of the pad link: line reassembly and input-state folding

use serialport::SerialPort;
use tracing::{debug, error, info, warn};

use super::line_buffer::LineBuffer;
use super::protocol::{ButtonState, Channel, InputEvent};
use super::transport::{open_serial, Transport, TransportError};
use crate::game::ControlSource;

/// What the pad says the control state is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostInputState {
    /// Channel A is down or held
    pub left_held: bool,
    /// Channel B is down or held
    pub right_held: bool,
    /// Channel C fired since the last consumed shot
    shoot_pending: bool,
}

impl HostInputState {
    /// Fold one event into the state
    pub fn apply(&mut self, event: InputEvent) {
        match event.channel {
            Channel::A => self.left_held = event.state.is_pressed(),
            Channel::B => self.right_held = event.state.is_pressed(),
            Channel::C => {
                // Fire is press-triggered; release does nothing
                if event.state != ButtonState::Up {
                    self.shoot_pending = true;
                }
            }
        }
    }

    #[cfg(test)]
    pub fn shoot_pending(&self) -> bool {
        self.shoot_pending
    }

    /// Read and clear the one-shot fire flag
    pub fn take_shot(&mut self) -> bool {
        std::mem::take(&mut self.shoot_pending)
    }
}

/// Link health, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Serial input switched off by configuration
    Disabled,
    /// The port could not be opened
    Unavailable,
    /// Reading normally
    Connected,
    /// A read failed; reads continue but data may be stale
    Faulted,
}

/// Reads button lines from a transport and keeps the resulting input state.
///
/// Never fails after construction: a missing or broken transport just means
/// no new input.
pub struct SerialLineReader<T> {
    port: String,
    transport: Option<T>,
    status: LinkStatus,
    lines: LineBuffer,
    state: HostInputState,
    reported_error: bool,
}

/// Reader over a real serial port
pub type SerialPortReader = SerialLineReader<Box<dyn SerialPort>>;

impl SerialPortReader {
    /// Open `port` at `baud`, degrading to a reader without input on failure
    pub fn open(port: &str, baud: u32) -> Self {
        let reader = Self::open_with(port, || open_serial(port, baud));
        if reader.status == LinkStatus::Connected {
            info!(port = %port, baud, "Listening for pad input");
        }
        reader
    }
}

impl<T: Transport> SerialLineReader<T> {
    pub fn new(port: impl Into<String>, transport: T) -> Self {
        Self::with_transport(port.into(), Some(transport), LinkStatus::Connected)
    }

    /// Reader with serial input switched off
    pub fn disabled() -> Self {
        Self::with_transport("none".to_string(), None, LinkStatus::Disabled)
    }

    /// Build a reader from a fallible opener. An open failure is logged once
    /// and leaves the reader permanently without input.
    pub fn open_with<F>(port: impl Into<String>, open: F) -> Self
    where
        F: FnOnce() -> Result<T, TransportError>,
    {
        let port = port.into();
        match open() {
            Ok(transport) => Self::with_transport(port, Some(transport), LinkStatus::Connected),
            Err(err) => {
                warn!(port = %port, error = %err, "Unable to open serial port, keyboard only");
                Self::with_transport(port, None, LinkStatus::Unavailable)
            }
        }
    }

    fn with_transport(port: String, transport: Option<T>, status: LinkStatus) -> Self {
        Self {
            port,
            transport,
            status,
            lines: LineBuffer::new(),
            state: HostInputState::default(),
            reported_error: false,
        }
    }

    /// Pull whatever bytes are available and fold every complete line.
    /// Safe to call every frame regardless of link health.
    pub fn poll(&mut self) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };

        match transport.read_available(self.lines.bytes_mut()) {
            Ok(0) => return,
            Ok(_) => {}
            Err(err) => {
                self.report_read_error(&err);
                return;
            }
        }

        while let Some(line) = self.lines.next_line() {
            if let Some(event) = InputEvent::parse_line(&line) {
                debug!(channel = %event.channel, state = %event.state, "Pad event");
                self.state.apply(event);
            }
        }
    }

    fn report_read_error(&mut self, err: &TransportError) {
        self.status = LinkStatus::Faulted;
        if self.reported_error {
            return;
        }
        self.reported_error = true;
        if err.is_expected() {
            warn!(port = %self.port, error = %err, "Serial link lost");
        } else {
            error!(port = %self.port, error = %err, "Serial link failed unexpectedly");
        }
    }

    /// Read and clear the pending shot. Call at most once per frame.
    pub fn consume_shot(&mut self) -> bool {
        self.state.take_shot()
    }

    pub fn left_held(&self) -> bool {
        self.state.left_held
    }

    pub fn right_held(&self) -> bool {
        self.state.right_held
    }

    pub fn state(&self) -> HostInputState {
        self.state
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn port(&self) -> &str {
        &self.port
    }
}

impl<T: Transport> ControlSource for SerialLineReader<T> {
    fn left_held(&self) -> bool {
        SerialLineReader::left_held(self)
    }

    fn right_held(&self) -> bool {
        SerialLineReader::right_held(self)
    }

    fn consume_shot(&mut self) -> bool {
        SerialLineReader::consume_shot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use std::collections::VecDeque;
    use std::io;

    /// Hands out one scripted result per read
    #[derive(Default)]
    struct ScriptedTransport {
        reads: VecDeque<Result<Vec<u8>, TransportError>>,
    }

    impl ScriptedTransport {
        fn chunk(mut self, bytes: &[u8]) -> Self {
            self.reads.push_back(Ok(bytes.to_vec()));
            self
        }

        fn fail(mut self, err: TransportError) -> Self {
            self.reads.push_back(Err(err));
            self
        }
    }

    impl Transport for ScriptedTransport {
        fn read_available(&mut self, buf: &mut BytesMut) -> Result<usize, TransportError> {
            match self.reads.pop_front() {
                Some(Ok(bytes)) => {
                    buf.extend_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(Err(err)) => Err(err),
                None => Ok(0),
            }
        }
    }

    fn reader(transport: ScriptedTransport) -> SerialLineReader<ScriptedTransport> {
        SerialLineReader::new("test", transport)
    }

    #[test]
    fn split_line_reassembled_across_polls() {
        let mut reader = reader(
            ScriptedTransport::default()
                .chunk(b"A DOWN\nB DOW")
                .chunk(b"N\nA UP\n"),
        );

        reader.poll();
        assert!(reader.left_held());
        assert!(!reader.right_held());

        reader.poll();
        assert!(reader.right_held());
        assert!(!reader.left_held());
    }

    #[test]
    fn shot_is_consumed_once() {
        let mut reader = reader(ScriptedTransport::default().chunk(b"C DOWN\n"));
        reader.poll();
        assert!(reader.consume_shot());
        assert!(!reader.consume_shot());
    }

    #[test]
    fn unconsumed_shot_waits_for_next_frame() {
        let mut reader = reader(ScriptedTransport::default().chunk(b"C DOWN\nC UP\n"));
        reader.poll();
        // No consume this frame; release does not cancel the shot
        reader.poll();
        assert!(reader.consume_shot());
    }

    #[test]
    fn held_heartbeat_rearms_shot() {
        let mut reader = reader(
            ScriptedTransport::default()
                .chunk(b"C DOWN\n")
                .chunk(b"C HELD\n"),
        );
        reader.poll();
        assert!(reader.consume_shot());
        reader.poll();
        assert!(reader.consume_shot());
        assert!(!reader.consume_shot());
    }

    #[test]
    fn movement_flags_are_idempotent_levels() {
        let mut reader = reader(
            ScriptedTransport::default()
                .chunk(b"A DOWN\nA HELD\nA HELD\n")
                .chunk(b"A UP\nA UP\n"),
        );
        reader.poll();
        assert!(reader.left_held());
        reader.poll();
        assert!(!reader.left_held());
    }

    #[test]
    fn lowercase_lines_are_accepted() {
        let mut reader = reader(ScriptedTransport::default().chunk(b"b down\r\n"));
        reader.poll();
        assert!(reader.right_held());
    }

    #[test]
    fn unknown_and_malformed_lines_change_nothing() {
        let mut reader = reader(
            ScriptedTransport::default()
                .chunk(b"X DOWN\nA\n\nStarted - monitoring A(16), B(27), C(28)\n"),
        );
        reader.poll();
        assert_eq!(reader.state(), HostInputState::default());
        assert_eq!(reader.status(), LinkStatus::Connected);
    }

    #[test]
    fn failed_open_yields_no_input_forever() {
        let mut reader = SerialLineReader::<ScriptedTransport>::open_with("COM9", || {
            Err(TransportError::NotConnected("no such port".to_string()))
        });
        assert_eq!(reader.status(), LinkStatus::Unavailable);

        for _ in 0..3 {
            reader.poll();
            assert!(!reader.left_held());
            assert!(!reader.right_held());
            assert!(!reader.consume_shot());
        }
    }

    #[test]
    fn read_error_keeps_last_flags_and_reader_alive() {
        let mut reader = reader(
            ScriptedTransport::default()
                .chunk(b"A DOWN\n")
                .fail(io::Error::from(io::ErrorKind::BrokenPipe).into())
                .fail(TransportError::Other("weird".to_string()))
                .chunk(b"B DOWN\n"),
        );

        reader.poll();
        reader.poll();
        assert_eq!(reader.status(), LinkStatus::Faulted);
        assert!(reader.left_held());
        assert!(reader.reported_error);

        reader.poll();
        reader.poll();
        assert!(reader.right_held());
        assert!(reader.left_held());
    }

    #[test]
    fn disabled_reader_is_inert() {
        let mut reader = SerialLineReader::<ScriptedTransport>::disabled();
        reader.poll();
        assert_eq!(reader.status(), LinkStatus::Disabled);
        assert!(!reader.consume_shot());
    }

    #[test]
    fn events_identical_for_any_chunking() {
        let stream: &[u8] = b"A DOWN\nC DOWN\nb held\nA UP\nC HELD\nB UP\nA DOWN\n";

        let mut whole = reader(ScriptedTransport::default().chunk(stream));
        whole.poll();
        let expected = whole.state();

        for split in 0..=stream.len() {
            let mut chunked = reader(
                ScriptedTransport::default()
                    .chunk(&stream[..split])
                    .chunk(&stream[split..]),
            );
            chunked.poll();
            chunked.poll();
            assert_eq!(chunked.state(), expected, "split at {split}");
        }
    }
}
