//! Byte transports feeding the line reader

use std::io::{self, Read};
use std::time::Duration;

use bytes::BytesMut;
use serialport::SerialPort;

/// Transport failures, split into the kinds the reader expects
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("device not connected: {0}")]
    NotConnected(String),

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    #[error("unexpected transport failure: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether this is one of the failure kinds a serial link routinely hits
    pub fn is_expected(&self) -> bool {
        !matches!(self, TransportError::Other(_))
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => TransportError::NotConnected(err.to_string()),
            _ => TransportError::Io(err),
        }
    }
}

impl From<serialport::Error> for TransportError {
    fn from(err: serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::NoDevice => TransportError::NotConnected(err.description),
            serialport::ErrorKind::Io(kind) => io::Error::new(kind, err.description).into(),
            serialport::ErrorKind::InvalidInput | serialport::ErrorKind::Unknown => {
                TransportError::Other(err.description)
            }
        }
    }
}

/// A non-blocking source of bytes
pub trait Transport {
    /// Append every byte that is available right now to `buf` without
    /// waiting for more. Returns the number of bytes appended.
    fn read_available(&mut self, buf: &mut BytesMut) -> Result<usize, TransportError>;
}

impl Transport for Box<dyn SerialPort> {
    fn read_available(&mut self, buf: &mut BytesMut) -> Result<usize, TransportError> {
        let available = self.bytes_to_read()? as usize;
        if available == 0 {
            return Ok(0);
        }

        let start = buf.len();
        buf.resize(start + available, 0);
        match self.read(&mut buf[start..]) {
            Ok(n) => {
                buf.truncate(start + n);
                Ok(n)
            }
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                buf.truncate(start);
                Ok(0)
            }
            Err(err) => {
                buf.truncate(start);
                Err(err.into())
            }
        }
    }
}

/// Open a serial port for zero-timeout reads
pub fn open_serial(port: &str, baud: u32) -> Result<Box<dyn SerialPort>, TransportError> {
    let port = serialport::new(port, baud)
        .timeout(Duration::ZERO)
        .open()?;
    Ok(port)
}

/// Open `port` for writing lines, as the pad does
pub fn open_serial_writer(port: &str, baud: u32) -> Result<Box<dyn SerialPort>, TransportError> {
    let port = serialport::new(port, baud)
        .timeout(Duration::from_millis(100))
        .open()?;
    Ok(port)
}
