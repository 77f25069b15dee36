//! Byte accumulator that reassembles newline-terminated lines

use bytes::{Buf, BytesMut};
use tracing::debug;

/// Longest unterminated run kept while waiting for a newline. Real lines are
/// a few bytes, so anything longer is line noise and is discarded.
pub const MAX_PENDING: usize = 4096;

/// Accumulates raw bytes from the link and yields complete lines.
///
/// Bytes after the last `\n` stay buffered until more data arrives, so chunk
/// boundaries never affect which lines come out.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: BytesMut,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Mutable access for transports that read straight into the buffer
    pub fn bytes_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }

    /// Number of buffered bytes not yet terminated by a newline
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Pop the next complete line, decoded as UTF-8 with invalid bytes dropped.
    ///
    /// When no newline is buffered and more than [`MAX_PENDING`] bytes have
    /// piled up, they are dropped; the next line may then arrive truncated
    /// and is rejected by the parser like any other malformed line.
    pub fn next_line(&mut self) -> Option<String> {
        let Some(newline) = self.buf.iter().position(|&b| b == b'\n') else {
            if self.buf.len() > MAX_PENDING {
                debug!(dropped = self.buf.len(), "Discarding unterminated input");
                self.buf.clear();
            }
            return None;
        };
        let line = self.buf.split_to(newline);
        self.buf.advance(1);
        Some(decode_dropping_invalid(&line))
    }
}

/// Decode bytes as UTF-8, silently skipping any invalid sequences
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

impl Iterator for LineBuffer {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_line()
    }
}
