//! Pad superloop: sample pins, debounce, announce lines

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use embedded_hal::digital::InputPin;
use tracing::{debug, warn};

use super::debounce::ButtonChannel;
use crate::link::protocol::{ButtonState, Channel};
use crate::util::time::{Clock, Millis};

/// Sleep between polls
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// GPIO numbers the pad is wired to
pub const DEFAULT_PINS: [(Channel, u8); 3] = [(Channel::A, 16), (Channel::B, 27), (Channel::C, 28)];

/// Final line sent when the loop is interrupted
pub const STOP_LINE: &str = "Stopped.";

/// Destination for outgoing lines (without terminator)
pub trait LineSink {
    fn send_line(&mut self, line: &str);
}

/// A missing sink drops lines
impl<S: LineSink> LineSink for Option<S> {
    fn send_line(&mut self, line: &str) {
        if let Some(sink) = self {
            sink.send_line(line);
        }
    }
}

impl LineSink for Vec<String> {
    fn send_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Newline-terminated lines on any writer, e.g. a UART or the console
#[derive(Debug)]
pub struct WriteSink<W> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriteSink<W> {
    fn send_line(&mut self, line: &str) {
        let result = writeln!(self.writer, "{line}").and_then(|_| self.writer.flush());
        if let Err(err) = result {
            warn!(error = %err, "Failed to write pad line");
        }
    }
}

/// Sends every line to the link and mirrors it to a diagnostic output
#[derive(Debug)]
pub struct Mirrored<L, D> {
    pub link: L,
    pub diagnostic: D,
}

impl<L: LineSink, D: LineSink> LineSink for Mirrored<L, D> {
    fn send_line(&mut self, line: &str) {
        self.diagnostic.send_line(line);
        self.link.send_line(line);
    }
}

struct PadButton<P> {
    gpio: u8,
    pin: P,
    debounce: ButtonChannel,
}

/// Owns the pad's buttons and its output sink.
///
/// Pins are pull-up inputs, so a low level means pressed.
pub struct PadController<P, S> {
    buttons: Vec<PadButton<P>>,
    sink: S,
}

impl<P: InputPin, S: LineSink> PadController<P, S> {
    /// Wire up `(channel, gpio, pin)` triples; each pin's current level is
    /// taken as its stable starting state.
    pub fn new(pins: impl IntoIterator<Item = (Channel, u8, P)>, sink: S, now: Millis) -> Self {
        let buttons = pins
            .into_iter()
            .map(|(channel, gpio, mut pin)| {
                let pressed = match pin.is_low() {
                    Ok(low) => low,
                    Err(err) => {
                        warn!(%channel, gpio, error = ?err, "Pin read failed at startup");
                        false
                    }
                };
                PadButton {
                    gpio,
                    pin,
                    debounce: ButtonChannel::new(channel, pressed, now),
                }
            })
            .collect();

        Self { buttons, sink }
    }

    fn send(&mut self, line: &str) {
        debug!(line = %line, "Pad send");
        self.sink.send_line(line);
    }

    /// Informational banner listing the monitored buttons
    pub fn start_line(&self) -> String {
        let pins = self
            .buttons
            .iter()
            .map(|b| format!("{}({})", b.debounce.channel(), b.gpio))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Started - monitoring {pins}")
    }

    pub fn announce_start(&mut self) {
        let line = self.start_line();
        self.send(&line);
    }

    pub fn announce_stop(&mut self) {
        self.send(STOP_LINE);
    }

    /// Sample every button once at `now` and send any resulting lines
    pub fn tick(&mut self, now: Millis) {
        let mut lines = Vec::new();

        for button in &mut self.buttons {
            let pressed = match button.pin.is_low() {
                Ok(low) => low,
                Err(err) => {
                    warn!(channel = %button.debounce.channel(), error = ?err, "Pin read failed");
                    continue;
                }
            };

            if let Some(event) = button.debounce.update(pressed, now) {
                if event.state == ButtonState::Down {
                    debug!(channel = %event.channel, "Press started");
                }
                lines.push(event.to_string());
            }
        }

        for line in lines {
            self.send(&line);
        }
    }

    /// Run the superloop until `shutdown` resolves, then send the stop line
    pub async fn run<C, F>(&mut self, clock: &C, shutdown: F)
    where
        C: Clock,
        F: Future<Output = ()>,
    {
        self.announce_start();
        tokio::pin!(shutdown);

        loop {
            self.tick(clock.now());
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(POLL_INTERVAL) => {}
            }
        }

        self.announce_stop();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
