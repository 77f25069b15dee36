//! Skyfall pad emulator
//!
//! Runs the button pad loop on a PC. Buttons are driven from the console
//! (`a`, `b`, `c` toggle; `a down` / `a up` set), every line goes out on the
//! serial port and is mirrored to stdout, and Ctrl+C sends the stop line.
//! Point it at one end of a virtual serial pair and the game at the other.

use std::io::{self, BufRead};
use std::thread;

use anyhow::Context;
use tracing::{info, warn};

use skyfall::config::Config;
use skyfall::link::transport::open_serial_writer;
use skyfall::pad::{Mirrored, PadController, VirtualPad, WriteSink};
use skyfall::util::logging::init_tracing;
use skyfall::util::signal::shutdown_signal;
use skyfall::util::time::{Clock, MonotonicClock};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(&config)?;

    let link = if config.serial_enabled {
        let port = config
            .serial_port
            .clone()
            .unwrap_or_else(|| config.fallback_port.clone());
        let serial = open_serial_writer(&port, config.baud)
            .with_context(|| format!("Failed to open serial port {port}"))?;
        info!(port = %port, baud = config.baud, "Pad writing to serial port");
        Some(WriteSink::new(serial))
    } else {
        info!("Serial output disabled, console only");
        None
    };

    let sink = Mirrored {
        link,
        diagnostic: WriteSink::new(io::stdout()),
    };

    let pad = VirtualPad::new();
    let clock = MonotonicClock::new();
    let mut controller = PadController::new(pad.wiring(), sink, clock.now());

    spawn_console(pad);
    controller.run(&clock, shutdown_signal()).await;

    info!("Pad emulator stopped");
    Ok(())
}

/// Read button commands from stdin on a plain thread; blocking reads there
/// never hold up runtime shutdown.
fn spawn_console(pad: VirtualPad) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!(error = %err, "Console read failed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match pad.apply_command(&line) {
                Some((channel, pressed)) => info!(%channel, pressed, "Button set"),
                None => warn!(command = %line.trim(), "Unknown pad command"),
            }
        }
    });
}
