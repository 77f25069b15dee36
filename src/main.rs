//! Skyfall - terminal arcade game
//!
//! Entry point. It handles:
//! - Configuration from the environment (and an optional `.env`)
//! - File logging, since the game owns the terminal
//! - Picking and opening the pad's serial port
//! - Running the frame loop until quit or a shutdown signal

use tracing::{error, info};

use skyfall::app::{run_in_terminal, App};
use skyfall::config::Config;
use skyfall::game::GameSession;
use skyfall::link::discovery::find_port;
use skyfall::link::SerialPortReader;
use skyfall::ui::KeyboardState;
use skyfall::util::logging::init_tracing;
use skyfall::util::signal::shutdown_signal;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config)?;

    info!("Starting Skyfall");

    let reader = open_reader(&config);

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, "Game seed");

    let mut app = App::new(
        GameSession::new(seed),
        reader,
        KeyboardState::default(),
        config.frame_rate,
    );

    let result = run_in_terminal(&mut app, shutdown_signal()).await;
    match &result {
        Ok(()) => info!(score = app.session().score(), "Skyfall exited"),
        Err(err) => error!(error = %err, "Skyfall exited with an error"),
    }
    result
}

/// Serial reader for the configured or discovered port
fn open_reader(config: &Config) -> SerialPortReader {
    if !config.serial_enabled {
        info!("Serial input disabled, keyboard only");
        return SerialPortReader::disabled();
    }

    let port = match &config.serial_port {
        Some(port) => port.clone(),
        None => find_port(&config.port_hint, &config.fallback_port),
    };
    SerialPortReader::open(&port, config.baud)
}
