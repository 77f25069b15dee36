//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::link::DEFAULT_BAUD;
use crate::util::time::DEFAULT_FRAME_RATE;

#[cfg(windows)]
const DEFAULT_FALLBACK_PORT: &str = "COM3";
#[cfg(not(windows))]
const DEFAULT_FALLBACK_PORT: &str = "/dev/ttyACM0";

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Serial input enabled
    pub serial_enabled: bool,
    /// Explicit serial port, skips discovery
    pub serial_port: Option<String>,
    /// Port used when discovery finds nothing
    pub fallback_port: String,
    /// Substring matched against port descriptions during discovery
    pub port_hint: String,
    /// Serial baud rate
    pub baud: u32,

    /// Target frames per second
    pub frame_rate: u32,
    /// Obstacle RNG seed; random when unset
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Log file (the terminal belongs to the game)
    pub log_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());

        let frame_rate = parse_or(&var, "FRAME_RATE", DEFAULT_FRAME_RATE)?;
        if !(1..=240).contains(&frame_rate) {
            return Err(ConfigError::Invalid {
                var: "FRAME_RATE",
                value: frame_rate.to_string(),
            });
        }

        Ok(Self {
            serial_enabled: parse_bool(&var, "SERIAL_ENABLED", true)?,
            serial_port: var("SERIAL_PORT"),
            fallback_port: var("PICO_PORT").unwrap_or_else(|| DEFAULT_FALLBACK_PORT.to_string()),
            port_hint: var("SERIAL_PORT_HINT").unwrap_or_else(|| "pico".to_string()),
            baud: parse_or(&var, "SERIAL_BAUD", DEFAULT_BAUD)?,

            frame_rate,
            seed: var("GAME_SEED")
                .map(|v| parse_value("GAME_SEED", &v))
                .transpose()?,

            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: parse_or(&var, "LOG_FORMAT", LogFormat::Pretty)?,
            log_file: var("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("skyfall.log")),
        })
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var: key,
        value: value.to_string(),
    })
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&'static str) -> Option<String>,
{
    match var(key) {
        Some(value) => parse_value(key, &value),
        None => Ok(default),
    }
}

fn parse_bool<F>(var: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    match var(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(ConfigError::Invalid { var: key, value: v }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
