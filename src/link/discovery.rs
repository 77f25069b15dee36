//! Serial port discovery heuristic

use serialport::{SerialPortInfo, SerialPortType};
use tracing::{debug, warn};

/// Pick the port to open: the first one whose description mentions `hint`,
/// otherwise the first port listed, otherwise `fallback`.
pub fn find_port(hint: &str, fallback: &str) -> String {
    match serialport::available_ports() {
        Ok(ports) => select_port(&ports, hint, fallback),
        Err(err) => {
            warn!(error = %err, fallback = %fallback, "Unable to enumerate serial ports");
            fallback.to_string()
        }
    }
}

/// Selection rule used by [`find_port`]
pub fn select_port(ports: &[SerialPortInfo], hint: &str, fallback: &str) -> String {
    let hint = hint.to_lowercase();

    if !hint.is_empty() {
        if let Some(port) = ports
            .iter()
            .find(|p| description(p).to_lowercase().contains(&hint))
        {
            debug!(port = %port.port_name, "Serial port matched description hint");
            return port.port_name.clone();
        }
    }

    ports
        .first()
        .map(|p| p.port_name.clone())
        .unwrap_or_else(|| fallback.to_string())
}

/// Human readable description of a port, built from its USB strings
fn description(port: &SerialPortInfo) -> String {
    match &port.port_type {
        SerialPortType::UsbPort(usb) => [usb.manufacturer.as_deref(), usb.product.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" "),
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::Unknown => String::new(),
    }
}
