//! # Serial Communication Module
//!
//! Opens the serial link to the charge controller and attaches the modbus
//! RTU client that carries the register transactions.
//!
//! This module handles:
//! - Opening the serial port at 9600 baud, 8N1
//! - Auto-detecting the device across common paths when none is configured
//! - Attaching the modbus client at the controller's station address

pub mod register_io;

pub use register_io::{ModbusRegisterIO, RegisterIO};

use tokio_modbus::client::rtu;
use tokio_modbus::prelude::Slave;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use crate::config::SerialConfig;
use crate::error::{Result, SolarBridgeError};

/// Default device paths to try when no port is configured
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyUSB0", // USB-to-serial adapters (most common wiring)
    "/dev/ttyACM0", // USB CDC devices
];

/// Open the controller link and return the register transport
///
/// Tries the configured port, or the default device paths when the
/// configured port is empty.
///
/// # Errors
///
/// Returns `SerialPortNotFound` if no candidate path can be opened.
pub fn connect(config: &SerialConfig) -> Result<ModbusRegisterIO> {
    let candidates: Vec<&str> = if config.port.is_empty() {
        DEFAULT_DEVICE_PATHS.to_vec()
    } else {
        vec![config.port.as_str()]
    };

    for path in &candidates {
        debug!("Trying to open serial port: {}", path);

        match open_port(path, config.baud_rate) {
            Ok(port) => {
                info!("Opened charge controller port at {}", path);
                let context = rtu::attach_slave(port, Slave(config.modbus_address));
                return Ok(ModbusRegisterIO::new(context));
            }
            Err(e) => {
                warn!("Failed to open {}: {}", path, e);
                continue;
            }
        }
    }

    Err(SolarBridgeError::SerialPortNotFound(candidates.join(", ")))
}

/// Open a specific serial port with the controller's link settings (8N1)
fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
    let port = tokio_serial::new(path, baud_rate)
        .data_bits(tokio_serial::DataBits::Eight)
        .parity(tokio_serial::Parity::None)
        .stop_bits(tokio_serial::StopBits::One)
        .flow_control(tokio_serial::FlowControl::None)
        .open_native_async()
        .map_err(|e| SolarBridgeError::Serial(format!("Failed to open {}: {}", path, e)))?;

    Ok(port)
}
