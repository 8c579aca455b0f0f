//! # Solar Bridge
//!
//! Poll and decode telemetry from a serial solar charge controller.
//!
//! This application polls the controller's data register block on a fixed
//! interval (and the info block less frequently), decodes both into
//! snapshots, and logs the result until interrupted.

use anyhow::Result;
use tokio::time::{interval, Duration};
use tracing::{info, warn};
use tracing_subscriber;

mod config;
mod controller;
mod error;
mod protocol;
mod serial;

use config::Config;
use controller::ChargeController;

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for the Solar Bridge application
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (first CLI argument or `config/default.toml`)
///    - Open the serial link and attach the modbus client
///
/// 2. **Main Loop**
///    - Poll the data block on the configured interval
///    - Poll the info block on its own, slower interval
///    - Log a status line per successful poll; read failures are logged and
///      polling continues (retry policy is simply the next tick)
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if the configuration cannot be loaded or no serial device
/// can be opened.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Solar Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;
    info!("Loaded configuration from {}", config_path);

    let io = serial::connect(&config.serial)?;
    let mut controller = ChargeController::new(io, config.protocol.version_separator.clone());

    let mut data_interval = interval(Duration::from_millis(config.polling.data_interval_ms));
    let mut info_interval = interval(Duration::from_millis(config.polling.info_interval_ms));

    info!(
        "Polling data block every {}ms, info block every {}ms",
        config.polling.data_interval_ms, config.polling.info_interval_ms
    );
    info!("Press Ctrl+C to exit");

    let mut poll_count: u64 = 0;

    // Main polling loop; one task owns the session, so transactions are
    // naturally serialized.
    loop {
        tokio::select! {
            _ = data_interval.tick() => {
                match controller.poll_data().await {
                    Ok(()) => {
                        poll_count += 1;
                        info!(
                            "Battery {}% {:.1}V {:.1}A ({:.1}W), panel {:.1}V {:.2}A, load {}W",
                            controller.data.battery_soc,
                            controller.data.battery_voltage,
                            controller.data.battery_current,
                            controller.data.battery_power,
                            controller.data.solar_panel_voltage,
                            controller.data.solar_panel_current,
                            controller.data.load_power,
                        );

                        if config.output.json {
                            match serde_json::to_string(&controller.data) {
                                Ok(line) => println!("{}", line),
                                Err(e) => warn!("Failed to serialize snapshot: {}", e),
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Telemetry poll failed: {}", e);
                    }
                }
            }

            _ = info_interval.tick() => {
                match controller.poll_info().await {
                    Ok(()) => {
                        info!(
                            "Controller {} (sw {}, hw {}), rated {}V/{}A, address {}",
                            controller.info.product_model,
                            controller.info.software_version,
                            controller.info.hardware_version,
                            controller.info.rated_voltage,
                            controller.info.rated_current,
                            controller.info.modbus_address,
                        );
                    }
                    Err(e) => {
                        warn!("Identity poll failed: {}", e);
                    }
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total successful telemetry polls: {}", poll_count);
                break;
            }
        }
    }

    Ok(())
}
