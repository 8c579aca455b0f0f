//! # Charge Controller Session
//!
//! Owns the register transport and both snapshots, and runs one transaction
//! per poll call.
//!
//! This module handles:
//! - Polling the data block and applying the telemetry decode
//! - Polling the info block and applying the identity decode
//! - The partial-failure contract for each block
//! - The fire-and-forget load on/off toggle

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{Result, SolarBridgeError};
use crate::protocol::{
    IdentitySnapshot, TelemetrySnapshot, DATA_BLOCK_LEN, DATA_BLOCK_START, INFO_BLOCK_LEN,
    INFO_BLOCK_START, LOAD_COMMAND_REGISTER, LOAD_OFF, LOAD_ON,
};
use crate::serial::RegisterIO;

/// One charge controller session
///
/// Exclusively owns both snapshots; all polling goes through `&mut self`, so
/// calls are serialized by construction. There is no retry policy here: each
/// poll performs exactly one transaction and reports the outcome, and the
/// caller owns any retry or backoff.
#[derive(Debug)]
pub struct ChargeController<T: RegisterIO> {
    io: T,
    version_separator: String,
    /// Live measurements from the data register block
    pub data: TelemetrySnapshot,
    /// Identity and ratings from the info register block
    pub info: IdentitySnapshot,
}

impl<T: RegisterIO> ChargeController<T> {
    /// Create a session over the given transport
    ///
    /// Both snapshots start zeroed/disconnected. `version_separator` is
    /// normally empty; see the identity decoder for the opt-in deviation.
    pub fn new(io: T, version_separator: String) -> Self {
        Self {
            io,
            version_separator,
            data: TelemetrySnapshot::default(),
            info: IdentitySnapshot::default(),
        }
    }

    /// Poll the data register block and update the telemetry snapshot
    ///
    /// On success the full mapping is applied and the snapshot is marked
    /// connected. On failure the snapshot's volatile fields are zeroed and
    /// the connected flag cleared; daily and lifetime aggregates keep their
    /// last observed values.
    ///
    /// # Errors
    ///
    /// Returns `DataReadFailed` if the transaction fails or returns the
    /// wrong number of registers.
    pub async fn poll_data(&mut self) -> Result<()> {
        match self.read_exact::<DATA_BLOCK_LEN>(DATA_BLOCK_START).await {
            Ok(registers) => {
                self.data.apply(&registers, Utc::now());
                debug!(
                    "Decoded data block: soc={}% battery={:.1}V",
                    self.data.battery_soc, self.data.battery_voltage
                );
                Ok(())
            }
            Err(e) => {
                warn!("Data block read failed: {}", e);
                self.data.mark_disconnected();
                Err(SolarBridgeError::DataReadFailed(e))
            }
        }
    }

    /// Poll the info register block and update the identity snapshot
    ///
    /// On failure the identity snapshot is left untouched; stale identity
    /// data is preferable to zeroing fields that rarely change.
    ///
    /// # Errors
    ///
    /// Returns `InfoReadFailed` if the transaction fails or returns the
    /// wrong number of registers.
    pub async fn poll_info(&mut self) -> Result<()> {
        match self.read_exact::<INFO_BLOCK_LEN>(INFO_BLOCK_START).await {
            Ok(registers) => {
                self.info
                    .apply(&registers, &self.version_separator, Utc::now());
                debug!(
                    "Decoded info block: model={} sw={}",
                    self.info.product_model, self.info.software_version
                );
                Ok(())
            }
            Err(e) => {
                warn!("Info block read failed: {}", e);
                Err(SolarBridgeError::InfoReadFailed(e))
            }
        }
    }

    /// Switch the load output on or off
    ///
    /// Single-register write with no read-back verification; unsupported on
    /// some controller models.
    ///
    /// # Errors
    ///
    /// Returns the transport's write error, if any.
    pub async fn set_load(&mut self, on: bool) -> Result<()> {
        let value = if on { LOAD_ON } else { LOAD_OFF };
        self.io
            .write_register(LOAD_COMMAND_REGISTER, value)
            .await
            .map_err(|e| SolarBridgeError::Serial(format!("Load command write failed: {}", e)))
    }

    /// Read a block and require the exact register count
    ///
    /// A short or over-long response counts as a failed transaction.
    async fn read_exact<const N: usize>(&mut self, start: u16) -> std::result::Result<[u16; N], String> {
        let registers = self
            .io
            .read_block(start, N as u16)
            .await
            .map_err(|e| e.to_string())?;

        let len = registers.len();
        registers
            .try_into()
            .map_err(|_| format!("expected {} registers, got {}", N, len))
    }
}
