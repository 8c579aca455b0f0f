//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub protocol: ProtocolConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    /// Device path; empty means auto-detect over common paths
    #[serde(default)]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Modbus station address the controller answers on
    #[serde(default = "default_modbus_address")]
    pub modbus_address: u8,
}

/// Polling intervals
#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    /// Interval between data-block reads in milliseconds
    #[serde(default = "default_data_interval_ms")]
    pub data_interval_ms: u64,

    /// Interval between info-block reads in milliseconds
    #[serde(default = "default_info_interval_ms")]
    pub info_interval_ms: u64,
}

/// Protocol decoding options
#[derive(Debug, Deserialize, Clone)]
pub struct ProtocolConfig {
    /// Separator inserted between the two halves of version and serial
    /// strings. The empty default reproduces the device's documented
    /// no-delimiter encoding; setting it is an explicit deviation.
    #[serde(default)]
    pub version_separator: String,
}

/// Output options
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Print a JSON snapshot line after each successful data poll
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_baud_rate() -> u32 { 9600 }
fn default_modbus_address() -> u8 { 255 }

fn default_data_interval_ms() -> u64 { 2000 }
fn default_info_interval_ms() -> u64 { 60000 }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: default_baud_rate(),
            modbus_address: default_modbus_address(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            data_interval_ms: default_data_interval_ms(),
            info_interval_ms: default_info_interval_ms(),
        }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            version_separator: String::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { json: false }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        // Controllers speak 9600 8N1; the slower rates exist on older units
        if ![2400, 4800, 9600, 19200].contains(&self.serial.baud_rate) {
            return Err(crate::error::SolarBridgeError::Config(
                toml::de::Error::custom("baud_rate must be one of: 2400, 4800, 9600, 19200"),
            ));
        }

        if self.polling.data_interval_ms < 500 || self.polling.data_interval_ms > 3_600_000 {
            return Err(crate::error::SolarBridgeError::Config(
                toml::de::Error::custom("data_interval_ms must be between 500 and 3600000"),
            ));
        }

        if self.polling.info_interval_ms < 500 || self.polling.info_interval_ms > 86_400_000 {
            return Err(crate::error::SolarBridgeError::Config(
                toml::de::Error::custom("info_interval_ms must be between 500 and 86400000"),
            ));
        }

        if self.protocol.version_separator.len() > 4 {
            return Err(crate::error::SolarBridgeError::Config(
                toml::de::Error::custom("version_separator must be at most 4 characters"),
            ));
        }

        Ok(())
    }
}
