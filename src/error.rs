//! # Error Types
//!
//! Custom error types for Solar Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for Solar Bridge
#[derive(Debug, Error)]
pub enum SolarBridgeError {
    /// Data register block transaction failed
    #[error("data register read failed: {0}")]
    DataReadFailed(String),

    /// Info register block transaction failed
    #[error("info register read failed: {0}")]
    InfoReadFailed(String),

    /// Serial port errors
    #[error("serial port error: {0}")]
    Serial(String),

    /// No usable serial device found
    #[error("no serial port found (tried: {0})")]
    SerialPortNotFound(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Solar Bridge
pub type Result<T> = std::result::Result<T, SolarBridgeError>;
