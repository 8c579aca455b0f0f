//! # Register Protocol Constants and Helpers
//!
//! Register map of the charge controller and the shared scaling helpers used
//! by both decoders.

pub mod identity;
pub mod telemetry;

pub use identity::IdentitySnapshot;
pub use telemetry::TelemetrySnapshot;

/// Start address of the live-measurement ("data") register block
pub const DATA_BLOCK_START: u16 = 0x100;

/// Number of data registers per read
///
/// All known controllers expose 35 data registers; the trailing ones
/// (indices 24-34: lifetime totals, load status, fault codes) are reserved
/// and not decoded in this version.
pub const DATA_BLOCK_LEN: usize = 35;

/// Start address of the identity/rating ("info") register block
pub const INFO_BLOCK_START: u16 = 0x00A;

/// Number of info registers per read
pub const INFO_BLOCK_LEN: usize = 17;

/// Load on/off command register (write-only here; unsupported on some models)
pub const LOAD_COMMAND_REGISTER: u16 = 0x10A;

/// Register value to switch the load output on
pub const LOAD_ON: u16 = 1;

/// Register value to switch the load output off
pub const LOAD_OFF: u16 = 0;

/// Scale a raw register value by 0.1 (deci units: volts, amps)
pub fn deci(raw: u16) -> f32 {
    raw as f32 * 0.1
}

/// Scale a raw register value by 0.01 (centi units: amps)
pub fn centi(raw: u16) -> f32 {
    raw as f32 * 0.01
}

/// Split a register into its high and low bytes
///
/// Several registers pack two one-byte sub-fields into a single 16-bit value
/// (temperatures, ratings). Both halves are in [0, 255] for any input.
pub fn split_bytes(raw: u16) -> (u8, u8) {
    ((raw / 256) as u8, (raw % 256) as u8)
}

/// Convert a Celsius byte to Fahrenheit
pub fn to_fahrenheit(celsius: u8) -> f32 {
    celsius as f32 * 1.8 + 32.0
}

/// Concatenate two register values as decimal digit strings
///
/// Version and serial fields span two registers; the device documentation
/// gives no delimiter between the halves, so the default separator is the
/// empty string. Passing a non-empty separator is an explicit deviation from
/// the wire-compatible form.
pub fn digit_pair(high: u16, low: u16, separator: &str) -> String {
    format!("{}{}{}", high, separator, low)
}
