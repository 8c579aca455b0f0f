//! # Identity Decoder
//!
//! Decodes the 17-register info block into controller identity and rating
//! fields.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{digit_pair, split_bytes, INFO_BLOCK_LEN};

/// Controller identity and rating fields decoded from the info block
///
/// Mostly static; a failed info transaction leaves the previous values in
/// place rather than zeroing data that rarely changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdentitySnapshot {
    /// Rated system voltage in volts
    pub rated_voltage: u8,

    /// Rated charge current in amps
    pub rated_current: u8,

    /// Rated wattage (rated voltage x rated current)
    pub rated_wattage: f32,

    /// Rated discharge current in amps
    pub rated_discharge_current: u8,

    /// Discharge type code
    pub discharge_type: u8,

    /// Product model string, spaces stripped
    pub product_model: String,

    /// Software version as concatenated decimal digit strings
    pub software_version: String,

    /// Hardware version as concatenated decimal digit strings
    pub hardware_version: String,

    /// Serial number as concatenated decimal digit strings
    ///
    /// Known not to match the serial printed on the unit; preserved as the
    /// protocol reports it.
    pub serial_number: String,

    /// Device modbus station address
    pub modbus_address: u16,

    /// Time of the last successful decode
    pub last_update_time: Option<DateTime<Utc>>,
}

impl IdentitySnapshot {
    /// Apply a successfully read info register block
    ///
    /// Overwrites every field and stamps the update time. `separator` is
    /// inserted between the two halves of the version and serial strings;
    /// the wire-compatible form is the empty string.
    pub fn apply(
        &mut self,
        registers: &[u16; INFO_BLOCK_LEN],
        separator: &str,
        now: DateTime<Utc>,
    ) {
        // High/low byte order of this split is unverified; some units report
        // a voltage rating of 0 with a correct current rating.
        let (rated_voltage, rated_current) = split_bytes(registers[0]);
        self.rated_voltage = rated_voltage;
        self.rated_current = rated_current;
        self.rated_wattage = rated_voltage as f32 * rated_current as f32;

        let (rated_discharge_current, discharge_type) = split_bytes(registers[1]);
        self.rated_discharge_current = rated_discharge_current;
        self.discharge_type = discharge_type;

        self.product_model = decode_model_string(&registers[2..10]);

        self.software_version = digit_pair(registers[10], registers[11], separator);
        self.hardware_version = digit_pair(registers[12], registers[13], separator);
        self.serial_number = digit_pair(registers[14], registers[15], separator);

        self.modbus_address = registers[16];
        self.last_update_time = Some(now);
    }
}

/// Decode the product model registers into a string
///
/// Each register carries two ASCII bytes. NUL padding is dropped and
/// embedded spaces are stripped.
fn decode_model_string(registers: &[u16]) -> String {
    let mut model = String::with_capacity(registers.len() * 2);
    for &register in registers {
        for byte in register.to_be_bytes() {
            if byte != 0 && byte != b' ' {
                model.push(byte as char);
            }
        }
    }
    model
}
