//! # Telemetry Decoder
//!
//! Decodes the 35-register data block into a live-measurement snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{centi, deci, split_bytes, to_fahrenheit, DATA_BLOCK_LEN};

/// Live measurements decoded from the data register block
///
/// Integer register values are kept as `u16` so the decode is total over the
/// full raw range; scaled values are `f32`. Power fields are always derived
/// from voltage and current, never read from a register.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    /// Battery state of charge (0-100%)
    pub battery_soc: u16,

    /// Battery voltage in volts
    pub battery_voltage: f32,

    /// Battery charging current in amps
    pub battery_current: f32,

    /// Battery charging power in watts (voltage x current)
    pub battery_power: f32,

    /// Controller temperature in Celsius (raw byte, sign bit not interpreted)
    pub controller_temperature: u8,

    /// Battery temperature in Celsius (raw byte, sign bit not interpreted)
    pub battery_temperature: u8,

    /// Controller temperature in Fahrenheit
    pub controller_temperature_f: f32,

    /// Battery temperature in Fahrenheit
    pub battery_temperature_f: f32,

    /// Load voltage in volts
    pub load_voltage: f32,

    /// Load current in amps
    pub load_current: f32,

    /// Load power in watts
    pub load_power: u16,

    /// Solar panel voltage in volts
    pub solar_panel_voltage: f32,

    /// Solar panel current in amps
    pub solar_panel_current: f32,

    /// Solar panel power in watts
    pub solar_panel_power: u16,

    /// Minimum battery voltage seen today, in volts
    pub min_battery_voltage_today: f32,

    /// Maximum battery voltage seen today, in volts
    pub max_battery_voltage_today: f32,

    /// Maximum charging current seen today, in amps
    pub max_charge_current_today: f32,

    /// Maximum discharging current seen today, in amps
    pub max_discharge_current_today: f32,

    /// Maximum charging power seen today, in watts
    pub max_charge_power_today: u16,

    /// Maximum discharging power seen today, in watts
    pub max_discharge_power_today: u16,

    /// Amp-hours charged today
    pub charge_amphours_today: u16,

    /// Amp-hours discharged today
    pub discharge_amphours_today: u16,

    /// Watt-hours charged today
    pub charge_watthours_today: u16,

    /// Watt-hours discharged today
    pub discharge_watthours_today: u16,

    /// Controller uptime in days
    pub controller_uptime_days: u16,

    /// Lifetime count of battery over-charges
    pub total_overcharges: u16,

    /// Lifetime count of battery full-charges
    pub total_fullcharges: u16,

    /// Time of the last successful decode
    pub last_update_time: Option<DateTime<Utc>>,

    /// Whether the last data-block transaction succeeded
    pub connected: bool,
}

impl TelemetrySnapshot {
    /// Apply a successfully read data register block
    ///
    /// Overwrites every mapped field, derives battery power and the
    /// Fahrenheit temperatures, and marks the snapshot connected.
    ///
    /// Register index 10 is the load command register and carries no
    /// measurement; indices 24-34 are reserved (lifetime totals, load
    /// status, fault codes) and left undecoded.
    pub fn apply(&mut self, registers: &[u16; DATA_BLOCK_LEN], now: DateTime<Utc>) {
        self.connected = true;

        self.battery_soc = registers[0];
        self.battery_voltage = deci(registers[1]);
        self.battery_current = deci(registers[2]);
        self.battery_power = self.battery_voltage * self.battery_current;

        // One register, two one-byte temperatures
        let (controller_temp, battery_temp) = split_bytes(registers[3]);
        self.controller_temperature = controller_temp;
        self.battery_temperature = battery_temp;
        self.controller_temperature_f = to_fahrenheit(controller_temp);
        self.battery_temperature_f = to_fahrenheit(battery_temp);

        self.load_voltage = deci(registers[4]);
        self.load_current = centi(registers[5]);
        self.load_power = registers[6];
        self.solar_panel_voltage = deci(registers[7]);
        self.solar_panel_current = centi(registers[8]);
        self.solar_panel_power = registers[9];

        self.min_battery_voltage_today = deci(registers[11]);
        self.max_battery_voltage_today = deci(registers[12]);
        self.max_charge_current_today = centi(registers[13]);
        self.max_discharge_current_today = deci(registers[14]);
        self.max_charge_power_today = registers[15];
        self.max_discharge_power_today = registers[16];
        self.charge_amphours_today = registers[17];
        self.discharge_amphours_today = registers[18];
        self.charge_watthours_today = registers[19];
        self.discharge_watthours_today = registers[20];
        self.controller_uptime_days = registers[21];
        self.total_overcharges = registers[22];
        self.total_fullcharges = registers[23];

        self.last_update_time = Some(now);
    }

    /// Record a failed data-block transaction
    ///
    /// Clears the connected flag and zeroes only the volatile fields. The
    /// "today" aggregates, lifetime counters, uptime and timestamp keep
    /// their last observed values so a transient read failure does not look
    /// like a counter reset. The derived Fahrenheit temperatures are not in
    /// the volatile set and also stay stale.
    pub fn mark_disconnected(&mut self) {
        self.connected = false;
        self.battery_soc = 0;
        self.battery_voltage = 0.0;
        self.battery_current = 0.0;
        self.battery_power = 0.0;
        self.controller_temperature = 0;
        self.battery_temperature = 0;
        self.solar_panel_current = 0.0;
        self.solar_panel_power = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A plausible data block: 25.6V battery at 50% charge, small load,
    /// panel producing, non-zero daily aggregates.
    fn sample_registers() -> [u16; DATA_BLOCK_LEN] {
        let mut regs = [0u16; DATA_BLOCK_LEN];
        regs[0] = 50; // 50%
        regs[1] = 256; // 25.6V
        regs[2] = 21; // 2.1A
        regs[3] = 3 * 256 + 77; // 3C controller, 77C battery
        regs[4] = 128; // 12.8V load
        regs[5] = 150; // 1.5A load
        regs[6] = 19; // 19W load
        regs[7] = 310; // 31.0V panel
        regs[8] = 180; // 1.8A panel
        regs[9] = 55; // 55W panel
        regs[10] = 1; // load command register, not decoded
        regs[11] = 250; // 25.0V min today
        regs[12] = 288; // 28.8V max today
        regs[13] = 510; // 5.1A max charge today
        regs[14] = 12; // 1.2A max discharge today
        regs[15] = 130;
        regs[16] = 15;
        regs[17] = 42;
        regs[18] = 9;
        regs[19] = 1100;
        regs[20] = 240;
        regs[21] = 365;
        regs[22] = 2;
        regs[23] = 188;
        regs
    }

    #[test]
    fn test_apply_maps_every_field() {
        let mut snapshot = TelemetrySnapshot::default();
        let now = Utc::now();
        snapshot.apply(&sample_registers(), now);

        assert!(snapshot.connected);
        assert_eq!(snapshot.battery_soc, 50);
        assert!((snapshot.battery_voltage - 25.6).abs() < 1e-4);
        assert!((snapshot.battery_current - 2.1).abs() < 1e-4);
        assert_eq!(snapshot.controller_temperature, 3);
        assert_eq!(snapshot.battery_temperature, 77);
        assert!((snapshot.load_voltage - 12.8).abs() < 1e-4);
        assert!((snapshot.load_current - 1.5).abs() < 1e-4);
        assert_eq!(snapshot.load_power, 19);
        assert!((snapshot.solar_panel_voltage - 31.0).abs() < 1e-4);
        assert!((snapshot.solar_panel_current - 1.8).abs() < 1e-4);
        assert_eq!(snapshot.solar_panel_power, 55);
        assert!((snapshot.min_battery_voltage_today - 25.0).abs() < 1e-4);
        assert!((snapshot.max_battery_voltage_today - 28.8).abs() < 1e-4);
        assert!((snapshot.max_charge_current_today - 5.1).abs() < 1e-4);
        assert!((snapshot.max_discharge_current_today - 1.2).abs() < 1e-4);
        assert_eq!(snapshot.max_charge_power_today, 130);
        assert_eq!(snapshot.max_discharge_power_today, 15);
        assert_eq!(snapshot.charge_amphours_today, 42);
        assert_eq!(snapshot.discharge_amphours_today, 9);
        assert_eq!(snapshot.charge_watthours_today, 1100);
        assert_eq!(snapshot.discharge_watthours_today, 240);
        assert_eq!(snapshot.controller_uptime_days, 365);
        assert_eq!(snapshot.total_overcharges, 2);
        assert_eq!(snapshot.total_fullcharges, 188);
        assert_eq!(snapshot.last_update_time, Some(now));
    }

    #[test]
    fn test_battery_power_is_derived() {
        let mut snapshot = TelemetrySnapshot::default();
        let mut regs = [0u16; DATA_BLOCK_LEN];
        regs[1] = 240; // 24.0V
        regs[2] = 50; // 5.0A
        snapshot.apply(&regs, Utc::now());

        assert_eq!(snapshot.battery_voltage, 24.0);
        assert_eq!(snapshot.battery_current, 5.0);
        assert_eq!(snapshot.battery_power, 120.0);
        assert_eq!(
            snapshot.battery_power,
            snapshot.battery_voltage * snapshot.battery_current
        );
    }

    #[test]
    fn test_temperature_split_and_fahrenheit() {
        let mut snapshot = TelemetrySnapshot::default();
        let mut regs = [0u16; DATA_BLOCK_LEN];
        regs[3] = 3 * 256 + 77;
        snapshot.apply(&regs, Utc::now());

        assert_eq!(snapshot.controller_temperature, 3);
        assert_eq!(snapshot.battery_temperature, 77);
        assert!((snapshot.controller_temperature_f - 37.4).abs() < 1e-3);
        assert!((snapshot.battery_temperature_f - 170.6).abs() < 1e-3);
    }

    #[test]
    fn test_temperature_split_is_total_at_extremes() {
        let mut snapshot = TelemetrySnapshot::default();
        let mut regs = [0u16; DATA_BLOCK_LEN];
        regs[3] = u16::MAX;
        snapshot.apply(&regs, Utc::now());

        assert_eq!(snapshot.controller_temperature, 255);
        assert_eq!(snapshot.battery_temperature, 255);
    }

    #[test]
    fn test_mark_disconnected_zeroes_only_volatile_fields() {
        let mut snapshot = TelemetrySnapshot::default();
        let now = Utc::now();
        snapshot.apply(&sample_registers(), now);
        let before = snapshot.clone();

        snapshot.mark_disconnected();

        // Volatile subset goes to zero
        assert!(!snapshot.connected);
        assert_eq!(snapshot.battery_soc, 0);
        assert_eq!(snapshot.battery_voltage, 0.0);
        assert_eq!(snapshot.battery_current, 0.0);
        assert_eq!(snapshot.battery_power, 0.0);
        assert_eq!(snapshot.controller_temperature, 0);
        assert_eq!(snapshot.battery_temperature, 0);
        assert_eq!(snapshot.solar_panel_current, 0.0);
        assert_eq!(snapshot.solar_panel_power, 0);

        // Everything else keeps its last observed value
        assert_eq!(snapshot.load_voltage, before.load_voltage);
        assert_eq!(snapshot.load_current, before.load_current);
        assert_eq!(snapshot.load_power, before.load_power);
        assert_eq!(snapshot.solar_panel_voltage, before.solar_panel_voltage);
        assert_eq!(
            snapshot.min_battery_voltage_today,
            before.min_battery_voltage_today
        );
        assert_eq!(
            snapshot.max_battery_voltage_today,
            before.max_battery_voltage_today
        );
        assert_eq!(snapshot.charge_amphours_today, before.charge_amphours_today);
        assert_eq!(
            snapshot.discharge_amphours_today,
            before.discharge_amphours_today
        );
        assert_eq!(snapshot.charge_watthours_today, before.charge_watthours_today);
        assert_eq!(
            snapshot.discharge_watthours_today,
            before.discharge_watthours_today
        );
        assert_eq!(snapshot.controller_uptime_days, before.controller_uptime_days);
        assert_eq!(snapshot.total_overcharges, before.total_overcharges);
        assert_eq!(snapshot.total_fullcharges, before.total_fullcharges);
        assert_eq!(snapshot.last_update_time, Some(now));

        // Derived Fahrenheit values are not in the volatile set
        assert_eq!(
            snapshot.controller_temperature_f,
            before.controller_temperature_f
        );
        assert_eq!(snapshot.battery_temperature_f, before.battery_temperature_f);
    }

    #[test]
    fn test_default_snapshot_is_disconnected_and_zeroed() {
        let snapshot = TelemetrySnapshot::default();
        assert!(!snapshot.connected);
        assert_eq!(snapshot.battery_soc, 0);
        assert_eq!(snapshot.last_update_time, None);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let mut snapshot = TelemetrySnapshot::default();
        snapshot.apply(&sample_registers(), Utc::now());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["battery_soc"], 50);
        assert_eq!(json["connected"], true);
    }
}
