//! IR proximity sensor calibration.

const VOLTAGE_DIVIDER_R1: f64 = 1000.0;
const VOLTAGE_DIVIDER_R2: f64 = 1000.0;

// Empirical cubic fit, highest order first.
const C3: f64 = -5.8454;
const C2: f64 = 36.3658;
const C1: f64 = -74.3506;
const C0: f64 = 56.4574;

/// Convert a measured IR voltage to a distance estimate.
///
/// The measured voltage is scaled back up through the voltage divider before
/// the calibration polynomial is applied. Any input is accepted.
pub fn ir_voltage_to_distance(voltage: f32) -> f64 {
    let sensor_voltage =
        (VOLTAGE_DIVIDER_R1 + VOLTAGE_DIVIDER_R2) / VOLTAGE_DIVIDER_R2 * f64::from(voltage);
    C3 * sensor_voltage.powi(3) + C2 * sensor_voltage.powi(2) + C1 * sensor_voltage + C0
}
