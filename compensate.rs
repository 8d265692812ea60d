//! Forward compensation: raw ADC values to °C and Pa.

use crate::error::{Error, Result};
use crate::structs::{
    CalibrationCoefficients, CompensatedReading, LinearizedTemperature, RawReading,
};

pub const SEA_LEVEL_PRESSURE: f64 = 101325.0; // Pa
const FEET_PER_METER: f64 = 3.28084;

/// Returns the temperature in °C together with the linearized temperature
/// the pressure formula needs.
///
/// With pre-quantized coefficients the linearized value is already in °C.
/// Any `u32` is accepted; out-of-range input yields a non-physical result.
pub fn compensate_temperature(
    raw_temp: u32,
    calib: &CalibrationCoefficients,
) -> (f64, LinearizedTemperature) {
    let d1 = f64::from(raw_temp) - calib.t1;
    let d2 = d1 * calib.t2;
    let t_lin = d2 + d1 * d1 * calib.t3;
    (t_lin, LinearizedTemperature(t_lin))
}

/// Compensated pressure in Pa.
///
/// `t_lin` must come from [`compensate_temperature`] on the same
/// calibration set. A stale or foreign value is not detected and silently
/// skews the result.
pub fn compensate_pressure(
    raw_press: u32,
    calib: &CalibrationCoefficients,
    t_lin: LinearizedTemperature,
) -> f64 {
    let t = t_lin.value();
    let t2 = t * t;
    let t3 = t2 * t;
    let p = f64::from(raw_press);
    let p2 = p * p;
    let p3 = p2 * p;

    let out1 = calib.p5 + calib.p6 * t + calib.p7 * t2 + calib.p8 * t3;
    let out2 = p * (calib.p1 + calib.p2 * t + calib.p3 * t2 + calib.p4 * t3);
    let out3 = p2 * (calib.p9 + calib.p10 * t) + p3 * calib.p11;

    out1 + out2 + out3
}

pub fn compensate(raw: RawReading, calib: &CalibrationCoefficients) -> CompensatedReading {
    let (temperature_c, t_lin) = compensate_temperature(raw.temperature, calib);
    let pressure_pa = compensate_pressure(raw.pressure, calib, t_lin);
    CompensatedReading {
        temperature_c,
        pressure_pa,
    }
}

/// International barometric formula against standard sea-level pressure.
///
/// NaN for non-positive pressure; use [`altitude`] at API boundaries.
pub fn altitude_from_pressure(pressure_pa: f64) -> f64 {
    44330.0 * (1.0 - (pressure_pa / SEA_LEVEL_PRESSURE).powf(0.1903))
}

pub fn altitude(pressure_pa: f64) -> Result<f64> {
    if !pressure_pa.is_finite() || pressure_pa <= 0.0 {
        return Err(Error::InvalidDomain(pressure_pa));
    }
    Ok(altitude_from_pressure(pressure_pa))
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}
