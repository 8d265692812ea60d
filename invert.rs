//! Approximate inverse of the compensation formulas.
//!
//! The forward polynomials have no closed-form inverse, so a raw ADC value
//! for a desired reading is found by integer bisection with the forward
//! engine as oracle. The search assumes the forward function is
//! non-decreasing over the bounds. That holds for temperature with typical
//! calibration, but pressure may decrease with raw ADC (negative `p1`) or
//! bend near an inflection of its cubic terms; the search then still stops
//! within ⌈log2(high - low)⌉ steps but ends up near a bracket edge instead
//! of the root. Always re-check the result with [`verify_temperature`] /
//! [`verify_pressure`], or use [`invert_reading`] which does so.

use log::{debug, warn};

use crate::compensate::{compensate_pressure, compensate_temperature};
use crate::structs::{
    CalibrationCoefficients, InversionConfig, InversionReport, LinearizedTemperature, RawReading,
    SearchBounds, Verification,
};

/// Bisects `bounds` for an input whose `forward` value lies within
/// `tolerance` of `target`.
///
/// Returns the first midpoint within tolerance, otherwise the last midpoint once
/// the bracket has narrowed to two neighbours. A bracket that is already
/// that narrow returns `bounds.low()` without evaluating `forward`. The result always
/// lies inside `bounds`.
pub fn invert<F>(target: f64, bounds: SearchBounds, tolerance: f64, forward: F) -> u32
where
    F: Fn(u32) -> f64,
{
    let mut low = bounds.low();
    let mut high = bounds.high();
    let mut mid = low;
    let mut steps = 0u32;

    while high - low > 1 {
        mid = low + (high - low) / 2;
        let value = forward(mid);
        steps += 1;

        if (value - target).abs() < tolerance {
            debug!("bisection hit {} -> {} after {} steps", mid, value, steps);
            return mid;
        }

        if value < target {
            low = mid;
        } else {
            high = mid;
        }
    }

    debug!(
        "bisection narrowed to [{}, {}] after {} steps, returning {}",
        low, high, steps, mid
    );
    mid
}

pub fn invert_temperature(
    target_c: f64,
    calib: &CalibrationCoefficients,
    config: &InversionConfig,
) -> u32 {
    invert(target_c, config.bounds, config.temperature_tolerance, |raw| {
        compensate_temperature(raw, calib).0
    })
}

/// `t_lin` is held fixed for the whole search.
pub fn invert_pressure(
    target_pa: f64,
    calib: &CalibrationCoefficients,
    t_lin: LinearizedTemperature,
    config: &InversionConfig,
) -> u32 {
    invert(target_pa, config.bounds, config.pressure_tolerance, |raw| {
        compensate_pressure(raw, calib, t_lin)
    })
}

pub fn verify_temperature(
    raw_temp: u32,
    target_c: f64,
    calib: &CalibrationCoefficients,
) -> Verification {
    Verification::new(target_c, compensate_temperature(raw_temp, calib).0)
}

pub fn verify_pressure(
    raw_press: u32,
    target_pa: f64,
    calib: &CalibrationCoefficients,
    t_lin: LinearizedTemperature,
) -> Verification {
    Verification::new(target_pa, compensate_pressure(raw_press, calib, t_lin))
}

/// Recovers a raw ADC pair for the given temperature and pressure.
///
/// Pressure is searched under the linearized temperature of the recovered
/// raw temperature, not of the target, so the pair replays consistently
/// through [`crate::compensate::compensate`].
pub fn invert_reading(
    target_c: f64,
    target_pa: f64,
    calib: &CalibrationCoefficients,
    config: &InversionConfig,
) -> InversionReport {
    let raw_temp = invert_temperature(target_c, calib, config);
    let (_, t_lin) = compensate_temperature(raw_temp, calib);
    let raw_press = invert_pressure(target_pa, calib, t_lin, config);

    let temperature = verify_temperature(raw_temp, target_c, calib);
    let pressure = verify_pressure(raw_press, target_pa, calib, t_lin);

    if !temperature.within(config.temperature_tolerance) {
        warn!(
            "temperature {} °C not reached, best raw {} gives {} °C",
            target_c, raw_temp, temperature.achieved
        );
    }
    if !pressure.within(config.pressure_tolerance) {
        warn!(
            "pressure {} Pa not reached, best raw {} gives {} Pa",
            target_pa, raw_press, pressure.achieved
        );
    }

    InversionReport {
        raw: RawReading {
            temperature: raw_temp,
            pressure: raw_press,
        },
        temperature,
        pressure,
    }
}

/// Runs [`invert_reading`] for each `(°C, Pa)` target, in order.
pub fn invert_readings(
    targets: &[(f64, f64)],
    calib: &CalibrationCoefficients,
    config: &InversionConfig,
) -> Vec<InversionReport> {
    let reports: Vec<InversionReport> = targets
        .iter()
        .map(|&(target_c, target_pa)| invert_reading(target_c, target_pa, calib, config))
        .collect();

    let reached = reports
        .iter()
        .filter(|r| {
            r.temperature.within(config.temperature_tolerance)
                && r.pressure.within(config.pressure_tolerance)
        })
        .count();
    debug!("reverse calculated {} targets, {} within tolerance", reports.len(), reached);
    reports
}
