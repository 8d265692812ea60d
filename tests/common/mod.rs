//! Shared calibration sets for the integration tests.

#![allow(dead_code)]

use rpbmp390::{calib, CalibrationCoefficients, CalibrationNvm};

/// Bench sensor whose pressure output falls as raw pressure rises.
pub fn reference_calib() -> CalibrationCoefficients {
    calib::parse(&calib::REFERENCE_NVM).unwrap()
}

/// Same temperature trim as the reference sensor, with a pressure trim that
/// rises with raw ADC across the whole 24-bit range.
pub fn rising_pressure_calib() -> CalibrationCoefficients {
    CalibrationNvm {
        t1: 26827,
        t2: 26216,
        t3: 3,
        p1: 26000,
        p2: 16000,
        p3: 7,
        p4: 5,
        p5: 1000,
        p6: 640,
        p7: 15,
        p8: -2,
        p9: 100,
        p10: -32,
        p11: -21,
    }
    .quantize()
}

pub fn assert_rel_eq(actual: f64, expected: f64, rel: f64) {
    let err = ((actual - expected) / expected).abs();
    assert!(
        err < rel,
        "expected {} got {} (relative error {})",
        expected,
        actual,
        err
    );
}
