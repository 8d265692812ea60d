//! Fixed outputs for the reference calibration block.

mod common;

use common::{assert_rel_eq, reference_calib};
use rpbmp390::{calib, compensate, compensate_temperature, RawReading};

#[test]
fn test_parse_reference_coefficients() {
    let calib = calib::parse(&calib::REFERENCE_NVM).unwrap();

    assert_eq!(calib.t1, 6_867_712.0);
    assert_rel_eq(calib.t1, 6_868_736.0, 1e-3);
    assert_eq!(calib.t2, 26216.0 / 1073741824.0);
    assert_eq!(calib.t3, 3.0 / 281474976710656.0);
    assert_eq!(calib.p1, (-16663.0 - 16384.0) / 1048576.0);
    assert_eq!(calib.p2, (-10895.0 - 16384.0) / 536870912.0);
    assert_eq!(calib.p5, 327_672.0);
    assert_eq!(calib.p6, 639.984375);
    assert_eq!(calib.p7, 0.05859375);
    assert_eq!(calib.p8, -6.103515625e-05);
    assert_eq!(calib.p11, -21.0 / 36893488147419103232.0);
    assert!(
        calib.p11.abs() > 1e-19 && calib.p11.abs() < 1e-17,
        "p11 out of expected magnitude: {}",
        calib.p11
    );
}

#[test]
fn test_mid_scale_reading() {
    let calib = reference_calib();
    let reading = compensate(
        RawReading {
            temperature: 8_388_608,
            pressure: 8_388_608,
        },
        &calib,
    );

    assert_rel_eq(reading.temperature_c, 37.15816992032342, 1e-9);
    assert_rel_eq(reading.pressure_pa, 68669.59847672377, 1e-9);
    // six significant figures
    assert_eq!(format!("{:.4}", reading.temperature_c), "37.1582");
    assert_eq!(format!("{:.1}", reading.pressure_pa), "68669.6");
}

#[test]
fn test_warmer_lower_pressure_reading() {
    let calib = reference_calib();
    let reading = compensate(
        RawReading {
            temperature: 8_450_000,
            pressure: 8_200_000,
        },
        &calib,
    );

    assert_rel_eq(reading.temperature_c, 38.6591200161447, 1e-9);
    assert_rel_eq(reading.pressure_pa, 75429.00303899343, 1e-9);
}

#[test]
fn test_temperature_span_of_24_bit_range() {
    let calib = reference_calib();
    let (cold, _) = compensate_temperature(0, &calib);
    let (hot, _) = compensate_temperature(16_777_215, &calib);

    assert_rel_eq(cold, -167.17628747713752, 1e-9);
    assert_rel_eq(hot, 242.99260269099796, 1e-9);
}

#[test]
fn test_compensation_is_deterministic() {
    let calib = reference_calib();
    let raw = RawReading {
        temperature: 7_654_321,
        pressure: 9_876_543,
    };
    let first = compensate(raw, &calib);
    let second = compensate(raw, &calib);

    assert_eq!(first.temperature_c.to_bits(), second.temperature_c.to_bits());
    assert_eq!(first.pressure_pa.to_bits(), second.pressure_pa.to_bits());
}
