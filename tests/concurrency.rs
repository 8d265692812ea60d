//! Shared calibration sets across threads.

mod common;

use std::thread;

use common::{reference_calib, rising_pressure_calib};
use rpbmp390::{compensate, invert_reading, InversionConfig, RawReading};

#[test]
fn test_parallel_sessions_do_not_interfere() {
    let reference = reference_calib();
    let rising = rising_pressure_calib();
    let config = InversionConfig::default();
    let raw = RawReading {
        temperature: 8_388_608,
        pressure: 8_388_608,
    };

    let expected = [compensate(raw, &reference), compensate(raw, &rising)];
    let expected_report = invert_reading(21.5, 99_000.0, &rising, &config);

    thread::scope(|s| {
        let sessions = [&reference, &rising];
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let calib = sessions[i % 2];
                s.spawn(move || {
                    let mut last = compensate(raw, calib);
                    for _ in 0..1000 {
                        last = compensate(raw, calib);
                    }
                    (i % 2, last)
                })
            })
            .collect();
        let inverter = s.spawn(|| invert_reading(21.5, 99_000.0, &rising, &config));

        for handle in handles {
            let (session, reading) = handle.join().unwrap();
            assert_eq!(reading, expected[session]);
        }
        assert_eq!(inverter.join().unwrap(), expected_report);
    });
}
