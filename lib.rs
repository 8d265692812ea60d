//! BMP390 pressure/temperature compensation and its numeric inverse.
//!
//! Raw NVM bytes are quantized into [`CalibrationCoefficients`]; the
//! forward engine turns raw ADC values into °C and Pa, and the inversion
//! engine bisects over the forward engine to recover raw ADC values for a
//! desired reading.

pub mod calib;
pub mod compensate;
pub mod error;
pub mod invert;
pub mod sensor;
pub mod structs;

pub use calib::{parse, CalibrationNvm, CALIB_LEN, REFERENCE_NVM};
pub use compensate::{
    altitude, altitude_from_pressure, compensate, compensate_pressure, compensate_temperature,
};
pub use error::{Error, Result};
pub use invert::{invert, invert_pressure, invert_reading, invert_readings, invert_temperature};
pub use structs::{
    CalibrationCoefficients, CompensatedReading, InversionConfig, InversionReport,
    LinearizedTemperature, RawReading, SearchBounds, Verification,
};
