use crate::error::{Error, Result};

/// Quantized calibration coefficients used by the compensation polynomial.
///
/// Built once per sensor from the NVM block (see [`crate::calib::parse`]) and
/// only ever read afterwards, so one value can be shared by any number of
/// concurrent compensation or inversion calls.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationCoefficients {
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
    pub p1: f64,
    pub p2: f64,
    pub p3: f64,
    pub p4: f64,
    pub p5: f64,
    pub p6: f64,
    pub p7: f64,
    pub p8: f64,
    pub p9: f64,
    pub p10: f64,
    pub p11: f64,
}

/// Intermediate produced by temperature compensation and consumed by
/// pressure compensation.
///
/// Only meaningful together with the calibration set that produced it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LinearizedTemperature(pub f64);

impl LinearizedTemperature {
    /// The linearized temperature in °C.
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Raw ADC pair as read from DATA_0..DATA_5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawReading {
    pub temperature: u32,
    pub pressure: u32,
}

/// Temperature in °C and pressure in Pa after compensation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompensatedReading {
    pub temperature_c: f64,
    pub pressure_pa: f64,
}

impl CompensatedReading {
    /// Temperature in °F.
    pub fn temperature_f(&self) -> f64 {
        self.temperature_c * 1.8 + 32.0
    }

    /// Pressure in hPa.
    pub fn pressure_hpa(&self) -> f64 {
        self.pressure_pa / 100.0
    }
}

/// Inclusive ADC range searched by the inversion engine.
///
/// Always satisfies `low <= high`; build it through [`SearchBounds::new`],
/// [`SearchBounds::for_bits`] or [`SearchBounds::ADC_24_BIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBounds {
    low: u32,
    high: u32,
}

impl SearchBounds {
    pub const ADC_24_BIT: SearchBounds = SearchBounds {
        low: 0,
        high: 16_777_215,
    };

    pub fn new(low: u32, high: u32) -> Result<Self> {
        if low > high {
            return Err(Error::InvalidConfig("search bounds low exceeds high"));
        }
        Ok(SearchBounds { low, high })
    }

    /// Full range of a `bits`-wide ADC, `[0, 2^bits - 1]`.
    pub fn for_bits(bits: u8) -> Result<Self> {
        match bits {
            1..=31 => Ok(SearchBounds {
                low: 0,
                high: (1u32 << bits) - 1,
            }),
            32 => Ok(SearchBounds {
                low: 0,
                high: u32::MAX,
            }),
            _ => Err(Error::InvalidConfig("ADC width must be 1 to 32 bits")),
        }
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn contains(&self, value: u32) -> bool {
        self.low <= value && value <= self.high
    }
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self::ADC_24_BIT
    }
}

/// Tunables for [`crate::invert`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InversionConfig {
    /// Early-exit threshold for temperature, in °C.
    pub temperature_tolerance: f64,
    /// Early-exit threshold for pressure, in Pa.
    pub pressure_tolerance: f64,
    pub bounds: SearchBounds,
}

impl InversionConfig {
    pub fn new(
        temperature_tolerance: f64,
        pressure_tolerance: f64,
        bounds: SearchBounds,
    ) -> Result<Self> {
        for tolerance in [temperature_tolerance, pressure_tolerance] {
            if !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(Error::InvalidConfig("tolerance must be finite and positive"));
            }
        }
        Ok(InversionConfig {
            temperature_tolerance,
            pressure_tolerance,
            bounds,
        })
    }
}

impl Default for InversionConfig {
    fn default() -> Self {
        InversionConfig {
            temperature_tolerance: 0.01,
            pressure_tolerance: 10.0,
            bounds: SearchBounds::ADC_24_BIT,
        }
    }
}

/// Forward re-evaluation of one inverted channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verification {
    pub target: f64,
    pub achieved: f64,
    pub absolute_error: f64,
}

impl Verification {
    /// Records `achieved` against `target` and their absolute difference.
    pub fn new(target: f64, achieved: f64) -> Self {
        Verification {
            target,
            achieved,
            absolute_error: (achieved - target).abs(),
        }
    }

    /// True when the residual is strictly below `tolerance`.
    pub fn within(&self, tolerance: f64) -> bool {
        self.absolute_error < tolerance
    }
}

/// Raw ADC pair recovered for one target, with both channels re-verified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InversionReport {
    pub raw: RawReading,
    pub temperature: Verification,
    pub pressure: Verification,
}
