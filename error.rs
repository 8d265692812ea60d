use std::fmt;

/// Errors raised at the edges of the compensation engine.
///
/// The polynomial math and the bisection never fail; these variants cover
/// malformed input, out-of-domain derived quantities, configuration and the
/// I2C transport.
#[derive(Debug)]
pub enum Error {
    /// Fewer than 21 calibration bytes were supplied (contains the actual length)
    MalformedCalibration { len: usize },
    /// Pressure must be positive and finite to derive altitude
    InvalidDomain(f64),
    /// Invalid configuration parameter
    InvalidConfig(&'static str),
    /// Unexpected `CHIP_ID` value (contains the value read)
    InvalidDevice(u8),
    /// Communication error with the device
    Bus(rppal::i2c::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedCalibration { len } => {
                write!(f, "calibration block needs 21 bytes, got {}", len)
            }
            Error::InvalidDomain(pressure) => {
                write!(f, "pressure {} Pa is outside the altitude domain", pressure)
            }
            Error::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
            Error::InvalidDevice(id) => write!(f, "unexpected chip id 0x{:02X}", id),
            Error::Bus(err) => write!(f, "i2c error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Bus(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rppal::i2c::Error> for Error {
    fn from(error: rppal::i2c::Error) -> Self {
        Error::Bus(error)
    }
}
