//! BMP390 calibration block decoding and quantization.
//!
//! The NVM block lives at registers 0x31..0x45 (21 bytes, little endian).
//! Each sub-word is turned into a floating-point coefficient by dividing by
//! a power of two that encodes its fixed-point exponent; `p1` and `p2` are
//! also offset by 16384 first.

use log::debug;

use crate::error::{Error, Result};
use crate::structs::CalibrationCoefficients;

pub const CALIB_LEN: usize = 21;

const T1_DIV: f64 = 0.00390625; // 2^-8
const T2_DIV: f64 = 1073741824.0; // 2^30
const T3_DIV: f64 = 281474976710656.0; // 2^48
const P1_DIV: f64 = 1048576.0; // 2^20
const P2_DIV: f64 = 536870912.0; // 2^29
const P3_DIV: f64 = 4294967296.0; // 2^32
const P4_DIV: f64 = 137438953472.0; // 2^37
const P5_DIV: f64 = 0.125; // 2^-3
const P6_DIV: f64 = 64.0; // 2^6
const P7_DIV: f64 = 256.0; // 2^8
const P8_DIV: f64 = 32768.0; // 2^15
const P9_DIV: f64 = 281474976710656.0; // 2^48
const P10_DIV: f64 = 281474976710656.0; // 2^48
const P11_DIV: f64 = 36893488147419103232.0; // 2^65
const P_OFFSET: f64 = 16384.0;

/// NVM block of a BMP390 sampled on the bench; used as the default set.
pub const REFERENCE_NVM: [u8; CALIB_LEN] = [
    0xCB, 0x68, 0x68, 0x66, 0x03, 0xE9, 0xBE, 0x71, 0xD5, 0x07, 0x05, 0xFF, 0x9F, 0xFF, 0x9F, 0x0F,
    0xFE, 0x00, 0xE0, 0xE0, 0xEB,
];

/// Raw calibration sub-words as stored in NVM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibrationNvm {
    pub t1: u16,
    pub t2: u16,
    pub t3: i8,
    pub p1: i16,
    pub p2: i16,
    pub p3: i8,
    pub p4: i8,
    pub p5: u16,
    pub p6: u16,
    pub p7: i8,
    pub p8: i8,
    pub p9: i16,
    pub p10: i8,
    pub p11: i8,
}

impl CalibrationNvm {
    /// Splits the NVM block into its sub-words. Bytes past the 21st are ignored.
    pub fn decode(b: &[u8]) -> Result<Self> {
        if b.len() < CALIB_LEN {
            return Err(Error::MalformedCalibration { len: b.len() });
        }
        Ok(CalibrationNvm {
            t1: u16::from_le_bytes([b[0], b[1]]),
            t2: u16::from_le_bytes([b[2], b[3]]),
            t3: b[4] as i8,
            p1: i16::from_le_bytes([b[5], b[6]]),
            p2: i16::from_le_bytes([b[7], b[8]]),
            p3: b[9] as i8,
            p4: b[10] as i8,
            p5: u16::from_le_bytes([b[11], b[12]]),
            p6: u16::from_le_bytes([b[13], b[14]]),
            p7: b[15] as i8,
            p8: b[16] as i8,
            p9: i16::from_le_bytes([b[17], b[18]]),
            p10: b[19] as i8,
            p11: b[20] as i8,
        })
    }

    pub fn quantize(&self) -> CalibrationCoefficients {
        CalibrationCoefficients {
            t1: f64::from(self.t1) / T1_DIV,
            t2: f64::from(self.t2) / T2_DIV,
            t3: f64::from(self.t3) / T3_DIV,
            p1: (f64::from(self.p1) - P_OFFSET) / P1_DIV,
            p2: (f64::from(self.p2) - P_OFFSET) / P2_DIV,
            p3: f64::from(self.p3) / P3_DIV,
            p4: f64::from(self.p4) / P4_DIV,
            p5: f64::from(self.p5) / P5_DIV,
            p6: f64::from(self.p6) / P6_DIV,
            p7: f64::from(self.p7) / P7_DIV,
            p8: f64::from(self.p8) / P8_DIV,
            p9: f64::from(self.p9) / P9_DIV,
            p10: f64::from(self.p10) / P10_DIV,
            p11: f64::from(self.p11) / P11_DIV,
        }
    }
}

/// Decodes and quantizes a raw calibration block in one step.
pub fn parse(raw: &[u8]) -> Result<CalibrationCoefficients> {
    let nvm = CalibrationNvm::decode(raw)?;
    let calib = nvm.quantize();
    debug!("calibration nvm {:?} -> {:?}", nvm, calib);
    Ok(calib)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reference_block() {
        let nvm = CalibrationNvm::decode(&REFERENCE_NVM).unwrap();

        assert_eq!(nvm.t1, 26827);
        assert_eq!(nvm.t2, 26216);
        assert_eq!(nvm.t3, 3);
        assert_eq!(nvm.p1, -16663);
        assert_eq!(nvm.p2, -10895);
        assert_eq!(nvm.p3, 7);
        assert_eq!(nvm.p4, 5);
        assert_eq!(nvm.p5, 40959);
        assert_eq!(nvm.p6, 40959);
        assert_eq!(nvm.p7, 15);
        assert_eq!(nvm.p8, -2);
        assert_eq!(nvm.p9, -8192);
        assert_eq!(nvm.p10, -32);
        assert_eq!(nvm.p11, -21);
    }

    #[test]
    fn short_block_is_rejected() {
        match parse(&REFERENCE_NVM[..20]) {
            Err(Error::MalformedCalibration { len }) => assert_eq!(len, 20),
            other => panic!("expected MalformedCalibration, got {:?}", other),
        }
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut long = REFERENCE_NVM.to_vec();
        long.extend_from_slice(&[0xAA, 0x55]);
        assert_eq!(parse(&long).unwrap(), parse(&REFERENCE_NVM).unwrap());
    }

    #[test]
    fn quantize_offsets_p1_p2() {
        let nvm = CalibrationNvm {
            p1: 16384,
            p2: 16384,
            ..Default::default()
        };
        let calib = nvm.quantize();
        assert_eq!(calib.p1, 0.0);
        assert_eq!(calib.p2, 0.0);
    }

    #[test]
    fn quantize_extreme_subwords() {
        let nvm = CalibrationNvm {
            t1: u16::MAX,
            p11: i8::MIN,
            p9: i16::MIN,
            ..Default::default()
        };
        let calib = nvm.quantize();
        assert_eq!(calib.t1, 65535.0 * 256.0);
        assert_eq!(calib.p11, -128.0 / 2f64.powi(65));
        assert_eq!(calib.p9, -32768.0 / 2f64.powi(48));
    }
}
