//! Blocking I2C access to a BMP390 on the Raspberry Pi bus.
//!
//! Only supplies the raw calibration block and raw ADC pair; everything
//! numeric happens in [`crate::calib`] and [`crate::compensate`].

use std::thread;
use std::time::Duration;

use log::{debug, info};
use rppal::i2c::I2c;

use crate::calib::{self, CALIB_LEN};
use crate::error::{Error, Result};
use crate::structs::{CalibrationCoefficients, RawReading};

// BMP390 I2C slave addresses (SDO high / low).
pub const ADDR_BMP390: u16 = 0x77;
pub const ADDR_BMP390_ALT: u16 = 0x76;

// BMP3xx register addresses.
const REG_CHIP_ID: u8 = 0x00;
const REG_DATA: u8 = 0x04;
const REG_DATA_LEN: usize = 6;
const REG_PWR_CTRL: u8 = 0x1B;
const REG_OSR: u8 = 0x1C;
const REG_CALIB: u8 = 0x31;
const REG_CMD: u8 = 0x7E;

const CMD_SOFT_RESET: u8 = 0xB6;
const CHIP_ID_BMP390: u8 = 0x60;
const CHIP_ID_BMP388: u8 = 0x50;

/// Combines three little-endian data bytes into a 24-bit ADC value.
pub fn adc_from_bytes(b: [u8; 3]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], 0])
}

/// Splits a DATA_0..DATA_5 burst into pressure (first) and temperature.
pub fn decode_data(b: &[u8; REG_DATA_LEN]) -> RawReading {
    RawReading {
        pressure: adc_from_bytes([b[0], b[1], b[2]]),
        temperature: adc_from_bytes([b[3], b[4], b[5]]),
    }
}

pub struct Bmp390 {
    i2c: I2c,
}

impl Bmp390 {
    /// Opens the primary I2C bus, checks the chip id and starts normal mode.
    pub fn new(address: u16) -> Result<Self> {
        let mut i2c = I2c::new()?;
        i2c.set_slave_address(address)?;

        let chip_id = i2c.smbus_read_byte(REG_CHIP_ID)?;
        if chip_id != CHIP_ID_BMP390 && chip_id != CHIP_ID_BMP388 {
            return Err(Error::InvalidDevice(chip_id));
        }
        info!("found BMP3xx chip id 0x{:02X} at 0x{:02X}", chip_id, address);

        i2c.smbus_write_byte(REG_CMD, CMD_SOFT_RESET)?;
        thread::sleep(Duration::from_millis(10));

        let osr_p: u8 = 0b011; // Pressure oversampling x 8
        let osr_t: u8 = 0b000; // Temperature oversampling x 1
        i2c.smbus_write_byte(REG_OSR, (osr_t << 3) | osr_p)?;

        let press_en: u8 = 1;
        let temp_en: u8 = 1;
        let mode: u8 = 3; // Normal mode
        i2c.smbus_write_byte(REG_PWR_CTRL, (mode << 4) | (temp_en << 1) | press_en)?;

        Ok(Bmp390 { i2c })
    }

    /// Burst-reads the 21-byte NVM block starting at 0x31.
    pub fn read_calib_bytes(&self) -> Result<[u8; CALIB_LEN]> {
        let mut nvm = [0u8; CALIB_LEN];
        self.i2c.write_read(&[REG_CALIB], &mut nvm)?;
        debug!("nvm block {:02X?}", nvm);
        Ok(nvm)
    }

    pub fn read_calib(&self) -> Result<CalibrationCoefficients> {
        calib::parse(&self.read_calib_bytes()?)
    }

    pub fn read_raw(&self) -> Result<RawReading> {
        let mut data = [0u8; REG_DATA_LEN];
        self.i2c.write_read(&[REG_DATA], &mut data)?;
        let raw = decode_data(&data);
        debug!("raw adc {:?}", raw);
        Ok(raw)
    }
}
