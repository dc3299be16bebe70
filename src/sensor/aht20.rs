//! AHT20 humidity and temperature sensor
//!
//! A measurement is triggered, then the status byte is polled until the busy
//! bit clears. The seven byte response carries the status, 20 bits of
//! humidity, 20 bits of temperature and a CRC-8.
//!
//! Status bits (datasheet table 10): bit 7 busy, bit 3 calibration enabled.

use embedded_hal::delay::DelayNs;

use super::{Environment, SenseEnvironment, SensorError};
use crate::bus::Transfer;
use crate::crc::crc8;

/// Fixed I2C address
pub const ADDRESS: u8 = 0x38;

const CMD_STATUS: u8 = 0x71;
const CMD_INIT: [u8; 3] = [0xBE, 0x08, 0x00];
const CMD_MEASURE: [u8; 3] = [0xAC, 0x33, 0x00];
const CMD_SOFT_RESET: u8 = 0xBA;

const STATUS_BUSY: u8 = 0x80;
const STATUS_CALIBRATED: u8 = 0x08;

/// Status, five data bytes, CRC
const FRAME_LEN: usize = 7;

/// Wait after the init command (datasheet: 10 ms)
const INIT_DELAY_MS: u32 = 10;
/// Wait after triggering a measurement (datasheet: 80 ms)
const MEASURE_DELAY_MS: u32 = 80;
/// Busy polling interval
pub const BUSY_POLL_MS: u32 = 10;
/// How long the busy bit may stay set after the measurement delay
pub const BUSY_DEADLINE_MS: u32 = 200;
/// Soft reset settling time (datasheet: 20 ms)
const RESET_DELAY_MS: u32 = 20;

/// Measurements tried before a CRC mismatch is returned
pub const CRC_ATTEMPTS: usize = 3;

/// Full scale of the 20-bit raw values
const RAW_SCALE: u64 = 1 << 20;

type Result<T, E> = core::result::Result<T, SensorError<E>>;

/// AHT20 driver
pub struct Aht20<T, D> {
    bus: T,
    delay: D,
    calibrated: bool,
}

impl<T, D> Aht20<T, D>
where
    T: Transfer,
    D: DelayNs,
{
    /// Create a driver; the bus must address [`ADDRESS`]
    ///
    /// Calibration is checked on the first reading.
    pub fn new(bus: T, delay: D) -> Self {
        Self {
            bus,
            delay,
            calibrated: false,
        }
    }

    /// Give the bus and delay back
    pub fn release(self) -> (T, D) {
        (self.bus, self.delay)
    }

    /// Read the status byte
    pub fn status(&mut self) -> Result<u8, T::Error> {
        let mut status = [0u8];
        self.bus
            .transfer(&[CMD_STATUS], &mut status)
            .map_err(SensorError::Bus)?;
        Ok(status[0])
    }

    /// Make sure the calibration coefficients are loaded
    ///
    /// Sends the init command when the calibration bit is clear.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::NotCalibrated`] if the bit is still clear
    /// afterwards.
    pub fn init(&mut self) -> Result<(), T::Error> {
        if self.status()? & STATUS_CALIBRATED == 0 {
            log::debug!("aht20 not calibrated, sending init");
            self.bus
                .transfer(&CMD_INIT, &mut [])
                .map_err(SensorError::Bus)?;
            self.delay.delay_ms(INIT_DELAY_MS);

            if self.status()? & STATUS_CALIBRATED == 0 {
                return Err(SensorError::NotCalibrated);
            }
        }
        self.calibrated = true;
        Ok(())
    }

    /// Soft reset; calibration is checked again on the next reading
    pub fn reset(&mut self) -> Result<(), T::Error> {
        self.bus
            .transfer(&[CMD_SOFT_RESET], &mut [])
            .map_err(SensorError::Bus)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.calibrated = false;
        Ok(())
    }

    fn measure(&mut self) -> Result<[u8; FRAME_LEN], T::Error> {
        self.bus
            .transfer(&CMD_MEASURE, &mut [])
            .map_err(SensorError::Bus)?;
        self.delay.delay_ms(MEASURE_DELAY_MS);

        let mut frame = [0u8; FRAME_LEN];
        let mut waited = 0;
        loop {
            self.bus
                .transfer(&[], &mut frame)
                .map_err(SensorError::Bus)?;
            if frame[0] & STATUS_BUSY == 0 {
                return Ok(frame);
            }
            waited += BUSY_POLL_MS;
            if waited >= BUSY_DEADLINE_MS {
                log::warn!("aht20 still busy after {} ms", MEASURE_DELAY_MS + waited);
                return Err(SensorError::Timeout);
            }
            self.delay.delay_ms(BUSY_POLL_MS);
        }
    }
}

/// Check and decode a response frame
fn decode<E>(frame: &[u8; FRAME_LEN]) -> Result<Environment, E> {
    let computed = crc8(&frame[..FRAME_LEN - 1]);
    let expected = frame[FRAME_LEN - 1];
    if expected != computed {
        return Err(SensorError::Crc {
            expected: u16::from(expected),
            computed: u16::from(computed),
        });
    }

    let raw_humidity =
        (u32::from(frame[1]) << 12) | (u32::from(frame[2]) << 4) | (u32::from(frame[3]) >> 4);
    let raw_temperature =
        (u32::from(frame[3] & 0x0F) << 16) | (u32::from(frame[4]) << 8) | u32::from(frame[5]);

    // %RH = raw / 2^20 * 100, °C = raw / 2^20 * 200 - 50
    let humidity = u64::from(raw_humidity) * 100_000 / RAW_SCALE;
    let temperature = (u64::from(raw_temperature) * 200_000 / RAW_SCALE) as i32 - 50_000;

    Ok(Environment {
        temperature,
        humidity: humidity as u32,
        pressure: None,
    })
}

impl<T, D> SenseEnvironment for Aht20<T, D>
where
    T: Transfer,
    D: DelayNs,
{
    type Error = SensorError<T::Error>;

    fn sense(&mut self) -> Result<Environment, T::Error> {
        if !self.calibrated {
            self.init()?;
        }

        let mut attempt = 1;
        loop {
            let frame = self.measure()?;
            match decode(&frame) {
                Err(SensorError::Crc { expected, computed }) if attempt < CRC_ATTEMPTS => {
                    log::warn!(
                        "aht20 CRC mismatch (sent {:#04x}, computed {:#04x}), retrying",
                        expected,
                        computed
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn precision(&self) -> Environment {
        // Datasheet resolution: 0.024 %RH, 0.01 °C
        Environment {
            temperature: 10,
            humidity: 24,
            pressure: None,
        }
    }

    /// Nothing to send: per the AHT20 datasheet the chip returns to its
    /// low-power idle state by itself after each measurement and has no
    /// sleep command.
    fn halt(&mut self) -> Result<(), T::Error> {
        Ok(())
    }
}
