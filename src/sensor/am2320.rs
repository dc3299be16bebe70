//! AM2320 humidity and temperature sensor
//!
//! The AM2320 sleeps between requests and NACKs the first transfer that wakes
//! it. A read is a Modbus-style exchange: function `0x03`, start register,
//! register count, answered by the same header, the register bytes and a
//! little-endian CRC-16/MODBUS.

use embedded_hal::delay::DelayNs;

use super::{Environment, SenseEnvironment, SensorError};
use crate::bus::Transfer;
use crate::crc::crc16_modbus;

/// Fixed I2C address
pub const ADDRESS: u8 = 0x5C;

/// Modbus read registers function code
const READ_REGISTERS: u8 = 0x03;
/// Humidity high byte, followed by humidity low and the two temperature bytes
const HUMIDITY_REGISTER: u8 = 0x00;
const REGISTER_COUNT: u8 = 4;

/// Header, four data bytes, CRC
const FRAME_LEN: usize = 2 + REGISTER_COUNT as usize + 2;

/// Wake pulses tried before the request is given up
pub const WAKE_ATTEMPTS: usize = 3;
/// Readings tried before a CRC mismatch is returned
pub const CRC_ATTEMPTS: usize = 3;

/// Time for the sensor to come out of sleep (datasheet: 0.8 to 3 ms)
const WAKE_DELAY_US: u32 = 1_000;
/// Time between the request and the response (datasheet: at least 1.5 ms)
const RESPONSE_DELAY_US: u32 = 1_600;
/// Sampling period, the sensor returns stale data when read faster
const SAMPLE_PERIOD_MS: u32 = 2_000;

/// Temperature sign bit, the rest is the magnitude
const SIGN_BIT: u16 = 0x8000;

type Result<T, E> = core::result::Result<T, SensorError<E>>;

/// AM2320 driver
pub struct Am2320<T, D> {
    bus: T,
    delay: D,
}

impl<T, D> Am2320<T, D>
where
    T: Transfer,
    D: DelayNs,
{
    /// Create a driver; the bus must address [`ADDRESS`]
    pub fn new(bus: T, delay: D) -> Self {
        Self { bus, delay }
    }

    /// Give the bus and delay back
    pub fn release(self) -> (T, D) {
        (self.bus, self.delay)
    }

    fn wake_and_request(&mut self) -> Result<(), T::Error> {
        let request = [READ_REGISTERS, HUMIDITY_REGISTER, REGISTER_COUNT];
        let mut attempt = 1;
        loop {
            // The wake transfer is always NACKed
            let _ = self.bus.transfer(&[0x00], &mut []);
            self.delay.delay_us(WAKE_DELAY_US);

            match self.bus.transfer(&request, &mut []) {
                Ok(()) => return Ok(()),
                Err(e) if attempt >= WAKE_ATTEMPTS => return Err(SensorError::Bus(e)),
                Err(e) => {
                    log::warn!("am2320 did not wake (attempt {}): {:?}", attempt, e);
                    attempt += 1;
                }
            }
        }
    }

    fn read_frame(&mut self) -> Result<[u8; FRAME_LEN], T::Error> {
        self.wake_and_request()?;
        self.delay.delay_us(RESPONSE_DELAY_US);

        let mut frame = [0u8; FRAME_LEN];
        self.bus
            .transfer(&[], &mut frame)
            .map_err(SensorError::Bus)?;
        Ok(frame)
    }
}

/// Check and decode a response frame
fn decode<E>(frame: &[u8; FRAME_LEN]) -> Result<Environment, E> {
    let (payload, crc) = frame.split_at(FRAME_LEN - 2);
    let expected = u16::from_le_bytes([crc[0], crc[1]]);
    let computed = crc16_modbus(payload);
    if expected != computed {
        return Err(SensorError::Crc { expected, computed });
    }
    if payload[0] != READ_REGISTERS || payload[1] != REGISTER_COUNT {
        return Err(SensorError::InvalidResponse);
    }

    let humidity = u16::from_be_bytes([payload[2], payload[3]]);
    let temperature = u16::from_be_bytes([payload[4], payload[5]]);
    let magnitude = i32::from(temperature & !SIGN_BIT);
    let tenths = if temperature & SIGN_BIT != 0 {
        -magnitude
    } else {
        magnitude
    };

    Ok(Environment {
        temperature: tenths * 100,
        humidity: u32::from(humidity) * 100,
        pressure: None,
    })
}

impl<T, D> SenseEnvironment for Am2320<T, D>
where
    T: Transfer,
    D: DelayNs,
{
    type Error = SensorError<T::Error>;

    fn sense(&mut self) -> Result<Environment, T::Error> {
        let mut attempt = 1;
        loop {
            let frame = self.read_frame()?;
            match decode(&frame) {
                Err(SensorError::Crc { expected, computed }) if attempt < CRC_ATTEMPTS => {
                    log::warn!(
                        "am2320 CRC mismatch (sent {:#06x}, computed {:#06x}), retrying",
                        expected,
                        computed
                    );
                    attempt += 1;
                    self.delay.delay_ms(SAMPLE_PERIOD_MS);
                }
                result => return result,
            }
        }
    }

    fn precision(&self) -> Environment {
        // One tenth of a unit
        Environment {
            temperature: 100,
            humidity: 100,
            pressure: None,
        }
    }

    /// Nothing to send: per the AM2320 datasheet the chip drops back to sleep
    /// on its own once it has answered a read, so there is no sleep command.
    fn halt(&mut self) -> Result<(), T::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBus, MockDelay, MockError};
    use alloc::vec;

    const FRAME_25C_50RH: [u8; 8] = [0x03, 0x04, 0x01, 0xF4, 0x00, 0xFA, 0x31, 0xA5];
    const FRAME_MINUS_10_1C: [u8; 8] = [0x03, 0x04, 0x01, 0xF4, 0x80, 0x65, 0x10, 0x0D];

    fn sensor(bus: MockBus) -> Am2320<MockBus, MockDelay> {
        Am2320::new(bus, MockDelay)
    }

    #[test]
    fn test_sense_reads_registers() {
        let bus = MockBus::with_script([Err(MockError), Ok(vec![]), Ok(FRAME_25C_50RH.to_vec())]);
        let mut am2320 = sensor(bus);

        let reading = am2320.sense().unwrap();
        assert_eq!(reading.temperature, 25_000);
        assert_eq!(reading.humidity, 50_000);
        assert_eq!(reading.pressure, None);

        let (bus, _) = am2320.release();
        assert_eq!(bus.writes, vec![vec![0x00], vec![0x03, 0x00, 0x04]]);
        assert_eq!(bus.reads, 1);
    }

    #[test]
    fn test_negative_temperature() {
        let bus = MockBus::with_script([Ok(vec![]), Ok(vec![]), Ok(FRAME_MINUS_10_1C.to_vec())]);
        assert_eq!(sensor(bus).sense().unwrap().temperature, -10_100);
    }

    #[test]
    fn test_wake_retries_are_bounded() {
        let bus = MockBus::with_script([
            Err(MockError),
            Err(MockError),
            Err(MockError),
            Ok(vec![]),
            Ok(FRAME_25C_50RH.to_vec()),
        ]);
        assert!(sensor(bus).sense().is_ok());

        // Every request NACKed
        let bus = MockBus::with_script(core::iter::repeat_n(Err(MockError), 2 * WAKE_ATTEMPTS));
        let mut am2320 = sensor(bus);
        assert_eq!(am2320.sense(), Err(SensorError::Bus(MockError)));
        let (bus, _) = am2320.release();
        assert_eq!(bus.writes.len(), 2 * WAKE_ATTEMPTS);
        assert_eq!(bus.reads, 0);
    }

    #[test]
    fn test_crc_mismatch_is_retried() {
        let mut corrupted = FRAME_25C_50RH;
        corrupted[3] ^= 0x01;
        let bus = MockBus::with_script([
            Ok(vec![]),
            Ok(vec![]),
            Ok(corrupted.to_vec()),
            Ok(vec![]),
            Ok(vec![]),
            Ok(FRAME_25C_50RH.to_vec()),
        ]);
        assert_eq!(sensor(bus).sense().unwrap().humidity, 50_000);
    }

    #[test]
    fn test_persistent_crc_mismatch() {
        let mut corrupted = FRAME_25C_50RH;
        corrupted[7] = 0x00;
        let mut bus = MockBus::default();
        bus.repeat = Some(corrupted.to_vec());
        let mut am2320 = sensor(bus);

        assert_eq!(
            am2320.sense(),
            Err(SensorError::Crc {
                expected: 0x0031,
                computed: 0xA531
            })
        );
        assert_eq!(am2320.release().0.reads, CRC_ATTEMPTS);
    }

    #[test]
    fn test_wrong_header_is_invalid_response() {
        // Valid CRC over a header announcing two registers
        let frame = [0x03, 0x02, 0x01, 0xF4, 0x00, 0xFA, 0xB9, 0xA5];
        let bus = MockBus::with_script([Ok(vec![]), Ok(vec![]), Ok(frame.to_vec())]);
        assert_eq!(sensor(bus).sense(), Err(SensorError::InvalidResponse));
    }

    #[test]
    fn test_read_failure_is_bus_error() {
        let bus = MockBus::with_script([Ok(vec![]), Ok(vec![]), Err(MockError)]);
        assert_eq!(sensor(bus).sense(), Err(SensorError::Bus(MockError)));
    }

    #[test]
    fn test_precision_and_halt() {
        let mut am2320 = sensor(MockBus::default());
        assert_eq!(am2320.precision().temperature, 100);
        assert!(am2320.halt().is_ok());

        // Sleep is automatic, halting touches no bus
        let (bus, _) = am2320.release();
        assert!(bus.writes.is_empty());
        assert_eq!(bus.reads, 0);
    }
}
