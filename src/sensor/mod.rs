//! Environmental sensors
//!
//! Every sensor implements [`SenseEnvironment`], whatever bus it sits on.
//! Readings use integer milli-units so no floating point is needed on the
//! target.
//!
//! ## Example
//!
//! ```rust,no_run
//! use device_drivers::bus::I2cTransfer;
//! use device_drivers::sensor::SenseEnvironment;
//! use device_drivers::sensor::aht20::{self, Aht20};
//! # use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
//! # struct MockI2c;
//! # impl ErrorType for MockI2c { type Error = ErrorKind; }
//! # impl I2c for MockI2c {
//! #     fn transaction(&mut self, _a: u8, _o: &mut [Operation<'_>]) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockDelay;
//! # impl embedded_hal::delay::DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! let bus = I2cTransfer::new(MockI2c, aht20::ADDRESS);
//! let mut sensor = Aht20::new(bus, MockDelay);
//!
//! if let Ok(reading) = sensor.sense() {
//!     let _celsius = reading.temperature / 1000;
//!     let _percent = reading.humidity / 1000;
//! }
//! ```

pub mod aht20;
pub mod am2320;
#[cfg(any(test, feature = "std"))]
pub mod continuous;

/// One environmental reading
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    /// Temperature in milli degrees Celsius
    pub temperature: i32,
    /// Relative humidity in milli percent
    pub humidity: u32,
    /// Pressure in pascal, `None` when the sensor has no barometer
    pub pressure: Option<u32>,
}

/// Environmental sensing capability
pub trait SenseEnvironment {
    /// Error returned by the sensor
    type Error;

    /// Take one reading
    fn sense(&mut self) -> Result<Environment, Self::Error>;

    /// Smallest step each quantity is reported in
    fn precision(&self) -> Environment;

    /// Stop the sensor; later calls to [`sense`](Self::sense) may wake it
    fn halt(&mut self) -> Result<(), Self::Error>;
}

impl<T: SenseEnvironment + ?Sized> SenseEnvironment for &mut T {
    type Error = T::Error;

    fn sense(&mut self) -> Result<Environment, Self::Error> {
        (**self).sense()
    }

    fn precision(&self) -> Environment {
        (**self).precision()
    }

    fn halt(&mut self) -> Result<(), Self::Error> {
        (**self).halt()
    }
}

/// Errors returned by sensor drivers
#[derive(Debug, PartialEq, Eq)]
pub enum SensorError<E> {
    /// The bus transaction failed
    Bus(E),
    /// Checksum mismatch, the response was corrupted on the wire
    Crc {
        /// Checksum sent by the sensor
        expected: u16,
        /// Checksum computed over the received payload
        computed: u16,
    },
    /// The response does not match the request
    InvalidResponse,
    /// The sensor did not report itself calibrated after initialization
    NotCalibrated,
    /// The sensor stayed busy past its deadline
    Timeout,
}

impl<E: core::fmt::Debug> core::fmt::Display for SensorError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "Bus error: {e:?}"),
            Self::Crc { expected, computed } => {
                write!(f, "CRC mismatch: sensor sent {expected:#06x}, computed {computed:#06x}")
            }
            Self::InvalidResponse => write!(f, "Invalid response from sensor"),
            Self::NotCalibrated => write!(f, "Sensor is not calibrated"),
            Self::Timeout => write!(f, "Sensor busy past deadline"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for SensorError<E> {}
