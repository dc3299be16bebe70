//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for talking to the SSD1680 controller of the 2.13" panels over SPI.
//!
//! ## Hardware Requirements
//!
//! - SPI bus (MOSI + SCK, CS handled by the [`SpiDevice`])
//! - 3 GPIO pins:
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, active high)
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use device_drivers::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! interface.set_busy_timeout(5_000).set_busy_poll_interval(5);
//!
//! let _ = interface.reset(&mut delay);
//! let _ = interface.send_command(0x12); // Soft reset
//! let _ = interface.busy_wait(&mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for hardware interface to the SSD1680 controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Controller`](crate::controller::Controller) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. Implement this
/// trait on your own type for custom wiring or for recording mocks in tests.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a command byte to the controller (DC low)
    #[allow(clippy::type_complexity)]
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes to the controller (DC high)
    #[allow(clippy::type_complexity)]
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Perform hardware reset
    ///
    /// The implementation must drive RST high, low, then high again, holding
    /// each level long enough for the controller to latch it
    /// (20 ms / 2 ms / 20 ms for the 2.13" panels).
    ///
    /// # Errors
    ///
    /// Returns an error if the reset pin cannot be driven.
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;

    /// Wait for busy pin to go inactive (with timeout)
    ///
    /// # Errors
    ///
    /// Returns [`InterfaceError::Timeout`] if BUSY doesn't clear within
    /// the implementation-specific timeout period.
    #[allow(clippy::type_complexity)]
    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// Timeout waiting for busy pin
    Timeout,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Timeout => write!(f, "Timeout waiting for display"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Default timeout for busy-wait in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 30_000;

/// Default interval between BUSY polls in milliseconds
pub const DEFAULT_BUSY_POLL_MS: u32 = 10;

/// Reset pulse timings in milliseconds: high, low, high
const RESET_TIMINGS_MS: [u32; 3] = [20, 2, 20];

/// Hardware interface implementation for the SSD1680
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
pub struct Interface<SPI, DC, RST, BUSY> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin (active high)
    busy: BUSY,
    /// Timeout for busy-wait in milliseconds
    busy_timeout_ms: u32,
    /// Delay between BUSY polls in milliseconds
    busy_poll_ms: u32,
    /// Busy pin polarity (true = active high, false = active low)
    busy_active_high: bool,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `busy` - Busy pin (input, active high)
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            busy_poll_ms: DEFAULT_BUSY_POLL_MS,
            busy_active_high: true,
        }
    }

    /// Set the busy-wait timeout in milliseconds
    ///
    /// Default is 30,000ms (30 seconds). Set to 0 to disable timeout.
    pub fn set_busy_timeout(&mut self, timeout_ms: u32) -> &mut Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    /// Get the current busy-wait timeout in milliseconds
    pub fn busy_timeout(&self) -> u32 {
        self.busy_timeout_ms
    }

    /// Set the interval between BUSY polls in milliseconds
    ///
    /// Values below 1 ms are clamped to 1 ms.
    pub fn set_busy_poll_interval(&mut self, interval_ms: u32) -> &mut Self {
        self.busy_poll_ms = interval_ms.max(1);
        self
    }

    /// Get the interval between BUSY polls in milliseconds
    pub fn busy_poll_interval(&self) -> u32 {
        self.busy_poll_ms
    }

    /// Set busy pin polarity
    ///
    /// Default is active-high. Set to false for active-low panels.
    pub fn set_busy_active_high(&mut self, active_high: bool) -> &mut Self {
        self.busy_active_high = active_high;
        self
    }

    /// Get busy pin polarity (true = active high)
    pub fn busy_active_high(&self) -> bool {
        self.busy_active_high
    }

    /// Release the SPI device and pins
    pub fn release(self) -> (SPI, DC, RST, BUSY) {
        (self.spi, self.dc, self.rst, self.busy)
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.dc.set_low().map_err(|e| InterfaceError::Pin(e))?;
        self.spi
            .write(&[command])
            .map_err(|e| InterfaceError::Spi(e))?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_high().map_err(|e| InterfaceError::Pin(e))?;
        self.spi.write(data).map_err(|e| InterfaceError::Spi(e))?;
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        let [settle, pulse, recover] = RESET_TIMINGS_MS;
        self.rst.set_high().map_err(|e| InterfaceError::Pin(e))?;
        delay.delay_ms(settle);
        self.rst.set_low().map_err(|e| InterfaceError::Pin(e))?;
        delay.delay_ms(pulse);
        self.rst.set_high().map_err(|e| InterfaceError::Pin(e))?;
        delay.delay_ms(recover);
        Ok(())
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        let mut waited_ms = 0u32;
        let timeout_ms = self.busy_timeout_ms;

        loop {
            let is_busy = if self.busy_active_high {
                self.busy.is_high()
            } else {
                self.busy.is_low()
            };

            let is_busy = match is_busy {
                Ok(value) => value,
                Err(e) => return Err(InterfaceError::Pin(e)),
            };

            if !is_busy {
                return Ok(());
            }

            delay.delay_ms(self.busy_poll_ms);
            waited_ms = waited_ms.saturating_add(self.busy_poll_ms);
            if timeout_ms > 0 && waited_ms >= timeout_ms {
                log::warn!("busy line still active after {} ms", waited_ms);
                return Err(InterfaceError::Timeout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;
    use embedded_hal::spi::ErrorType as SpiErrorType;

    #[derive(Debug)]
    struct MockSpi;
    #[derive(Debug, Clone, Copy)]
    struct MockError;

    impl core::fmt::Display for MockError {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "mock error")
        }
    }

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    impl SpiErrorType for MockSpi {
        type Error = MockError;
    }

    impl SpiDevice for MockSpi {
        fn transaction(
            &mut self,
            _operations: &mut [embedded_hal::spi::Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Pin that reports busy for a fixed number of polls, or forever
    #[derive(Debug, Default)]
    struct MockPin {
        busy_polls: Option<u32>,
        polls: u32,
        fail: bool,
    }

    impl MockPin {
        fn busy_for(polls: Option<u32>) -> Self {
            Self {
                busy_polls: polls,
                ..Self::default()
            }
        }
    }

    impl ErrorType for MockPin {
        type Error = MockError;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            if self.fail { Err(MockError) } else { Ok(()) }
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            if self.fail { Err(MockError) } else { Ok(()) }
        }
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            let polls = self.polls;
            self.polls += 1;
            Ok(self.busy_polls.is_none_or(|limit| polls < limit))
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    #[derive(Default)]
    struct MockDelay {
        total_ms: u32,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
        }
    }

    fn interface(busy: MockPin) -> Interface<MockSpi, MockPin, MockPin, MockPin> {
        Interface::new(MockSpi, MockPin::default(), MockPin::default(), busy)
    }

    #[test]
    fn test_default_busy_timeout() {
        assert_eq!(DEFAULT_BUSY_TIMEOUT_MS, 30_000);
    }

    #[test]
    fn test_set_busy_timeout() {
        let mut interface = interface(MockPin::default());
        assert_eq!(interface.busy_timeout(), DEFAULT_BUSY_TIMEOUT_MS);

        interface.set_busy_timeout(5_000);
        assert_eq!(interface.busy_timeout(), 5_000);

        interface.set_busy_timeout(0);
        assert_eq!(interface.busy_timeout(), 0);
    }

    #[test]
    fn test_poll_interval_clamped() {
        let mut interface = interface(MockPin::default());
        interface.set_busy_poll_interval(0);
        assert_eq!(interface.busy_poll_interval(), 1);
    }

    #[test]
    fn test_busy_wait_returns_when_idle() {
        let mut interface = interface(MockPin::busy_for(Some(3)));
        let mut delay = MockDelay::default();
        assert!(interface.busy_wait(&mut delay).is_ok());
        assert_eq!(delay.total_ms, 3 * DEFAULT_BUSY_POLL_MS);
    }

    #[test]
    fn test_busy_wait_times_out() {
        let mut interface = interface(MockPin::busy_for(None));
        interface.set_busy_timeout(100).set_busy_poll_interval(10);
        let mut delay = MockDelay::default();

        let result = interface.busy_wait(&mut delay);
        assert!(matches!(result, Err(InterfaceError::Timeout)));
        assert_eq!(delay.total_ms, 100);
    }

    #[test]
    fn test_active_low_busy() {
        // Reports high for the first two polls, so active-low sees "not busy"
        let mut interface = interface(MockPin::busy_for(Some(2)));
        interface.set_busy_active_high(false);
        let mut delay = MockDelay::default();
        assert!(interface.busy_wait(&mut delay).is_ok());
        assert_eq!(delay.total_ms, 0);
    }

    #[test]
    fn test_reset_timing() {
        let mut interface = interface(MockPin::default());
        let mut delay = MockDelay::default();
        assert!(interface.reset(&mut delay).is_ok());
        assert_eq!(delay.total_ms, 42);
    }

    #[test]
    fn test_reset_pin_error() {
        let rst = MockPin {
            fail: true,
            ..MockPin::default()
        };
        let mut interface = Interface::new(MockSpi, MockPin::default(), rst, MockPin::default());
        let mut delay = MockDelay::default();
        assert!(matches!(
            interface.reset(&mut delay),
            Err(InterfaceError::Pin(MockError))
        ));
    }
}
