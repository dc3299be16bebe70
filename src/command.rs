//! SSD1680 command definitions
//!
//! Command bytes used by the Waveshare 2.13" v3/v4 panels. Commands are sent
//! over SPI with the DC pin low, their parameters follow with DC high.
//!
//! ## Example
//!
//! ```rust,no_run
//! use device_drivers::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! let _ = interface.send_command(command::SOFT_RESET);
//!
//! let _ = interface.send_command(command::WRITE_RAM_BW);
//! let _ = interface.send_data(&[0xFF; 16]);
//! ```

// System control

/// Driver output control (0x01)
///
/// 3 bytes: `[gates-1 (LSB), gates-1 (MSB), scanning mode]`
pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;

/// Gate driving voltage (0x03), 1 byte
pub const GATE_VOLTAGE: u8 = 0x03;

/// Source driving voltage (0x04), 3 bytes: VSH1, VSH2, VSL
pub const SOURCE_VOLTAGE: u8 = 0x04;

/// Deep sleep mode (0x10)
///
/// 1 byte: `0x01` keeps RAM contents. Only a hardware reset wakes the panel.
pub const DEEP_SLEEP: u8 = 0x10;

/// Data entry mode (0x11)
///
/// 1 byte:
/// - Bit 0 (ID0): X direction (0=decrement, 1=increment)
/// - Bit 1 (ID1): Y direction (0=decrement, 1=increment)
/// - Bit 2 (AM): address counter direction (0=X, 1=Y)
pub const DATA_ENTRY_MODE: u8 = 0x11;

/// Software reset (0x12). BUSY is high until the reset completes.
pub const SOFT_RESET: u8 = 0x12;

/// Temperature sensor selection (0x18), 1 byte: `0x80` = internal sensor
pub const TEMP_SENSOR_CONTROL: u8 = 0x18;

/// Write temperature register (0x1A), 2 bytes
///
/// Overrides the measured temperature used to pick the waveform.
pub const WRITE_TEMP: u8 = 0x1A;

// Display update

/// Master activation (0x20)
///
/// Runs the sequence selected by [`DISPLAY_UPDATE_CTRL2`]. BUSY is high until
/// it completes.
pub const MASTER_ACTIVATION: u8 = 0x20;

/// Display update control 1 (0x21), 2 bytes: RAM content options, source range
pub const DISPLAY_UPDATE_CTRL1: u8 = 0x21;

/// Display update control 2 (0x22)
///
/// 1 byte with bit flags:
/// - 0x80: Enable clock
/// - 0x40: Enable analog
/// - 0x20: Load temperature value
/// - 0x10: Load LUT
/// - 0x08: Display mode 2
/// - 0x04: Display
/// - 0x02: Disable analog
/// - 0x01: Disable clock
pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;

// RAM access

/// Write black/white RAM (0x24). Bit 1 is white, bit 0 is black.
pub const WRITE_RAM_BW: u8 = 0x24;

/// Write red RAM (0x26)
///
/// On the monochrome 2.13" panels this plane holds the base image that
/// partial refresh compares against.
pub const WRITE_RAM_RED: u8 = 0x26;

/// Write VCOM register (0x2C), 1 byte
pub const WRITE_VCOM: u8 = 0x2C;

/// Write LUT register (0x32)
pub const WRITE_LUT: u8 = 0x32;

/// Write display option register (0x37), 7 bytes
pub const WRITE_DISPLAY_OPTION: u8 = 0x37;

/// Border waveform control (0x3C), 1 byte
pub const BORDER_WAVEFORM: u8 = 0x3C;

/// End option (0x3F), 1 byte. Selects the source output level after an update.
pub const END_OPTION: u8 = 0x3F;

/// Set RAM X address start/end (0x44)
///
/// 2 bytes, addressed in units of 8 pixels: `[start, end]`
pub const SET_RAM_X_RANGE: u8 = 0x44;

/// Set RAM Y address start/end (0x45)
///
/// 4 bytes: `[start_LSB, start_MSB, end_LSB, end_MSB]`
pub const SET_RAM_Y_RANGE: u8 = 0x45;

/// Set RAM X address counter (0x4E), 1 byte in units of 8 pixels
pub const SET_RAM_X_COUNTER: u8 = 0x4E;

/// Set RAM Y address counter (0x4F), 2 bytes: `[LSB, MSB]`
pub const SET_RAM_Y_COUNTER: u8 = 0x4F;

// Frequently used parameter values

/// Data entry mode: X increment, Y increment, X first
pub const DATA_ENTRY_XY_INCREMENT: u8 = 0x03;

/// Update control 2: enable clock and analog only (power on)
pub const CTRL2_POWER_ON: u8 = 0xC0;

/// Update control 2 used by fast init to load temperature and LUT
pub const CTRL2_LOAD_TEMPERATURE: u8 = 0xB1;

/// Update control 2 used by fast init to load the LUT for the written temperature
pub const CTRL2_LOAD_LUT: u8 = 0x91;

/// Update control 2: full refresh with the loaded waveform
///
/// Used by v3 for full updates and by v4 after fast init.
pub const CTRL2_FULL: u8 = 0xC7;

/// Update control 2: full refresh on v4, also loading the OTP waveform
pub const CTRL2_V4_FULL: u8 = 0xF7;

/// Update control 2: v4 full refresh after fast init
pub const CTRL2_FAST_FULL: u8 = CTRL2_FULL;

/// Update control 2: v3 partial refresh (display mode 2 only)
pub const CTRL2_PARTIAL_V3: u8 = 0x0F;

/// Update control 2: v4 partial refresh
pub const CTRL2_PARTIAL_V4: u8 = 0xFF;

/// Deep sleep parameter that keeps RAM contents
pub const DEEP_SLEEP_RETAIN_RAM: u8 = 0x01;
