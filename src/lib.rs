//! Device drivers for Waveshare 2.13" e-paper panels and environmental sensors
//!
//! The core of the crate drives the v3 and v4 revisions of the 2.13" black and
//! white e-paper panel (SSD1680 controller, 122×250 pixels) in any of four
//! mounting orientations, redrawing only the RAM window a draw touches.
//! Around it sit a small transport capability for I2C/SPI peripherals and two
//! humidity/temperature sensor drivers.
//!
//! ## Features
//!
//! - `no_std` compatible, caller-provided framebuffer storage
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Full and partial refresh, fast init on v4
//! - AM2320 and AHT20 sensors with CRC validation
//! - Continuous sensor sampling on a background thread (with `std` feature)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use device_drivers::geometry::Orientation;
//! use device_drivers::{Builder, Color, Display, Interface, Model};
//!
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
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst, busy);
//! let config = match Builder::new()
//!     .model(Model::V4)
//!     .orientation(Orientation::TopRight)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut buffer = [0u8; 4000];
//! let mut display = match Display::new(interface, config, &mut buffer[..]) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//! let _ = display.reset(&mut delay);
//! let _ = display.init(&mut delay);
//! let _ = display.clear(Color::White, &mut delay);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

/// Transport capability for I2C/SPI peripherals
pub mod bus;
/// Color types for black and white e-paper panels
pub mod color;
/// SSD1680 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Controller command sequencer
pub mod controller;
/// Checksums used by sensor protocols
pub mod crc;
/// Device façade and drawing capability
pub mod display;
/// Error types for the display driver
pub mod error;
/// Framebuffer and image sources
pub mod framebuffer;
/// Rectangle math and orientation mapping
pub mod geometry;
/// Hardware interface abstraction
pub mod interface;
/// Waveform look-up tables
pub mod lut;
/// Environmental sensors
pub mod sensor;
/// Framebuffer to controller RAM transfer
pub mod transfer;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

#[cfg(test)]
mod mock;

pub use color::{Color, ColorModel};
pub use config::{
    Builder, Config, Dimensions, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS, Model, PANEL_2IN13,
};
pub use display::{Display, Drawer, UpdateMode};
pub use error::{BuilderError, Error, FramebufferError};
pub use interface::InterfaceError;
pub use interface::{DEFAULT_BUSY_TIMEOUT_MS, DisplayInterface, Interface};
