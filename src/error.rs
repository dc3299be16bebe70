//! Error types for the display driver
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`FramebufferError`] - Caller-provided storage that does not fit
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! Sensor errors live next to the sensors in [`crate::sensor`].
//!
//! ## Example
//!
//! ```
//! use device_drivers::{BuilderError, Dimensions};
//!
//! // More rows than the controller has gate outputs
//! let result = Dimensions::new(300, 250);
//! assert!(matches!(result, Err(BuilderError::InvalidDimensions { .. })));
//! ```

use crate::controller::State;
use crate::interface::DisplayInterface;

/// Maximum gate outputs (rows) supported by the SSD1680 controller
pub const MAX_GATE_OUTPUTS: u16 = 296;

/// Maximum source outputs (columns) supported by the SSD1680 controller
pub const MAX_SOURCE_OUTPUTS: u16 = 176;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO/busy timeout)
    Interface(I::Error),
    /// Invalid dimensions provided
    InvalidDimensions {
        /// Number of rows (height) requested
        rows: u16,
        /// Number of columns (width) requested
        cols: u16,
    },
    /// Framebuffer storage is too small for the panel
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// A waveform table has the wrong length
    InvalidLutLength {
        /// Expected length
        expected: usize,
        /// Provided length
        provided: usize,
    },
    /// Operation not allowed in the controller's current state
    ///
    /// After a failed sequence the controller stays where it failed; a
    /// [`reset`](crate::controller::Controller::reset) starts over.
    InvalidState {
        /// State the operation requires
        expected: State,
        /// State the controller is in
        actual: State,
    },
    /// Operation not available on this panel revision
    Unsupported,
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::InvalidDimensions { rows, cols } => {
                write!(f, "Invalid dimensions: {rows}x{cols}")
            }
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
            Self::InvalidLutLength { expected, provided } => {
                write!(
                    f,
                    "Invalid LUT length: expected {expected} bytes, provided {provided}"
                )
            }
            Self::InvalidState { expected, actual } => {
                write!(f, "Invalid state: expected {expected:?}, found {actual:?}")
            }
            Self::Unsupported => write!(f, "Operation not supported by this panel"),
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

impl<I: DisplayInterface> From<FramebufferError> for Error<I> {
    fn from(error: FramebufferError) -> Self {
        match error {
            FramebufferError::TooSmall { required, provided } => {
                Self::BufferTooSmall { required, provided }
            }
        }
    }
}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Number of rows (height) requested
        rows: u16,
        /// Number of columns (width) requested
        cols: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidDimensions { rows, cols } => write!(
                f,
                "Invalid dimensions {rows}x{cols} (max {MAX_GATE_OUTPUTS}x{MAX_SOURCE_OUTPUTS})"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

/// Errors from wrapping caller-provided pixel storage
#[derive(Debug, PartialEq)]
pub enum FramebufferError {
    /// Storage holds fewer bytes than the bitmap needs
    TooSmall {
        /// Required size in bytes
        required: usize,
        /// Provided size in bytes
        provided: usize,
    },
}

impl core::fmt::Display for FramebufferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooSmall { required, provided } => write!(
                f,
                "Framebuffer storage too small: required {required} bytes, provided {provided}"
            ),
        }
    }
}

impl core::error::Error for FramebufferError {}
