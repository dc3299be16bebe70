//! Color type for monochrome e-paper panels
//!
//! The 2.13" panels show black and white. Device RAM and the
//! [`Framebuffer`](crate::framebuffer::Framebuffer) use the same polarity:
//!
//! | Color | Bit | Fill byte |
//! |-------|-----|-----------|
//! | Black | 0   | 0x00      |
//! | White | 1   | 0xFF      |
//!
//! ## Example
//!
//! ```
//! use device_drivers::Color;
//!
//! assert_eq!(Color::Black.fill_byte(), 0x00);
//! assert_eq!(Color::White.fill_byte(), 0xFF);
//!
//! // Grey levels are thresholded at the midpoint
//! assert_eq!(Color::from_luma(0x7F), Color::Black);
//! assert_eq!(Color::from_luma(0x80), Color::White);
//! ```

/// Luma at or above which a source pixel is drawn white
pub const LUMA_THRESHOLD: u8 = 0x80;

/// Colors supported by the panel
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Black pixels
    Black,
    /// White pixels (the panel's blank state)
    #[default]
    White,
}

/// Color model exposed through the drawing contract
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ColorModel {
    /// One bit per pixel, black or white
    Monochrome,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    /// `On` is ink (black), `Off` is paper (white)
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::On => Self::Black,
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Self::White,
        }
    }
}

impl Color {
    /// Threshold an 8-bit grey level into black or white
    pub fn from_luma(luma: u8) -> Self {
        if luma >= LUMA_THRESHOLD {
            Self::White
        } else {
            Self::Black
        }
    }

    /// Build a color from a RAM bit
    pub fn from_bit(bit: bool) -> Self {
        if bit { Self::White } else { Self::Black }
    }

    /// RAM bit for this color (1 = white)
    pub fn bit(self) -> bool {
        matches!(self, Self::White)
    }

    /// Byte with all eight pixels set to this color
    ///
    /// ```
    /// use device_drivers::Color;
    ///
    /// assert_eq!(Color::Black.fill_byte(), 0x00);
    /// assert_eq!(Color::White.fill_byte(), 0xFF);
    /// ```
    pub fn fill_byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White => 0xFF,
        }
    }

    /// The opposite color
    pub fn inverse(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}
