//! 1-bit framebuffer and image sources
//!
//! The framebuffer packs 8 vertically adjacent pixels per byte, least
//! significant bit on top:
//!
//! ```text
//! byte index = (y / 8) * width + x
//! bit        = y % 8
//! ```
//!
//! A set bit is white, matching the polarity of the panel RAM. Storage is
//! provided by the caller so the driver does not allocate; with the `alloc`
//! feature [`Framebuffer::allocate`] makes a heap-backed one.
//!
//! ```
//! use device_drivers::framebuffer::Framebuffer;
//! use device_drivers::geometry::Size;
//! use device_drivers::Color;
//!
//! let size = Size::new(16, 12);
//! let mut storage = [0u8; 32];
//! assert_eq!(Framebuffer::<&mut [u8]>::required_len(size), 32);
//!
//! let mut fb = match Framebuffer::new(&mut storage[..], size) {
//!     Ok(fb) => fb,
//!     Err(_) => return,
//! };
//! fb.fill(Color::White);
//! fb.set_pixel(3, 9, Color::Black);
//! assert_eq!(fb.pixel(3, 9), Some(Color::Black));
//! assert_eq!(fb.pixel(16, 0), None);
//! ```

use crate::color::Color;
use crate::error::FramebufferError;
use crate::geometry::{Rect, Size};

/// Something that can be read pixel by pixel
pub trait ImageSource {
    /// Area where [`color_at`](Self::color_at) returns pixels
    fn bounds(&self) -> Rect;

    /// Color at `(x, y)`, `None` outside [`bounds`](Self::bounds)
    fn color_at(&self, x: i32, y: i32) -> Option<Color>;
}

impl<T: ImageSource + ?Sized> ImageSource for &T {
    fn bounds(&self) -> Rect {
        (**self).bounds()
    }

    fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        (**self).color_at(x, y)
    }
}

/// Column-byte-packed monochrome bitmap
pub struct Framebuffer<B> {
    buffer: B,
    size: Size,
}

impl<B> Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Bytes needed for a bitmap of `size`
    pub fn required_len(size: Size) -> usize {
        size.width as usize * (size.height as usize).div_ceil(8)
    }

    /// Wrap `buffer` as a bitmap of `size`
    ///
    /// # Errors
    ///
    /// Returns [`FramebufferError::TooSmall`] if `buffer` holds fewer than
    /// [`required_len`](Self::required_len) bytes.
    pub fn new(buffer: B, size: Size) -> Result<Self, FramebufferError> {
        let required = Self::required_len(size);
        let provided = buffer.as_ref().len();
        if provided < required {
            return Err(FramebufferError::TooSmall { required, provided });
        }
        Ok(Self { buffer, size })
    }

    /// Bitmap size in pixels
    pub fn size(&self) -> Size {
        self.size
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x as u32 >= self.size.width || y as u32 >= self.size.height {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some(((y / 8) * self.size.width as usize + x, 1 << (y % 8)))
    }

    /// Color of the pixel at `(x, y)`, `None` when out of range
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let (index, mask) = self.locate(x, y)?;
        Some(Color::from_bit(self.buffer.as_ref()[index] & mask != 0))
    }

    /// Set the pixel at `(x, y)`; out of range pixels are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some((index, mask)) = self.locate(x, y) {
            let byte = &mut self.buffer.as_mut()[index];
            if color.bit() {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: Color) {
        let len = Self::required_len(self.size);
        self.buffer.as_mut()[..len].fill(color.fill_byte());
    }

    /// Packed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_ref()[..Self::required_len(self.size)]
    }

    /// Give the storage back
    pub fn release(self) -> B {
        self.buffer
    }
}

#[cfg(feature = "alloc")]
impl Framebuffer<alloc::vec::Vec<u8>> {
    /// Heap-backed bitmap of `size`, all black
    pub fn allocate(size: Size) -> Self {
        Self {
            buffer: alloc::vec![0u8; Self::required_len(size)],
            size,
        }
    }
}

impl<B> ImageSource for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        self.pixel(x, y)
    }
}

/// Borrowed 8-bit greyscale image, row-major
///
/// Pixels are thresholded with [`Color::from_luma`] when read.
#[derive(Clone, Copy, Debug)]
pub struct GrayImage<'a> {
    data: &'a [u8],
    size: Size,
}

impl<'a> GrayImage<'a> {
    /// Wrap `data` as a `size` image
    ///
    /// # Errors
    ///
    /// Returns [`FramebufferError::TooSmall`] if `data` holds fewer than
    /// `width * height` bytes.
    pub fn new(data: &'a [u8], size: Size) -> Result<Self, FramebufferError> {
        let required = size.width as usize * size.height as usize;
        if data.len() < required {
            return Err(FramebufferError::TooSmall {
                required,
                provided: data.len(),
            });
        }
        Ok(Self { data, size })
    }

    /// Raw grey level at `(x, y)`
    pub fn luma(&self, x: i32, y: i32) -> Option<u8> {
        if !Rect::from_size(self.size).contains(x, y) {
            return None;
        }
        self.data
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }
}

impl ImageSource for GrayImage<'_> {
    fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        self.luma(x, y).map(Color::from_luma)
    }
}
