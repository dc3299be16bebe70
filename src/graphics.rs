//! Graphics support via embedded-graphics
//!
//! [`Display`] implements [`DrawTarget`] in logical coordinates. Drawing only
//! touches the framebuffer; call [`Display::flush`] or
//! [`Display::flush_region`] to show the result.
//!
//! A bare [`Framebuffer`] is a draw target too, addressed in buffer
//! coordinates (no orientation offset).
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     pixelcolor::BinaryColor,
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use device_drivers::{Builder, Color, Display, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
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
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! # let config = match Builder::new().build() {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! # let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! # let buffer = vec![0u8; config.buffer_len()];
//! # let mut display = match Display::new(interface, config, buffer) {
//! #     Ok(display) => display,
//! #     Err(_) => return,
//! # };
//! # let _ = display.reset(&mut delay);
//! # let _ = display.init(&mut delay);
//! let _ = display.clear(Color::White, &mut delay);
//!
//! let _ = Circle::new(Point::new(10, 10), 40)
//!     .into_styled(PrimitiveStyle::with_stroke(Color::Black, 2))
//!     .draw(&mut display);
//!
//! let style = MonoTextStyle::new(&FONT_6X10, Color::Black);
//! let _ = Text::new("Hello", Point::new(10, 80), style).draw(&mut display);
//!
//! let _ = Rectangle::new(Point::new(60, 0), Size::new(40, 40))
//!     .into_styled(PrimitiveStyle::with_fill(Color::from(BinaryColor::On)))
//!     .draw(&mut display);
//!
//! let _ = display.flush(&mut delay);
//! ```

use core::convert::Infallible;

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    primitives::Rectangle,
};

use crate::color::Color;
use crate::display::Display;
use crate::framebuffer::Framebuffer;
use crate::geometry::{self, Rect};
use crate::interface::DisplayInterface;

impl<I, B> DrawTarget for Display<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            // Out of bounds pixels are dropped by set_pixel
            self.set_pixel(x, y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let bounds = self.geometry().bounds();
        for y in bounds.min_y..bounds.max_y {
            for x in bounds.min_x..bounds.max_x {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

impl<I, B> OriginDimensions for Display<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        let size = self.geometry().device_size();
        Size::new(size.width, size.height)
    }
}

impl<B> DrawTarget for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.set_pixel(x, y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

impl<B> OriginDimensions for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        let size = Framebuffer::size(self);
        Size::new(size.width, size.height)
    }
}

impl From<Rectangle> for Rect {
    fn from(rectangle: Rectangle) -> Self {
        Self::with_size(
            geometry::Point::new(rectangle.top_left.x, rectangle.top_left.y),
            geometry::Size::new(rectangle.size.width, rectangle.size.height),
        )
    }
}

impl From<Rect> for Rectangle {
    fn from(rect: Rect) -> Self {
        let rect = rect.canonical();
        Self::new(
            Point::new(rect.min_x, rect.min_y),
            Size::new(rect.width(), rect.height()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{SET_RAM_X_RANGE, WRITE_RAM_BW};
    use crate::config::Builder;
    use crate::geometry::Orientation;
    use crate::mock::{MockDelay, MockInterface};
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    fn test_display(orientation: Orientation) -> Display<MockInterface, Vec<u8>> {
        let config = Builder::new().orientation(orientation).build().unwrap();
        let buffer = vec![0xFFu8; config.buffer_len()];
        Display::new(MockInterface::new(), config, buffer).unwrap()
    }

    #[test]
    fn test_size_follows_orientation() {
        assert_eq!(test_display(Orientation::TopLeft).size(), Size::new(122, 250));
        assert_eq!(test_display(Orientation::TopRight).size(), Size::new(250, 122));
    }

    #[test]
    fn test_draw_touches_framebuffer_only() {
        let mut display = test_display(Orientation::BottomRight);
        Rectangle::new(Point::new(0, 0), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(Color::Black))
            .draw(&mut display)
            .unwrap();

        assert_eq!(display.pixel(0, 0), Some(Color::Black));
        assert_eq!(display.pixel(3, 3), Some(Color::Black));
        assert_eq!(display.pixel(4, 4), Some(Color::White));
        assert!(display.controller().interface().commands.is_empty());
    }

    #[test]
    fn test_out_of_bounds_pixels_are_dropped() {
        let mut display = test_display(Orientation::TopLeft);
        Pixel(Point::new(-1, 5), Color::Black).draw(&mut display).unwrap();
        Pixel(Point::new(122, 5), Color::Black).draw(&mut display).unwrap();
        Pixel(Point::new(5, 250), Color::Black).draw(&mut display).unwrap();

        // Padding columns 122..128 stay white
        assert!(display.framebuffer().as_bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_flush_drawn_region() {
        let mut display = test_display(Orientation::TopLeft);
        let mut delay = MockDelay;
        display.reset(&mut delay).unwrap();
        display.init(&mut delay).unwrap();
        display.controller_mut().interface_mut().clear();

        let area = Rectangle::new(Point::new(16, 32), Size::new(8, 8));
        area.into_styled(PrimitiveStyle::with_fill(Color::Black))
            .draw(&mut display)
            .unwrap();
        display.flush_region(area.into(), &mut delay).unwrap();

        let interface = display.controller().interface();
        assert_eq!(interface.data_for(SET_RAM_X_RANGE), vec![&[0x02, 0x02][..]]);
        assert_eq!(interface.bytes_for(WRITE_RAM_BW), vec![0x00; 8]);
    }

    #[test]
    fn test_framebuffer_target() {
        let size = crate::geometry::Size::new(16, 16);
        let storage = vec![0u8; Framebuffer::<Vec<u8>>::required_len(size)];
        let mut fb = Framebuffer::new(storage, size).unwrap();
        DrawTarget::clear(&mut fb, Color::White).unwrap();
        Pixel(Point::new(3, 9), Color::Black).draw(&mut fb).unwrap();

        assert_eq!(OriginDimensions::size(&fb), Size::new(16, 16));
        assert_eq!(fb.pixel(3, 9), Some(Color::Black));
        // Column 3, second byte row, bit 1
        assert_eq!(fb.as_bytes()[16 + 3], 0xFD);
    }

    #[test]
    fn test_rect_conversions() {
        let rectangle = Rectangle::new(Point::new(-2, 3), Size::new(10, 5));
        let rect = Rect::from(rectangle);
        assert_eq!(rect, Rect::new(-2, 3, 8, 8));
        assert_eq!(Rectangle::from(rect), rectangle);
    }
}
