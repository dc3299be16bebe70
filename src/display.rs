//! Device façade
//!
//! [`Display`] owns the [`Controller`], a [`Framebuffer`] in logical
//! orientation and the panel [`Geometry`]. Drawing blits into the
//! framebuffer and pushes only the touched RAM window to the panel.
//!
//! ## Example
//!
//! ```rust,no_run
//! use device_drivers::display::{Display, Drawer};
//! use device_drivers::framebuffer::GrayImage;
//! use device_drivers::geometry::{Point, Rect, Size};
//! use device_drivers::{Builder, Color, Interface, UpdateMode};
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
//! let config = match Builder::new().build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! let buffer = vec![0u8; config.buffer_len()];
//! let mut display = match Display::new(interface, config, buffer) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//!
//! let _ = display.reset(&mut delay);
//! let _ = display.init(&mut delay);
//! let _ = display.clear(Color::White, &mut delay);
//!
//! let icon = [0x00u8; 16 * 16];
//! if let Ok(icon) = GrayImage::new(&icon, Size::new(16, 16)) {
//!     let _ = display.set_update_mode(UpdateMode::Partial, &mut delay);
//!     let _ = display.draw(Rect::new(8, 8, 24, 24), &icon, Point::new(0, 0), &mut delay);
//! }
//! let _ = display.halt(&mut delay);
//! ```

use embedded_hal::delay::DelayNs;

use crate::color::{Color, ColorModel};
use crate::config::Config;
use crate::controller::{Controller, RamPlane, State};
use crate::error::Error;
use crate::framebuffer::{Framebuffer, ImageSource};
use crate::geometry::{Geometry, Point, Rect};
use crate::interface::DisplayInterface;
use crate::transfer::send_image;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Refresh mode for display updates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Full refresh: every pixel is driven, no ghosting, slow and flashy
    #[default]
    Full,
    /// Partial refresh: only changed pixels are driven, fast but ghosts
    /// accumulate until the next full refresh
    Partial,
}

/// Raster drawing capability
///
/// Shared by every panel so callers can treat them alike.
pub trait Drawer {
    /// Error returned by drawing operations
    type Error;

    /// Logical drawing area
    fn bounds(&self) -> Rect;

    /// Colors the panel can show
    fn color_model(&self) -> ColorModel;

    /// Copy `src` into `dst` and show it
    ///
    /// The pixel drawn at `(x, y)` is read from `src_point + (x, y) - dst.min()`.
    /// `dst` is clipped to [`bounds`](Self::bounds); nothing is sent when the
    /// clipped area is empty.
    fn draw<S, D>(
        &mut self,
        dst: Rect,
        src: &S,
        src_point: Point,
        delay: &mut D,
    ) -> Result<(), Self::Error>
    where
        S: ImageSource + ?Sized,
        D: DelayNs;

    /// Leave the panel blank and powered down
    fn halt<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;
}

/// 2.13" e-paper display
pub struct Display<I, B>
where
    I: DisplayInterface,
{
    /// Command sequencer
    controller: Controller<I>,
    /// Pixels in logical orientation, padded to the RAM layout
    framebuffer: Framebuffer<B>,
    /// Orientation mapping
    geometry: Geometry,
    /// Mode used by draws and flushes
    mode: UpdateMode,
    /// Mode whose registers and LUT are loaded
    configured: Option<UpdateMode>,
}

impl<I, B> Display<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a display using `buffer` as framebuffer storage
    ///
    /// # Errors
    ///
    /// - `Error::InvalidDimensions` if the configured size exceeds the controller
    /// - `Error::BufferTooSmall` if `buffer` is shorter than [`Config::buffer_len`]
    pub fn new(interface: I, config: Config, buffer: B) -> Result<Self, Error<I>> {
        let controller = Controller::new(interface, config.model, config.dimensions)?;
        let geometry = config.geometry();
        let framebuffer = Framebuffer::new(buffer, geometry.buffer_size())?;

        Ok(Self {
            controller,
            framebuffer,
            geometry,
            mode: config.update_mode,
            configured: None,
        })
    }

    /// Hardware and software reset
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.configured = None;
        self.controller.reset(delay)
    }

    /// Standard init, then load the current update mode
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.controller.init(delay)?;
        self.ensure_mode(self.mode, delay)
    }

    /// Fast init (v4 only)
    ///
    /// The fast waveform stands in for the full-mode LUT, so no LUT is
    /// written until the mode changes to partial.
    pub fn init_fast<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.controller.init_fast(delay)?;
        self.configured = Some(UpdateMode::Full);
        Ok(())
    }

    /// Enter deep sleep; [`reset`](Self::reset) and an init wake the panel
    pub fn sleep<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.controller.sleep(delay)
    }

    /// Fill the framebuffer and the whole panel with `color`
    ///
    /// Writes the black/white plane (and on v4 the base plane) row by row,
    /// then runs a full refresh.
    pub fn clear<D: DelayNs>(&mut self, color: Color, delay: &mut D) -> DisplayResult<I> {
        self.ensure_mode(UpdateMode::Full, delay)?;
        self.framebuffer.fill(color);

        let row = [color.fill_byte(); crate::transfer::MAX_ROW_BYTES];
        let row_bytes = self.controller.dimensions().row_bytes();
        let rows = self.controller.dimensions().rows;

        let mut planes = [Some(RamPlane::BlackWhite), None];
        if self.controller.model().writes_base_plane() {
            planes[1] = Some(RamPlane::Base);
        }
        let window = self.controller.memory_rect();
        for plane in planes.into_iter().flatten() {
            self.controller.set_window(window)?;
            self.controller.write_ram(plane)?;
            for _ in 0..rows {
                self.controller.write_data(&row[..row_bytes])?;
            }
        }

        self.controller.update_display(UpdateMode::Full, delay)
    }

    /// Select the update mode used by later draws
    ///
    /// Loads the mode's registers right away if the controller is ready,
    /// otherwise on the next draw.
    pub fn set_update_mode<D: DelayNs>(
        &mut self,
        mode: UpdateMode,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.mode = mode;
        if self.controller.state() == State::Ready {
            self.ensure_mode(mode, delay)?;
        }
        Ok(())
    }

    /// Current update mode
    pub fn update_mode(&self) -> UpdateMode {
        self.mode
    }

    /// Push the whole framebuffer and refresh
    pub fn flush<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.flush_region(self.geometry.bounds(), delay)
    }

    /// Push one logical region of the framebuffer and refresh
    pub fn flush_region<D: DelayNs>(&mut self, region: Rect, delay: &mut D) -> DisplayResult<I> {
        let spec = self.geometry.draw_spec(region);
        if spec.is_empty() {
            return Ok(());
        }
        self.ensure_mode(self.mode, delay)?;

        send_image(
            &mut self.controller,
            &self.geometry,
            &spec,
            &self.framebuffer,
            RamPlane::BlackWhite,
        )?;
        if self.mode == UpdateMode::Full && self.controller.model().writes_base_plane() {
            send_image(
                &mut self.controller,
                &self.geometry,
                &spec,
                &self.framebuffer,
                RamPlane::Base,
            )?;
        }

        self.controller.update_display(self.mode, delay)
    }

    /// Set one logical pixel in the framebuffer without touching the panel
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.geometry.bounds().contains(x, y) {
            let offset = self.geometry.buffer_offset();
            self.framebuffer.set_pixel(x + offset.x, y + offset.y, color);
        }
    }

    /// Logical pixel from the framebuffer
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.geometry.bounds().contains(x, y) {
            return None;
        }
        let offset = self.geometry.buffer_offset();
        self.framebuffer.pixel(x + offset.x, y + offset.y)
    }

    /// Panel geometry
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Framebuffer in buffer coordinates
    pub fn framebuffer(&self) -> &Framebuffer<B> {
        &self.framebuffer
    }

    /// Access the command sequencer
    pub fn controller(&self) -> &Controller<I> {
        &self.controller
    }

    /// Mutable access to the command sequencer
    pub fn controller_mut(&mut self) -> &mut Controller<I> {
        &mut self.controller
    }

    /// Give the interface and framebuffer storage back
    pub fn release(self) -> (I, B) {
        (self.controller.release(), self.framebuffer.release())
    }

    fn ensure_mode<D: DelayNs>(&mut self, mode: UpdateMode, delay: &mut D) -> DisplayResult<I> {
        if self.configured != Some(mode) {
            self.controller.configure_mode(mode, delay)?;
            self.configured = Some(mode);
        }
        Ok(())
    }
}

impl<I, B> Drawer for Display<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Error = Error<I>;

    fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    fn color_model(&self) -> ColorModel {
        ColorModel::Monochrome
    }

    fn draw<S, D>(
        &mut self,
        dst: Rect,
        src: &S,
        src_point: Point,
        delay: &mut D,
    ) -> Result<(), Self::Error>
    where
        S: ImageSource + ?Sized,
        D: DelayNs,
    {
        let dst = dst.canonical();
        let clipped = dst.intersect(&self.geometry.bounds());
        if clipped.is_empty() {
            return Ok(());
        }

        for y in clipped.min_y..clipped.max_y {
            let Some(sy) = source_coordinate(src_point.y, y, dst.min_y) else {
                continue;
            };
            for x in clipped.min_x..clipped.max_x {
                let Some(sx) = source_coordinate(src_point.x, x, dst.min_x) else {
                    continue;
                };
                if let Some(color) = src.color_at(sx, sy) {
                    self.set_pixel(x, y, color);
                }
            }
        }

        self.flush_region(clipped, delay)
    }

    fn halt<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        self.clear(Color::White, delay)?;
        self.sleep(delay)
    }
}

/// Source coordinate for destination `at` of a draw starting at `origin`
///
/// `None` when it falls outside `i32`; such pixels cannot exist in any source.
fn source_coordinate(src: i32, at: i32, origin: i32) -> Option<i32> {
    i32::try_from(i64::from(src) + i64::from(at) - i64::from(origin)).ok()
}
