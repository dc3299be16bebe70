//! Controller command sequencer
//!
//! [`Controller`] drives the SSD1680 through its life cycle and refuses
//! commands that make no sense in the current [`State`]:
//!
//! ```text
//! Uninitialized -> Resetting -> ConfiguringWindow -> AwaitingUpload (v3) -> Ready
//! Ready -> Updating -> Ready
//! Ready -> Sleeping
//! ```
//!
//! A failed sequence leaves the controller in the state where it failed.
//! Only [`Controller::reset`] leaves such a state, and it is also the only
//! way out of [`State::Sleeping`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use device_drivers::controller::Controller;
//! use device_drivers::{Interface, Model, PANEL_2IN13, UpdateMode};
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
//! let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! # fn build<I: device_drivers::DisplayInterface>(
//! #     interface: I,
//! # ) -> Result<Controller<I>, device_drivers::Error<I>> {
//! let controller = Controller::new(interface, Model::V3, PANEL_2IN13)?;
//! # Ok(controller)
//! # }
//! # let Ok(mut controller) = build(interface) else { return };
//!
//! # fn run<I: device_drivers::DisplayInterface, D: DelayNs>(
//! #     controller: &mut Controller<I>,
//! #     delay: &mut D,
//! # ) -> Result<(), device_drivers::Error<I>> {
//! controller.reset(delay)?;
//! controller.init(delay)?;
//! controller.configure_mode(UpdateMode::Full, delay)?;
//! controller.update_display(UpdateMode::Full, delay)?;
//! controller.sleep(delay)?;
//! # Ok(())
//! # }
//! # let _ = run(&mut controller, &mut delay);
//! ```

use embedded_hal::delay::DelayNs;

use crate::command::{
    BORDER_WAVEFORM, CTRL2_LOAD_LUT, CTRL2_LOAD_TEMPERATURE, CTRL2_POWER_ON,
    DATA_ENTRY_MODE, DATA_ENTRY_XY_INCREMENT, DEEP_SLEEP, DEEP_SLEEP_RETAIN_RAM,
    DISPLAY_UPDATE_CTRL1, DISPLAY_UPDATE_CTRL2, DRIVER_OUTPUT_CONTROL, END_OPTION, GATE_VOLTAGE,
    MASTER_ACTIVATION, SET_RAM_X_COUNTER, SET_RAM_X_RANGE, SET_RAM_Y_COUNTER, SET_RAM_Y_RANGE,
    SOFT_RESET, SOURCE_VOLTAGE, TEMP_SENSOR_CONTROL, WRITE_DISPLAY_OPTION, WRITE_LUT,
    WRITE_RAM_BW, WRITE_RAM_RED, WRITE_TEMP, WRITE_VCOM,
};
use crate::config::{Dimensions, Model};
use crate::display::UpdateMode;
use crate::error::Error;
use crate::geometry::{BYTE_ALIGN, Rect};
use crate::interface::DisplayInterface;
use crate::lut::{
    LUT_FULL_UPDATE, LUT_PARTIAL_UPDATE, MODE_LUT_SIZE, WAVEFORM_LUT_SIZE, WAVEFORM_SIZE,
};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Internal temperature sensor selection
const TEMP_SENSOR_INTERNAL: u8 = 0x80;

/// Border waveform used during init (follow LUT1)
const BORDER_INIT: u8 = 0x05;

/// Display update control 1: normal RAM content, source S8..S167
const UPDATE_CTRL1_INIT: [u8; 2] = [0x00, 0x80];

/// Temperature written by fast init (100°C selects the short waveform)
const FAST_INIT_TEMPERATURE: [u8; 2] = [0x64, 0x00];

/// VCOM and border settings per update mode
const FULL_VCOM: u8 = 0x55;
const FULL_BORDER: u8 = 0x03;
const PARTIAL_VCOM: u8 = 0x24;
const PARTIAL_BORDER: u8 = 0x01;

/// Display option register for partial mode (ping-pong off, mode 2 on)
const PARTIAL_DISPLAY_OPTION: [u8; 7] = [0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00];

/// Settling time after entering deep sleep
const SLEEP_SETTLE_MS: u32 = 100;

/// Controller life-cycle state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// Never reset
    #[default]
    Uninitialized,
    /// Hardware/software reset in progress
    Resetting,
    /// Reset done, waiting for an init sequence
    ConfiguringWindow,
    /// Registers set, waveform upload in progress
    AwaitingUpload,
    /// Accepting RAM writes and updates
    Ready,
    /// Display update in progress
    Updating,
    /// Deep sleep, only a reset wakes the panel
    Sleeping,
}

/// Controller RAM plane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RamPlane {
    /// Black/white plane, shown by the next update
    BlackWhite,
    /// Red plane; the base image partial updates compare against
    Base,
}

impl RamPlane {
    /// Write command for this plane
    pub fn command(self) -> u8 {
        match self {
            Self::BlackWhite => WRITE_RAM_BW,
            Self::Base => WRITE_RAM_RED,
        }
    }
}

/// SSD1680 command sequencer
pub struct Controller<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Panel revision
    model: Model,
    /// Native panel dimensions
    dimensions: Dimensions,
    /// Current life-cycle state
    state: State,
    /// Whether the last init was the fast one
    fast_init: bool,
}

impl<I> Controller<I>
where
    I: DisplayInterface,
{
    /// Create a controller; nothing is sent until [`reset`](Self::reset)
    ///
    /// # Errors
    ///
    /// `Error::InvalidDimensions` if `dimensions` would not pass
    /// [`Dimensions::new`].
    pub fn new(interface: I, model: Model, dimensions: Dimensions) -> Result<Self, Error<I>> {
        let Dimensions { rows, cols } = dimensions;
        let dimensions =
            Dimensions::new(rows, cols).map_err(|_| Error::InvalidDimensions { rows, cols })?;
        Ok(Self {
            interface,
            model,
            dimensions,
            state: State::Uninitialized,
            fast_init: false,
        })
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Panel revision
    pub fn model(&self) -> Model {
        self.model
    }

    /// Native panel dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// True if the controller was brought up with [`init_fast`](Self::init_fast)
    pub fn is_fast_init(&self) -> bool {
        self.fast_init
    }

    /// Access the hardware interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Mutable access to the hardware interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Give the hardware interface back
    pub fn release(self) -> I {
        self.interface
    }

    /// Full RAM extent in pixels, X padded to whole bytes
    pub fn memory_rect(&self) -> Rect {
        Rect::new(
            0,
            0,
            (self.dimensions.row_bytes() * BYTE_ALIGN as usize) as i32,
            i32::from(self.dimensions.rows),
        )
    }

    /// Hardware reset followed by a software reset
    ///
    /// Valid in any state. Leaves the controller waiting for an init sequence.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.transition(State::Resetting);
        self.fast_init = false;
        self.interface.reset(delay).map_err(Error::Interface)?;
        self.busy_wait(delay)?;
        self.send_command(SOFT_RESET)?;
        self.busy_wait(delay)?;
        self.transition(State::ConfiguringWindow);
        Ok(())
    }

    /// Standard init sequence
    ///
    /// On v3 the host waveform is uploaded, v4 keeps its OTP waveform.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.require(State::ConfiguringWindow)?;

        let last_gate = self.dimensions.rows - 1;
        self.send_command(DRIVER_OUTPUT_CONTROL)?;
        self.send_data(&[(last_gate & 0xFF) as u8, (last_gate >> 8) as u8, 0x00])?;

        self.send_command(DATA_ENTRY_MODE)?;
        self.send_data(&[DATA_ENTRY_XY_INCREMENT])?;

        self.program_window(self.memory_rect())?;

        self.send_command(BORDER_WAVEFORM)?;
        self.send_data(&[BORDER_INIT])?;

        self.send_command(DISPLAY_UPDATE_CTRL1)?;
        self.send_data(&UPDATE_CTRL1_INIT)?;

        self.send_command(TEMP_SENSOR_CONTROL)?;
        self.send_data(&[TEMP_SENSOR_INTERNAL])?;
        self.busy_wait(delay)?;

        if let Some(waveform) = self.model.waveform() {
            self.transition(State::AwaitingUpload);
            self.upload_waveform(waveform, delay)?;
        }

        self.fast_init = false;
        self.transition(State::Ready);
        Ok(())
    }

    /// Fast init sequence (v4 only)
    ///
    /// Loads the short waveform by writing a fixed temperature. Updates after
    /// a fast init use [`CTRL2_FAST_FULL`](crate::command::CTRL2_FAST_FULL).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on v3 panels.
    pub fn init_fast<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if !self.model.supports_fast_init() {
            return Err(Error::Unsupported);
        }
        self.require(State::ConfiguringWindow)?;

        self.send_command(TEMP_SENSOR_CONTROL)?;
        self.send_data(&[TEMP_SENSOR_INTERNAL])?;

        self.send_command(DATA_ENTRY_MODE)?;
        self.send_data(&[DATA_ENTRY_XY_INCREMENT])?;

        self.program_window(self.memory_rect())?;

        self.activate(CTRL2_LOAD_TEMPERATURE, delay)?;

        self.send_command(WRITE_TEMP)?;
        self.send_data(&FAST_INIT_TEMPERATURE)?;
        self.activate(CTRL2_LOAD_LUT, delay)?;

        self.fast_init = true;
        self.transition(State::Ready);
        Ok(())
    }

    /// Load the registers and waveform for `mode`
    pub fn configure_mode<D: DelayNs>(
        &mut self,
        mode: UpdateMode,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.require(State::Ready)?;
        log::debug!("configuring {:?} update mode", mode);

        match mode {
            UpdateMode::Full => {
                self.send_command(WRITE_VCOM)?;
                self.send_data(&[FULL_VCOM])?;
                self.send_command(BORDER_WAVEFORM)?;
                self.send_data(&[FULL_BORDER])?;
                self.load_mode_lut(&LUT_FULL_UPDATE)
            }
            UpdateMode::Partial => {
                self.send_command(WRITE_VCOM)?;
                self.send_data(&[PARTIAL_VCOM])?;
                self.send_command(WRITE_DISPLAY_OPTION)?;
                self.send_data(&PARTIAL_DISPLAY_OPTION)?;
                self.send_command(BORDER_WAVEFORM)?;
                self.send_data(&[PARTIAL_BORDER])?;
                self.activate(CTRL2_POWER_ON, delay)?;
                self.load_mode_lut(&LUT_PARTIAL_UPDATE)
            }
        }
    }

    /// Write a 70 byte mode LUT to the LUT register
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidLutLength` if the LUT is not exactly 70 bytes.
    pub fn load_mode_lut(&mut self, lut: &[u8]) -> DisplayResult<I> {
        self.require(State::Ready)?;
        if lut.len() != MODE_LUT_SIZE {
            return Err(Error::InvalidLutLength {
                expected: MODE_LUT_SIZE,
                provided: lut.len(),
            });
        }
        self.send_command(WRITE_LUT)?;
        self.send_data(lut)
    }

    /// Program the RAM window and cursor for a byte-aligned RAM rectangle
    ///
    /// The rectangle is clipped to the RAM extent; an empty one sends nothing.
    pub fn set_window(&mut self, mem_rect: Rect) -> DisplayResult<I> {
        self.require(State::Ready)?;
        self.program_window(mem_rect)
    }

    /// Start writing to a RAM plane; data follows with [`write_data`](Self::write_data)
    pub fn write_ram(&mut self, plane: RamPlane) -> DisplayResult<I> {
        self.require(State::Ready)?;
        self.send_command(plane.command())
    }

    /// Stream bytes into the plane selected by [`write_ram`](Self::write_ram)
    pub fn write_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.require(State::Ready)?;
        self.send_data(data)
    }

    /// Show RAM contents on the panel
    pub fn update_display<D: DelayNs>(
        &mut self,
        mode: UpdateMode,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.require(State::Ready)?;
        let control = self.model.update_control(mode, self.fast_init);
        self.transition(State::Updating);
        self.activate(control, delay)?;
        self.transition(State::Ready);
        Ok(())
    }

    /// Enter deep sleep, keeping RAM contents
    pub fn sleep<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.require(State::Ready)?;
        self.send_command(DEEP_SLEEP)?;
        self.send_data(&[DEEP_SLEEP_RETAIN_RAM])?;
        delay.delay_ms(SLEEP_SETTLE_MS);
        self.transition(State::Sleeping);
        Ok(())
    }

    fn upload_waveform<D: DelayNs>(
        &mut self,
        waveform: &[u8; WAVEFORM_SIZE],
        delay: &mut D,
    ) -> DisplayResult<I> {
        let (lut, voltages) = waveform.split_at(WAVEFORM_LUT_SIZE);

        self.send_command(WRITE_LUT)?;
        self.send_data(lut)?;
        self.busy_wait(delay)?;

        self.send_command(END_OPTION)?;
        self.send_data(&voltages[0..1])?;
        self.send_command(GATE_VOLTAGE)?;
        self.send_data(&voltages[1..2])?;
        self.send_command(SOURCE_VOLTAGE)?;
        self.send_data(&voltages[2..5])?;
        self.send_command(WRITE_VCOM)?;
        self.send_data(&voltages[5..6])
    }

    fn program_window(&mut self, mem_rect: Rect) -> DisplayResult<I> {
        let rect = mem_rect.byte_aligned().intersect(&self.memory_rect());
        if rect.is_empty() {
            return Ok(());
        }
        log::trace!("RAM window {:?}", rect);

        let x_start = (rect.min_x / BYTE_ALIGN) as u8;
        let x_end = ((rect.max_x - 1) / BYTE_ALIGN) as u8;
        let y_start = rect.min_y as u16;
        let y_end = (rect.max_y - 1) as u16;

        self.send_command(SET_RAM_X_RANGE)?;
        self.send_data(&[x_start, x_end])?;

        self.send_command(SET_RAM_Y_RANGE)?;
        self.send_data(&[
            (y_start & 0xFF) as u8,
            (y_start >> 8) as u8,
            (y_end & 0xFF) as u8,
            (y_end >> 8) as u8,
        ])?;

        self.send_command(SET_RAM_X_COUNTER)?;
        self.send_data(&[x_start])?;

        self.send_command(SET_RAM_Y_COUNTER)?;
        self.send_data(&[(y_start & 0xFF) as u8, (y_start >> 8) as u8])
    }

    /// Select an update sequence and run it to completion
    fn activate<D: DelayNs>(&mut self, control: u8, delay: &mut D) -> DisplayResult<I> {
        self.send_command(DISPLAY_UPDATE_CTRL2)?;
        self.send_data(&[control])?;
        self.send_command(MASTER_ACTIVATION)?;
        self.busy_wait(delay)
    }

    fn require(&self, expected: State) -> DisplayResult<I> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    fn transition(&mut self, next: State) {
        if self.state != next {
            log::debug!("controller {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface.busy_wait(delay).map_err(Error::Interface)
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    /// Send data to the display controller
    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }
}
