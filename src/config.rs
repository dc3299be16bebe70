//! Display configuration types and builder

use crate::command::{
    CTRL2_FAST_FULL, CTRL2_FULL, CTRL2_PARTIAL_V3, CTRL2_PARTIAL_V4, CTRL2_V4_FULL,
};
use crate::display::UpdateMode;
pub use crate::error::{BuilderError, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS};
use crate::framebuffer::Framebuffer;
use crate::geometry::{Geometry, Orientation, Size};
use crate::lut::{WAVEFORM_2IN13_V3, WAVEFORM_SIZE};

/// Native size of the 2.13" panels: 122 sources × 250 gates
pub const PANEL_2IN13: Dimensions = Dimensions {
    rows: 250,
    cols: 122,
};

/// Display dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    /// Number of rows (height in pixels, corresponds to gate outputs)
    pub rows: u16,
    /// Number of columns (width in pixels, corresponds to source outputs)
    pub cols: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// Columns need not be a multiple of 8; RAM rows are padded to whole
    /// bytes.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - rows is 0 or > MAX_GATE_OUTPUTS
    /// - cols is 0 or > MAX_SOURCE_OUTPUTS
    pub fn new(rows: u16, cols: u16) -> Result<Self, BuilderError> {
        if rows == 0 || rows > MAX_GATE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        if cols == 0 || cols > MAX_SOURCE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Bytes per RAM row
    pub fn row_bytes(&self) -> usize {
        (self.cols as usize).div_ceil(8)
    }

    /// Bytes in one full RAM plane
    pub fn plane_size(&self) -> usize {
        self.row_bytes() * self.rows as usize
    }

    /// Native size (width = columns, height = rows)
    pub fn size(&self) -> Size {
        Size::new(u32::from(self.cols), u32::from(self.rows))
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        PANEL_2IN13
    }
}

/// Panel revision
///
/// The revisions share the controller but differ in where the waveform comes
/// from and in the update sequences they use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Model {
    /// 2.13" v3: waveform uploaded by the host during init
    #[default]
    V3,
    /// 2.13" v4: waveform from OTP, supports fast init
    V4,
}

impl Model {
    /// Waveform bundle uploaded during init, `None` when the OTP one is used
    pub fn waveform(self) -> Option<&'static [u8; WAVEFORM_SIZE]> {
        match self {
            Self::V3 => Some(&WAVEFORM_2IN13_V3),
            Self::V4 => None,
        }
    }

    /// True if [`Controller::init_fast`](crate::controller::Controller::init_fast) is available
    pub fn supports_fast_init(self) -> bool {
        matches!(self, Self::V4)
    }

    /// Display update control 2 value for an update in `mode`
    ///
    /// `fast` tells whether the controller went through fast init.
    pub fn update_control(self, mode: UpdateMode, fast: bool) -> u8 {
        match (self, mode) {
            (Self::V3, UpdateMode::Full) => CTRL2_FULL,
            (Self::V3, UpdateMode::Partial) => CTRL2_PARTIAL_V3,
            (Self::V4, UpdateMode::Full) if fast => CTRL2_FAST_FULL,
            (Self::V4, UpdateMode::Full) => CTRL2_V4_FULL,
            (Self::V4, UpdateMode::Partial) => CTRL2_PARTIAL_V4,
        }
    }

    /// True if a full clear also writes the base (red) plane
    pub fn writes_base_plane(self) -> bool {
        matches!(self, Self::V4)
    }
}

/// Display configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Native panel dimensions
    pub dimensions: Dimensions,
    /// Panel revision
    pub model: Model,
    /// Mounting orientation
    pub orientation: Orientation,
    /// Update mode configured right after init
    pub update_mode: UpdateMode,
}

impl Config {
    /// Geometry of the panel in its mounting orientation
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.dimensions.size(), self.orientation)
    }

    /// Bytes of framebuffer storage a [`Display`](crate::Display) needs
    pub fn buffer_len(&self) -> usize {
        Framebuffer::<&mut [u8]>::required_len(self.geometry().buffer_size())
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust
/// use device_drivers::geometry::Orientation;
/// use device_drivers::{Builder, Model};
///
/// let config = match Builder::new()
///     .model(Model::V4)
///     .orientation(Orientation::TopRight)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.geometry().device_size().width, 250);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    /// Native panel dimensions, the 2.13" size when unset
    dimensions: Option<Dimensions>,
    /// Panel revision
    model: Model,
    /// Mounting orientation
    orientation: Orientation,
    /// Update mode configured right after init
    update_mode: UpdateMode,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set panel dimensions
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set panel revision
    pub fn model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Set mounting orientation
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the update mode used after init
    pub fn update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if dimensions set directly on
    /// the struct fields exceed the controller limits.
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.unwrap_or_default();
        let dimensions = Dimensions::new(dimensions.rows, dimensions.cols)?;
        Ok(Config {
            dimensions,
            model: self.model,
            orientation: self.orientation,
            update_mode: self.update_mode,
        })
    }
}
