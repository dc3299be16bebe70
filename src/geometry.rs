//! Rectangle math and orientation mapping
//!
//! The panel's RAM is always addressed in its native layout: `x` runs along
//! the source outputs in 8-pixel bytes, `y` along the gates. Callers draw in
//! *logical* coordinates, which depend on the mounting [`Orientation`]:
//!
//! | Orientation | Logical size | Buffer → memory                  |
//! |-------------|--------------|----------------------------------|
//! | TopLeft     | W × H        | `(bx, by)`                       |
//! | TopRight    | H × W        | `(By-1-by, bx)`                  |
//! | BottomRight | W × H        | `(Bx-1-bx, By-1-by)`             |
//! | BottomLeft  | H × W        | `(by, Bx-1-bx)`                  |
//!
//! `Bx`/`By` is the framebuffer size. The framebuffer is allocated with the
//! native width rounded up to a whole byte, so for corners away from the
//! origin the logical area sits at an offset inside it.
//!
//! Everything here is pure.
//!
//! ```
//! use device_drivers::geometry::{Geometry, Orientation, Rect, Size};
//!
//! let geometry = Geometry::new(Size::new(122, 250), Orientation::TopRight);
//! assert_eq!(geometry.bounds(), Rect::new(0, 0, 250, 122));
//!
//! let spec = geometry.draw_spec(geometry.bounds());
//! assert_eq!(spec.mem_rect, Rect::new(0, 0, 128, 250));
//! ```

/// Pixel alignment of the RAM X address
pub const BYTE_ALIGN: i32 = 8;

/// Point in pixel coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    /// Horizontal coordinate
    pub x: i32,
    /// Vertical coordinate
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Size in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width and height exchanged
    pub const fn swapped(self) -> Self {
        Self::new(self.height, self.width)
    }
}

/// Half-open rectangle: `min` is inclusive, `max` exclusive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// Left edge (inclusive)
    pub min_x: i32,
    /// Top edge (inclusive)
    pub min_y: i32,
    /// Right edge (exclusive)
    pub max_x: i32,
    /// Bottom edge (exclusive)
    pub max_y: i32,
}

impl Rect {
    /// Create a rectangle from its edges
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Rectangle of `size` with its top-left corner at `origin`
    pub const fn with_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x.saturating_add(size.width as i32),
            origin.y.saturating_add(size.height as i32),
        )
    }

    /// Rectangle covering `size` from the origin
    pub const fn from_size(size: Size) -> Self {
        Self::with_size(Point::new(0, 0), size)
    }

    /// Top-left corner
    pub const fn min(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Width, zero for empty or inverted rectangles
    pub fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x).max(0) as u32
    }

    /// Height, zero for empty or inverted rectangles
    pub fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y).max(0) as u32
    }

    /// Size of the rectangle
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// True if the rectangle covers no pixel
    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    /// True if the pixel at `(x, y)` lies inside
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    /// Order the edges so that `min <= max` on both axes
    pub fn canonical(&self) -> Self {
        Self::new(
            self.min_x.min(self.max_x),
            self.min_y.min(self.max_y),
            self.min_x.max(self.max_x),
            self.min_y.max(self.max_y),
        )
    }

    /// Overlap of two rectangles, possibly empty
    pub fn intersect(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        )
    }

    /// Rectangle moved by `offset`
    pub fn translate(&self, offset: Point) -> Self {
        Self::new(
            self.min_x.saturating_add(offset.x),
            self.min_y.saturating_add(offset.y),
            self.max_x.saturating_add(offset.x),
            self.max_y.saturating_add(offset.y),
        )
    }

    /// X range widened to whole bytes (floor start, ceil end)
    pub fn byte_aligned(&self) -> Self {
        Self::new(
            align_down(self.min_x),
            self.min_y,
            align_up(self.max_x),
            self.max_y,
        )
    }
}

fn align_down(value: i32) -> i32 {
    value.div_euclid(BYTE_ALIGN) * BYTE_ALIGN
}

fn align_up(value: i32) -> i32 {
    align_down(value.saturating_add(BYTE_ALIGN - 1))
}

/// Physical corner of the panel that holds logical pixel (0, 0)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Native orientation
    #[default]
    TopLeft,
    /// Rotated 90 degrees clockwise
    TopRight,
    /// Rotated 180 degrees
    BottomRight,
    /// Rotated 270 degrees clockwise
    BottomLeft,
}

impl Orientation {
    /// True if logical width and height are swapped against the panel
    pub fn is_rotated(self) -> bool {
        matches!(self, Self::TopRight | Self::BottomLeft)
    }
}

/// Everything needed to move one drawn region from the framebuffer to RAM
///
/// Produced by [`draw_spec`]. An empty request gives `DrawSpec::default()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawSpec {
    /// Offset of the logical area inside the framebuffer
    pub buffer_dst_offset: Point,
    /// Drawn region in framebuffer coordinates
    pub buffer_dst_rect: Rect,
    /// Drawn region in RAM coordinates
    pub mem_dst_rect: Rect,
    /// `mem_dst_rect` widened to whole bytes on the X axis
    pub mem_rect: Rect,
}

impl DrawSpec {
    /// True if there is nothing to transfer
    pub fn is_empty(&self) -> bool {
        self.mem_rect.is_empty()
    }
}

/// Offset of the logical area inside a framebuffer of size `buffer`
pub fn buffer_offset(device: Size, orientation: Orientation, buffer: Size) -> Point {
    let dx = buffer.width.saturating_sub(device.width) as i32;
    let dy = buffer.height.saturating_sub(device.height) as i32;
    match orientation {
        Orientation::TopLeft => Point::new(0, 0),
        Orientation::TopRight => Point::new(0, dy),
        Orientation::BottomRight => Point::new(dx, dy),
        Orientation::BottomLeft => Point::new(dx, 0),
    }
}

/// Map a framebuffer pixel to its RAM position
pub fn buffer_to_memory(orientation: Orientation, buffer: Size, point: Point) -> Point {
    let (bw, bh) = (buffer.width as i32, buffer.height as i32);
    let Point { x, y } = point;
    match orientation {
        Orientation::TopLeft => Point::new(x, y),
        Orientation::TopRight => Point::new(bh - 1 - y, x),
        Orientation::BottomRight => Point::new(bw - 1 - x, bh - 1 - y),
        Orientation::BottomLeft => Point::new(y, bw - 1 - x),
    }
}

/// Map a RAM position back to the framebuffer pixel it shows
pub fn memory_to_buffer(orientation: Orientation, buffer: Size, point: Point) -> Point {
    let (bw, bh) = (buffer.width as i32, buffer.height as i32);
    let Point { x, y } = point;
    match orientation {
        Orientation::TopLeft => Point::new(x, y),
        Orientation::TopRight => Point::new(y, bh - 1 - x),
        Orientation::BottomRight => Point::new(bw - 1 - x, bh - 1 - y),
        Orientation::BottomLeft => Point::new(bw - 1 - y, x),
    }
}

/// Map a framebuffer rectangle to RAM coordinates
pub fn buffer_rect_to_memory(orientation: Orientation, buffer: Size, rect: Rect) -> Rect {
    let (bw, bh) = (buffer.width as i32, buffer.height as i32);
    let Rect {
        min_x: x0,
        min_y: y0,
        max_x: x1,
        max_y: y1,
    } = rect;
    match orientation {
        Orientation::TopLeft => rect,
        Orientation::TopRight => Rect::new(bh - y1, x0, bh - y0, x1),
        Orientation::BottomRight => Rect::new(bw - x1, bh - y1, bw - x0, bh - y0),
        Orientation::BottomLeft => Rect::new(y0, bw - x1, y1, bw - x0),
    }
}

/// Compute the drawing specification for `dst`
///
/// `device` is the logical size seen by callers, `buffer` the framebuffer
/// size. `dst` is canonicalised and clipped to the logical area first.
pub fn draw_spec(device: Size, orientation: Orientation, buffer: Size, dst: Rect) -> DrawSpec {
    let clipped = dst.canonical().intersect(&Rect::from_size(device));
    if clipped.is_empty() {
        return DrawSpec::default();
    }

    let buffer_dst_offset = buffer_offset(device, orientation, buffer);
    let buffer_dst_rect = clipped
        .translate(buffer_dst_offset)
        .intersect(&Rect::from_size(buffer));
    let mem_dst_rect = buffer_rect_to_memory(orientation, buffer, buffer_dst_rect);

    DrawSpec {
        buffer_dst_offset,
        buffer_dst_rect,
        mem_dst_rect,
        mem_rect: mem_dst_rect.byte_aligned(),
    }
}

/// Panel geometry for one mounting orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    native: Size,
    orientation: Orientation,
}

impl Geometry {
    /// Create the geometry of a panel with `native` size (sources × gates)
    pub const fn new(native: Size, orientation: Orientation) -> Self {
        Self {
            native,
            orientation,
        }
    }

    /// Mounting orientation
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Native panel size in pixels
    pub fn native_size(&self) -> Size {
        self.native
    }

    /// Logical size seen by callers
    pub fn device_size(&self) -> Size {
        if self.orientation.is_rotated() {
            self.native.swapped()
        } else {
            self.native
        }
    }

    /// Logical drawing bounds
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.device_size())
    }

    /// Size of the RAM area: native width rounded up to whole bytes
    pub fn memory_size(&self) -> Size {
        Size::new(align_up(self.native.width as i32) as u32, self.native.height)
    }

    /// Size of the framebuffer, in the logical axis order
    pub fn buffer_size(&self) -> Size {
        if self.orientation.is_rotated() {
            self.memory_size().swapped()
        } else {
            self.memory_size()
        }
    }

    /// Offset of the logical area inside the framebuffer
    pub fn buffer_offset(&self) -> Point {
        buffer_offset(self.device_size(), self.orientation, self.buffer_size())
    }

    /// Framebuffer pixel shown at RAM position `point`
    pub fn memory_to_buffer(&self, point: Point) -> Point {
        memory_to_buffer(self.orientation, self.buffer_size(), point)
    }

    /// RAM position of framebuffer pixel `point`
    pub fn buffer_to_memory(&self, point: Point) -> Point {
        buffer_to_memory(self.orientation, self.buffer_size(), point)
    }

    /// Framebuffer rectangle holding the logical area
    pub fn buffer_logical_rect(&self) -> Rect {
        self.bounds().translate(self.buffer_offset())
    }

    /// Drawing specification for a logical rectangle
    pub fn draw_spec(&self, dst: Rect) -> DrawSpec {
        draw_spec(
            self.device_size(),
            self.orientation,
            self.buffer_size(),
            dst,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIVE: Size = Size::new(122, 250);
    const ORIENTATIONS: [Orientation; 4] = [
        Orientation::TopLeft,
        Orientation::TopRight,
        Orientation::BottomRight,
        Orientation::BottomLeft,
    ];

    fn sample_rects() -> [Rect; 6] {
        [
            Rect::new(0, 0, 1, 1),
            Rect::new(3, 5, 17, 40),
            Rect::new(9, 9, 10, 200),
            Rect::new(100, 20, 121, 30),
            Rect::new(-20, -20, 30, 30),
            Rect::new(60, 60, 400, 400),
        ]
    }

    #[test]
    fn test_sizes() {
        let upright = Geometry::new(NATIVE, Orientation::TopLeft);
        assert_eq!(upright.device_size(), Size::new(122, 250));
        assert_eq!(upright.buffer_size(), Size::new(128, 250));
        assert_eq!(upright.memory_size(), Size::new(128, 250));

        let rotated = Geometry::new(NATIVE, Orientation::BottomLeft);
        assert_eq!(rotated.device_size(), Size::new(250, 122));
        assert_eq!(rotated.buffer_size(), Size::new(250, 128));
        assert_eq!(rotated.memory_size(), Size::new(128, 250));
    }

    #[test]
    fn test_buffer_offsets() {
        let offset = |o| Geometry::new(NATIVE, o).buffer_offset();
        assert_eq!(offset(Orientation::TopLeft), Point::new(0, 0));
        assert_eq!(offset(Orientation::TopRight), Point::new(0, 6));
        assert_eq!(offset(Orientation::BottomRight), Point::new(6, 0));
        assert_eq!(offset(Orientation::BottomLeft), Point::new(0, 0));
    }

    #[test]
    fn test_full_panel_covers_memory_in_every_orientation() {
        for orientation in ORIENTATIONS {
            let geometry = Geometry::new(NATIVE, orientation);
            let spec = geometry.draw_spec(geometry.bounds());
            assert_eq!(spec.mem_rect, Rect::new(0, 0, 128, 250), "{orientation:?}");
            assert_eq!(spec.mem_dst_rect, Rect::new(0, 0, 122, 250), "{orientation:?}");
        }
    }

    #[test]
    fn test_mem_rect_byte_aligned() {
        for orientation in ORIENTATIONS {
            let geometry = Geometry::new(NATIVE, orientation);
            for rect in sample_rects() {
                let spec = geometry.draw_spec(rect);
                assert_eq!(spec.mem_rect.min_x % BYTE_ALIGN, 0);
                assert_eq!(spec.mem_rect.width() % BYTE_ALIGN as u32, 0);
                assert_eq!(spec.mem_rect.min_y, spec.mem_dst_rect.min_y);
                assert_eq!(spec.mem_rect.max_y, spec.mem_dst_rect.max_y);
                assert!(spec.mem_rect.min_x <= spec.mem_dst_rect.min_x);
                assert!(spec.mem_rect.max_x >= spec.mem_dst_rect.max_x);
            }
        }
    }

    #[test]
    fn test_buffer_dst_rect_within_framebuffer() {
        for orientation in ORIENTATIONS {
            let geometry = Geometry::new(NATIVE, orientation);
            let buffer = Rect::from_size(geometry.buffer_size());
            let spec = geometry.draw_spec(Rect::new(-500, -500, 1000, 1000));
            assert_eq!(spec.buffer_dst_rect.intersect(&buffer), spec.buffer_dst_rect);
            assert_eq!(spec.buffer_dst_rect, geometry.buffer_logical_rect());
        }
    }

    #[test]
    fn test_empty_request() {
        let geometry = Geometry::new(NATIVE, Orientation::TopRight);
        assert_eq!(geometry.draw_spec(Rect::new(5, 5, 5, 50)), DrawSpec::default());
        assert_eq!(
            geometry.draw_spec(Rect::new(300, 0, 310, 10)),
            DrawSpec::default()
        );
        assert!(DrawSpec::default().is_empty());
    }

    #[test]
    fn test_inverted_request_is_canonicalised() {
        let geometry = Geometry::new(NATIVE, Orientation::TopLeft);
        assert_eq!(
            geometry.draw_spec(Rect::new(20, 30, 10, 5)),
            geometry.draw_spec(Rect::new(10, 5, 20, 30))
        );
    }

    #[test]
    fn test_idempotent() {
        let geometry = Geometry::new(NATIVE, Orientation::BottomRight);
        let rect = Rect::new(13, 7, 99, 180);
        assert_eq!(geometry.draw_spec(rect), geometry.draw_spec(rect));
    }

    #[test]
    fn test_top_right_mapping() {
        let geometry = Geometry::new(NATIVE, Orientation::TopRight);
        // Logical rows 0..10 are the last native source columns
        let spec = geometry.draw_spec(Rect::new(0, 0, 20, 10));
        assert_eq!(spec.buffer_dst_rect, Rect::new(0, 6, 20, 16));
        assert_eq!(spec.mem_dst_rect, Rect::new(112, 0, 122, 20));
        assert_eq!(spec.mem_rect, Rect::new(112, 0, 128, 20));
    }

    #[test]
    fn test_bottom_right_mapping() {
        let geometry = Geometry::new(NATIVE, Orientation::BottomRight);
        let spec = geometry.draw_spec(Rect::new(0, 0, 1, 1));
        assert_eq!(spec.mem_dst_rect, Rect::new(121, 249, 122, 250));
        assert_eq!(spec.mem_rect, Rect::new(120, 249, 128, 250));
    }

    #[test]
    fn test_point_mapping_inverts() {
        for orientation in ORIENTATIONS {
            let geometry = Geometry::new(NATIVE, orientation);
            let buffer = geometry.buffer_size();
            for point in [
                Point::new(0, 0),
                Point::new(buffer.width as i32 - 1, 0),
                Point::new(7, 33),
                Point::new(buffer.width as i32 - 1, buffer.height as i32 - 1),
            ] {
                let mem = geometry.buffer_to_memory(point);
                assert!(Rect::from_size(geometry.memory_size()).contains(mem.x, mem.y));
                assert_eq!(geometry.memory_to_buffer(mem), point, "{orientation:?}");
            }
        }
    }

    #[test]
    fn test_rect_mapping_matches_point_mapping() {
        for orientation in ORIENTATIONS {
            let geometry = Geometry::new(NATIVE, orientation);
            let rect = Rect::new(3, 4, 9, 12);
            let mapped = buffer_rect_to_memory(orientation, geometry.buffer_size(), rect);
            for (x, y) in [(3, 4), (8, 4), (3, 11), (8, 11)] {
                let mem = geometry.buffer_to_memory(Point::new(x, y));
                assert!(mapped.contains(mem.x, mem.y), "{orientation:?}");
            }
            assert_eq!(mapped.width() * mapped.height(), 48);
        }
    }
}
