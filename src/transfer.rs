//! Image transfer from the framebuffer to controller RAM
//!
//! Each RAM row of the drawing specification's `mem_rect` is packed MSB
//! first, one bit per pixel, and streamed after a single RAM write command.
//! Bits are looked up through the inverse orientation mapping, so the
//! framebuffer stays in logical order whatever the mounting.

use crate::color::Color;
use crate::controller::{Controller, RamPlane};
use crate::error::{Error, MAX_SOURCE_OUTPUTS};
use crate::framebuffer::Framebuffer;
use crate::geometry::{BYTE_ALIGN, DrawSpec, Geometry, Point};
use crate::interface::DisplayInterface;

/// Largest RAM row in bytes
pub const MAX_ROW_BYTES: usize = MAX_SOURCE_OUTPUTS as usize / 8;

/// Pack RAM row `mem_y` of `spec.mem_rect` into `out`
///
/// Returns the number of bytes written. Bits that fall into alignment
/// padding, outside the logical area, are 0.
pub fn pack_row<B>(
    geometry: &Geometry,
    spec: &DrawSpec,
    framebuffer: &Framebuffer<B>,
    mem_y: i32,
    out: &mut [u8],
) -> usize
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let row_bytes = spec.mem_rect.width() as usize / BYTE_ALIGN as usize;
    let logical = geometry.buffer_logical_rect();
    let mut written = 0;

    for (index, byte) in out.iter_mut().take(row_bytes).enumerate() {
        let base_x = spec.mem_rect.min_x + (index as i32) * BYTE_ALIGN;
        *byte = (0..8).fold(0u8, |acc, bit| {
            let source = geometry.memory_to_buffer(Point::new(base_x + bit, mem_y));
            let white = logical.contains(source.x, source.y)
                && framebuffer.pixel(source.x, source.y) == Some(Color::White);
            if white { acc | (0x80 >> bit) } else { acc }
        });
        written += 1;
    }

    written
}

/// Program the RAM window for `spec` and stream its rows into `plane`
///
/// Sends exactly `mem_rect.width() / 8 * mem_rect.height()` bytes after one
/// RAM write command. An empty spec sends nothing.
pub fn send_image<I, B>(
    controller: &mut Controller<I>,
    geometry: &Geometry,
    spec: &DrawSpec,
    framebuffer: &Framebuffer<B>,
    plane: RamPlane,
) -> Result<(), Error<I>>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    if spec.is_empty() {
        return Ok(());
    }
    log::trace!("sending {:?} to {:?}", spec.mem_rect, plane);

    controller.set_window(spec.mem_rect)?;
    controller.write_ram(plane)?;

    let mut row = [0u8; MAX_ROW_BYTES];
    for mem_y in spec.mem_rect.min_y..spec.mem_rect.max_y {
        let len = pack_row(geometry, spec, framebuffer, mem_y, &mut row);
        controller.write_data(&row[..len])?;
    }
    Ok(())
}
