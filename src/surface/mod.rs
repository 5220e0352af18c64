//! 2D drawing surfaces.
//!
//! A [`Surface`] is the handful of canvas-2D operations the field needs:
//! sizing the backing buffer, a uniform scale transform, clearing, and
//! stroking/filling lines and discs. All drawing coordinates are logical
//! units; the surface maps them through its current scale.

mod raster;
mod recording;

pub use raster::RasterSurface;
pub use recording::{DrawCommand, RecordingSurface};

use glam::{UVec2, Vec2};

use crate::color::Rgba;
use crate::host::Container;

/// Drawing context exclusively owned by one mounted renderer.
pub trait Surface {
    /// Reallocate the physical backing buffer. Contents are discarded.
    fn resize_backing(&mut self, width: u32, height: u32);

    /// Lay the surface out at `size` logical units, independent of the
    /// backing buffer's pixel count. Surfaces with no layout ignore this.
    fn set_display_size(&mut self, _size: Vec2) {}

    /// Replace the current transform with a uniform scale.
    fn set_scale(&mut self, scale: f32);

    /// Clear a logical rectangle to fully transparent.
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Stroke a straight line.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32);

    /// Fill a disc with a radial gradient running from `inner` at the center
    /// to `outer` at `radius`.
    fn fill_radial_disc(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba);

    /// Fill a solid disc.
    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba);
}

/// Logical size and pixel density of a mounted surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceState {
    /// Size in logical (CSS) units.
    pub logical: Vec2,
    /// Physical pixels per logical unit.
    pub pixel_ratio: f32,
}

impl SurfaceState {
    pub fn new(logical: Vec2, pixel_ratio: f32) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Self {
            logical: logical.max(Vec2::ZERO),
            pixel_ratio,
        }
    }

    /// Read the container's current content box and pixel ratio.
    pub fn measure<C: Container + ?Sized>(container: &C) -> Self {
        Self::new(container.content_box(), container.device_pixel_ratio())
    }

    /// Backing buffer size in physical pixels.
    pub fn physical(&self) -> UVec2 {
        (self.logical * self.pixel_ratio).round().as_uvec2()
    }

    /// Size the backing buffer, pin the displayed size to the logical size,
    /// and set the transform so drawing stays in logical units.
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) {
        let physical = self.physical();
        surface.resize_backing(physical.x, physical.y);
        surface.set_display_size(self.logical);
        surface.set_scale(self.pixel_ratio);
    }
}
