use std::path::Path;

use glam::Vec2;
use image::{Rgba as Pixel, RgbaImage};

use super::Surface;
use crate::color::Rgba;
use crate::error::Result;

/// CPU rasterizer over an RGBA image.
///
/// Follows canvas-2D semantics closely enough for headless export and pixel
/// comparisons: a freshly sized buffer is transparent, the transform is a
/// uniform scale, and everything composites source-over with a half-pixel
/// coverage ramp at shape edges.
pub struct RasterSurface {
    image: RgbaImage,
    scale: f32,
}

impl RasterSurface {
    pub fn new() -> Self {
        Self {
            image: RgbaImage::new(0, 0),
            scale: 1.0,
        }
    }

    /// The physical backing buffer.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Copy of the backing buffer.
    pub fn snapshot(&self) -> RgbaImage {
        self.image.clone()
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Encode the current buffer as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Physical pixel range covering `[lo, hi]` in physical units, clipped
    /// to the buffer.
    fn span(lo: f32, hi: f32, limit: u32) -> std::ops::Range<u32> {
        let start = lo.floor().max(0.0) as u32;
        let end = (hi.ceil().max(0.0) as u32).min(limit);
        start.min(end)..end
    }

    /// Run `shade` for every pixel center inside the physical box
    /// `[min, max]`; `shade` returns the color to composite, if any.
    fn shade_box(&mut self, min: Vec2, max: Vec2, mut shade: impl FnMut(Vec2) -> Option<Rgba>) {
        let (w, h) = self.image.dimensions();
        for y in Self::span(min.y, max.y, h) {
            for x in Self::span(min.x, max.x, w) {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some(color) = shade(center) {
                    blend(self.image.get_pixel_mut(x, y), color);
                }
            }
        }
    }
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Composite `src` over `dst` (straight alpha, source-over).
fn blend(dst: &mut Pixel<u8>, src: Rgba) {
    let sa = src.a.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| {
        let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    *dst = Pixel([
        channel(src.r, dst[0]),
        channel(src.g, dst[1]),
        channel(src.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}

/// Edge coverage for a pixel whose center is `distance` from a shape whose
/// edge is at `edge`.
#[inline]
fn coverage(edge: f32, distance: f32) -> f32 {
    (edge + 0.5 - distance).clamp(0.0, 1.0)
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for RasterSurface {
    fn resize_backing(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
        self.scale = 1.0;
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let (w, h) = self.image.dimensions();
        let s = self.scale;
        for py in Self::span(y * s, (y + height) * s, h) {
            for px in Self::span(x * s, (x + width) * s, w) {
                self.image.put_pixel(px, py, Pixel([0, 0, 0, 0]));
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        let (a, b) = (from * self.scale, to * self.scale);
        let half = (width * self.scale * 0.5).max(0.5);
        let reach = Vec2::splat(half + 1.0);
        self.shade_box(a.min(b) - reach, a.max(b) + reach, |p| {
            let cov = coverage(half, distance_to_segment(p, a, b));
            (cov > 0.0).then(|| color.with_alpha(color.a * cov))
        });
    }

    fn fill_radial_disc(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        let (c, r) = (center * self.scale, radius * self.scale);
        if r <= 0.0 {
            return;
        }
        let reach = Vec2::splat(r + 1.0);
        self.shade_box(c - reach, c + reach, |p| {
            let d = p.distance(c);
            let cov = coverage(r, d);
            if cov <= 0.0 {
                return None;
            }
            let shade = inner.lerp(outer, d / r);
            Some(shade.with_alpha(shade.a * cov))
        });
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let (c, r) = (center * self.scale, radius * self.scale);
        if r <= 0.0 {
            return;
        }
        let reach = Vec2::splat(r + 1.0);
        self.shade_box(c - reach, c + reach, |p| {
            let cov = coverage(r, p.distance(c));
            (cov > 0.0).then(|| color.with_alpha(color.a * cov))
        });
    }
}
