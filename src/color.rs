//! Straight-alpha colors as used by 2D canvas fill and stroke styles.

use serde::{Deserialize, Serialize};

/// An sRGB color with a straight (non-premultiplied) alpha in `0.0..=1.0`.
///
/// Mirrors CSS `rgba(r, g, b, a)` so the same value can be handed to a
/// browser canvas or blended by the software rasterizer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color with an explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same hue, different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Same hue at zero alpha (the outer stop of a glow gradient).
    #[inline]
    pub fn transparent(self) -> Self {
        Self { a: 0.0, ..self }
    }

    /// Linear interpolation of every channel, `t` in `0.0..=1.0`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// CSS color string, e.g. `rgba(34, 211, 238, 0.9)`.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Cyan used for links and particle cores.
pub const CYAN: Rgba = Rgba::rgb(34, 211, 238);

/// Violet used for the particle glow.
pub const VIOLET: Rgba = Rgba::rgb(139, 92, 246);
