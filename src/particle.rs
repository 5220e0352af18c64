//! Particle state and per-frame motion.
//!
//! Motion is deliberately simple: constant velocity, one step per rendered
//! frame, and toroidal wraparound a fixed margin past each edge. There is no
//! delta-time scaling, so apparent speed follows the achieved frame rate.

use glam::Vec2;

/// A single point-light particle.
///
/// Only `position` ever changes after creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    radius: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Advance by one frame's velocity, then wrap around `bounds`.
    ///
    /// `bounds` is the logical surface size. After the step the position lies
    /// in `[-margin, bounds + margin]` on both axes.
    pub fn step(&mut self, bounds: Vec2, margin: f32) {
        self.position += self.velocity;
        self.position.x = wrap_axis(self.position.x, bounds.x, margin);
        self.position.y = wrap_axis(self.position.y, bounds.y, margin);
    }
}

/// Toroidal wrap of one coordinate.
///
/// Past `extent + margin` jumps to exactly `-margin`; below `-margin` jumps to
/// exactly `extent + margin`. Never clamps, never reflects.
#[inline]
pub fn wrap_axis(value: f32, extent: f32, margin: f32) -> f32 {
    if value > extent + margin {
        -margin
    } else if value < -margin {
        extent + margin
    } else {
        value
    }
}
