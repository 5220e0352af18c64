//! Connection lines between nearby particles.
//!
//! Every unordered pair is tested in array order (`i < j`). At a few dozen
//! particles the brute-force scan is cheaper than maintaining a spatial index.

use glam::Vec2;

use crate::particle::Particle;

/// A line to draw between two particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    /// Stroke alpha, `(1 - distance / max_distance) * opacity`.
    pub alpha: f32,
}

/// Alpha of the link between two points, or `None` when they are
/// `max_distance` or further apart.
#[inline]
pub fn link_alpha(a: Vec2, b: Vec2, max_distance: f32, opacity: f32) -> Option<f32> {
    let distance = a.distance(b);
    (distance < max_distance).then(|| (1.0 - distance / max_distance) * opacity)
}

/// All links for the current particle positions, in pair order.
pub fn links(particles: &[Particle], max_distance: f32, opacity: f32) -> impl Iterator<Item = Link> + '_ {
    particles.iter().enumerate().flat_map(move |(i, a)| {
        particles[i + 1..].iter().filter_map(move |b| {
            link_alpha(a.position(), b.position(), max_distance, opacity).map(|alpha| Link {
                from: a.position(),
                to: b.position(),
                alpha,
            })
        })
    })
}
