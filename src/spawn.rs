//! Random particle seeding.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::FieldConfig;
use crate::particle::Particle;

/// Random source for a freshly mounted field.
///
/// Seeded from the config when it carries a seed, otherwise from the clock so
/// every mount looks different.
pub struct Seeder {
    rng: SmallRng,
}

impl Seeder {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            web_time::SystemTime::now()
                .duration_since(web_time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f32 in `[min, max)`, or `min` when the range is empty.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Uniform point in the rectangle `[0, size.x) × [0, size.y)`.
    pub fn random_in_rect(&mut self, size: Vec2) -> Vec2 {
        Vec2::new(self.random_range(0.0, size.x), self.random_range(0.0, size.y))
    }

    /// Velocity with each axis in `[-max_speed, max_speed)`.
    pub fn random_velocity(&mut self, max_speed: f32) -> Vec2 {
        Vec2::new(
            self.random_range(-max_speed, max_speed),
            self.random_range(-max_speed, max_speed),
        )
    }

    /// One particle placed anywhere in a `viewport`-sized logical area.
    pub fn particle(&mut self, viewport: Vec2, config: &FieldConfig) -> Particle {
        let position = self.random_in_rect(viewport);
        let velocity = self.random_velocity(config.max_speed);
        let [min, max] = config.radius_range;
        let radius = self.random_range(min, max);
        Particle::new(position, velocity, radius)
    }

    /// The full particle set for a mount.
    pub fn particles(&mut self, viewport: Vec2, config: &FieldConfig) -> Vec<Particle> {
        (0..config.particle_count)
            .map(|_| self.particle(viewport, config))
            .collect()
    }
}
