//! Field configuration.
//!
//! Every tunable of the particle field lives here. The defaults reproduce the
//! stock background: 36 particles, links under 120 logical units, a 20-unit
//! wrap margin, violet glow and cyan cores.
//!
//! Configurations serialize to JSON so a host can ship a tuned field as a
//! file:
//!
//! ```ignore
//! use particle_field::FieldConfig;
//!
//! let config = FieldConfig::default()
//!     .with_particle_count(64)
//!     .with_link_distance(90.0);
//! config.save("field.json")?;
//!
//! let loaded = FieldConfig::load("field.json")?;
//! assert_eq!(loaded, config);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{Rgba, CYAN, VIOLET};
use crate::error::{FieldError, Result};

fn default_particle_count() -> u32 {
    36
}

fn default_link_distance() -> f32 {
    120.0
}

fn default_link_opacity() -> f32 {
    0.35
}

fn default_link_width() -> f32 {
    1.0
}

fn default_wrap_margin() -> f32 {
    20.0
}

fn default_max_speed() -> f32 {
    0.35
}

fn default_radius_range() -> [f32; 2] {
    [0.8, 2.2]
}

fn default_glow_scale() -> f32 {
    5.0
}

fn default_link_color() -> Rgba {
    CYAN
}

fn default_glow_color() -> Rgba {
    VIOLET.with_alpha(0.55)
}

fn default_core_color() -> Rgba {
    CYAN.with_alpha(0.9)
}

/// Complete particle field configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FieldConfig {
    /// Number of particles, fixed for the lifetime of a mount.
    #[serde(default = "default_particle_count")]
    pub particle_count: u32,
    /// Pairs closer than this (strictly) are linked.
    #[serde(default = "default_link_distance")]
    pub link_distance: f32,
    /// Link alpha at zero distance; fades linearly to 0 at `link_distance`.
    #[serde(default = "default_link_opacity")]
    pub link_opacity: f32,
    /// Link stroke width in logical units.
    #[serde(default = "default_link_width")]
    pub link_width: f32,
    /// How far past an edge a particle travels before wrapping.
    #[serde(default = "default_wrap_margin")]
    pub wrap_margin: f32,
    /// Per-axis velocity is drawn from `[-max_speed, max_speed)`, units per frame.
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    /// Particle radius is drawn from `[min, max)`.
    #[serde(default = "default_radius_range")]
    pub radius_range: [f32; 2],
    /// Glow radius as a multiple of the particle radius.
    #[serde(default = "default_glow_scale")]
    pub glow_scale: f32,
    /// Hue of the links. Its alpha is replaced by the distance fade.
    #[serde(default = "default_link_color")]
    pub link_color: Rgba,
    /// Inner stop of the glow gradient. The outer stop is the same hue at zero alpha.
    #[serde(default = "default_glow_color")]
    pub glow_color: Rgba,
    /// Solid core disc color.
    #[serde(default = "default_core_color")]
    pub core_color: Rgba,
    /// Fixed RNG seed. `None` seeds from the clock, so every mount differs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: default_particle_count(),
            link_distance: default_link_distance(),
            link_opacity: default_link_opacity(),
            link_width: default_link_width(),
            wrap_margin: default_wrap_margin(),
            max_speed: default_max_speed(),
            radius_range: default_radius_range(),
            glow_scale: default_glow_scale(),
            link_color: default_link_color(),
            glow_color: default_glow_color(),
            core_color: default_core_color(),
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the link cutoff distance.
    pub fn with_link_distance(mut self, distance: f32) -> Self {
        self.link_distance = distance;
        self
    }

    /// Set the link alpha at zero distance.
    pub fn with_link_opacity(mut self, opacity: f32) -> Self {
        self.link_opacity = opacity;
        self
    }

    /// Set the wraparound margin.
    pub fn with_wrap_margin(mut self, margin: f32) -> Self {
        self.wrap_margin = margin;
        self
    }

    /// Set the maximum per-axis speed. `0.0` freezes the field.
    pub fn with_max_speed(mut self, speed: f32) -> Self {
        self.max_speed = speed;
        self
    }

    /// Set the radius range.
    pub fn with_radius_range(mut self, min: f32, max: f32) -> Self {
        self.radius_range = [min, max];
        self
    }

    /// Set the glow colors.
    pub fn with_colors(mut self, link: Rgba, glow: Rgba, core: Rgba) -> Self {
        self.link_color = link;
        self.glow_color = glow;
        self.core_color = core;
        self
    }

    /// Seed particle placement for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(FieldError::InvalidConfig(msg));
        if self.particle_count == 0 {
            return invalid("particle_count must be > 0".into());
        }
        if !(self.link_distance > 0.0) {
            return invalid(format!("link_distance must be > 0, got {}", self.link_distance));
        }
        if !(0.0..=1.0).contains(&self.link_opacity) {
            return invalid(format!("link_opacity must be in 0..=1, got {}", self.link_opacity));
        }
        if !(self.wrap_margin >= 0.0) {
            return invalid(format!("wrap_margin must be >= 0, got {}", self.wrap_margin));
        }
        if !(self.max_speed >= 0.0) {
            return invalid(format!("max_speed must be >= 0, got {}", self.max_speed));
        }
        let [min, max] = self.radius_range;
        if !(min > 0.0 && min <= max) {
            return invalid(format!("radius_range must satisfy 0 < min <= max, got [{min}, {max}]"));
        }
        if !(self.glow_scale >= 1.0) {
            return invalid(format!("glow_scale must be >= 1, got {}", self.glow_scale));
        }
        Ok(())
    }

    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
