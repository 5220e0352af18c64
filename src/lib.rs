//! # Particle Field
//!
//! An animated background of glowing, interlinked particles for any 2D
//! drawing surface.
//!
//! A small fixed set of particles drifts at constant velocity, wrapping
//! around the edges of their container. Every frame the field is cleared,
//! pairs closer than a cutoff are joined by lines that fade with distance,
//! and each particle is drawn as a soft violet glow with a cyan core.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_field::prelude::*;
//! use std::rc::Rc;
//!
//! let scheduler = Rc::new(ManualScheduler::new());
//! let container = Rc::new(StaticContainer::new(
//!     Vec2::new(800.0, 600.0),
//!     2.0,
//!     RasterSurface::new(),
//! ));
//!
//! let mut field = ParticleFieldRenderer::new(FieldConfig::default(), scheduler.clone());
//! field.mount(container, Box::new(ManualResizeObserver::new()))?;
//!
//! scheduler.run_frames(120);
//! field.with_surface(|surface| surface.save_png("field.png"));
//! field.unmount();
//! ```
//!
//! ## Core Concepts
//!
//! ### Hosts
//!
//! The renderer never touches a window, a canvas or a timer directly. It is
//! handed three seams:
//!
//! - a [`Container`] that reports its content box and pixel ratio and hands
//!   out a [`Surface`] to draw on,
//! - a [`ResizeObserver`] that calls back whenever that box changes size,
//! - a [`FrameScheduler`] that delivers animation frames.
//!
//! With the `web` feature these are an HTML canvas, a DOM `ResizeObserver`
//! and `requestAnimationFrame`. Headless, they are [`StaticContainer`],
//! [`ManualResizeObserver`] and [`ManualScheduler`].
//!
//! ### Logical and physical units
//!
//! All drawing happens in logical (CSS) units. The backing buffer is sized
//! to logical size × device pixel ratio and the surface transform scales by
//! the ratio, so a field looks the same on any display density.
//!
//! ### Frame pacing
//!
//! Particles move one velocity step per rendered frame. There is no
//! delta-time scaling: a slower frame rate means slower particles.
//!
//! ## Feature Overview
//!
//! | Concern | Types |
//! |---------|-------|
//! | Rendering | [`ParticleFieldRenderer`] |
//! | Tuning | [`FieldConfig`], [`Rgba`] |
//! | Surfaces | [`Surface`], [`RasterSurface`], [`RecordingSurface`] |
//! | Scheduling | [`FrameScheduler`], [`ManualScheduler`] |
//! | Hosting | [`Container`], [`ResizeObserver`], [`StaticContainer`], [`ManualResizeObserver`] |

pub mod color;
pub mod config;
mod error;
pub mod host;
pub mod links;
pub mod particle;
mod renderer;
pub mod scheduler;
mod spawn;
pub mod surface;
pub mod time;
#[cfg(feature = "web")]
pub mod web;

pub use color::Rgba;
pub use config::FieldConfig;
pub use error::{FieldError, Result};
pub use glam::{UVec2, Vec2};
pub use host::{Container, ManualResizeObserver, ResizeCallback, ResizeObserver, StaticContainer};
pub use particle::Particle;
pub use renderer::ParticleFieldRenderer;
pub use scheduler::{FrameCallback, FrameHandle, FrameScheduler, ManualScheduler};
pub use spawn::Seeder;
pub use surface::{DrawCommand, RasterSurface, RecordingSurface, Surface, SurfaceState};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use particle_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::config::FieldConfig;
    pub use crate::error::{FieldError, Result};
    pub use crate::host::{Container, ManualResizeObserver, ResizeObserver, StaticContainer};
    pub use crate::renderer::ParticleFieldRenderer;
    pub use crate::scheduler::{FrameScheduler, ManualScheduler};
    pub use crate::surface::{RasterSurface, RecordingSurface, Surface, SurfaceState};
    pub use crate::{UVec2, Vec2};
    #[cfg(feature = "web")]
    pub use crate::web::{AnimationFrameScheduler, CanvasContainer, DomResizeObserver, ParticleBackground};
}
