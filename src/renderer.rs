//! The particle field renderer and its frame loop.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;
use log::{debug, trace, warn};

use crate::config::FieldConfig;
use crate::error::{FieldError, Result};
use crate::host::{Container, ResizeObserver};
use crate::links::links;
use crate::particle::Particle;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::spawn::Seeder;
use crate::surface::{Surface, SurfaceState};
use crate::time::FrameClock;

/// Everything owned by one mount: surface, particles, loop bookkeeping.
struct FieldState<C: Container> {
    config: FieldConfig,
    container: Rc<C>,
    surface: C::Surface,
    geometry: SurfaceState,
    particles: Vec<Particle>,
    clock: FrameClock,
    /// Frame requested but not yet run.
    pending: Option<FrameHandle>,
    /// Set by a resize notification that arrived mid-frame.
    resize_pending: Rc<Cell<bool>>,
}

impl<C: Container> FieldState<C> {
    fn on_resize(&mut self) {
        self.resize_pending.set(false);
        self.geometry = SurfaceState::measure(&*self.container);
        self.geometry.apply(&mut self.surface);
        let physical = self.geometry.physical();
        debug!(
            "Particle field resized to {}x{} logical, {}x{} physical @{}x",
            self.geometry.logical.x, self.geometry.logical.y, physical.x, physical.y, self.geometry.pixel_ratio
        );
    }

    /// Clear, link, step and draw. Scheduling the next frame is the loop's job.
    fn render_frame(&mut self) {
        if self.resize_pending.get() {
            self.on_resize();
        }

        let size = self.geometry.logical;
        let config = &self.config;
        let surface = &mut self.surface;

        surface.clear_rect(0.0, 0.0, size.x, size.y);

        for link in links(&self.particles, config.link_distance, config.link_opacity) {
            surface.stroke_line(link.from, link.to, config.link_color.with_alpha(link.alpha), config.link_width);
        }

        for particle in &mut self.particles {
            particle.step(size, config.wrap_margin);
            surface.fill_radial_disc(
                particle.position(),
                particle.radius() * config.glow_scale,
                config.glow_color,
                config.glow_color.transparent(),
            );
            surface.fill_disc(particle.position(), particle.radius(), config.core_color);
        }

        if self.clock.tick() {
            trace!("Particle field frame {} ({:.1} fps)", self.clock.frame(), self.clock.fps());
        }
    }
}

/// Request the next frame for `state`.
///
/// The callback holds only weak references, so a dropped renderer or
/// scheduler ends the loop on its own.
fn schedule_frame<C, F>(state: &Rc<RefCell<FieldState<C>>>, scheduler: &Rc<F>)
where
    C: Container + 'static,
    C::Surface: 'static,
    F: FrameScheduler + 'static,
{
    let weak_state: Weak<RefCell<FieldState<C>>> = Rc::downgrade(state);
    let weak_scheduler: Weak<F> = Rc::downgrade(scheduler);

    let handle = scheduler.request_frame(Box::new(move || {
        let (Some(state), Some(scheduler)) = (weak_state.upgrade(), weak_scheduler.upgrade()) else {
            return;
        };
        {
            let mut state = state.borrow_mut();
            state.pending = None;
            state.render_frame();
        }
        schedule_frame(&state, &scheduler);
    }));

    state.borrow_mut().pending = Some(handle);
}

struct Mounted<C: Container> {
    state: Rc<RefCell<FieldState<C>>>,
    observer: Box<dyn ResizeObserver>,
}

impl<C: Container> Mounted<C> {
    /// Cancel the pending frame and detach the observer. Returns the number
    /// of frames rendered.
    fn teardown<F: FrameScheduler + ?Sized>(mut self, scheduler: &F) -> u64 {
        let pending = self.state.borrow_mut().pending.take();
        if let Some(handle) = pending {
            scheduler.cancel(handle);
        }
        self.observer.disconnect();
        let frames = self.state.borrow().clock.frame();
        frames
    }
}

/// Animated background of glowing, interlinked particles.
///
/// Lifecycle is `mount` → frames delivered by the scheduler → `unmount`.
/// Each renderer owns its surface and particles exclusively; two renderers
/// never share state.
///
/// ```ignore
/// let scheduler = Rc::new(ManualScheduler::new());
/// let mut renderer = ParticleFieldRenderer::new(FieldConfig::default(), scheduler.clone());
///
/// let container = Rc::new(StaticContainer::new(Vec2::new(800.0, 600.0), 2.0, RasterSurface::new()));
/// renderer.mount(container, Box::new(ManualResizeObserver::new()))?;
///
/// scheduler.run_frames(60);
/// renderer.unmount();
/// ```
pub struct ParticleFieldRenderer<C: Container, F: FrameScheduler> {
    config: FieldConfig,
    scheduler: Rc<F>,
    mounted: Option<Mounted<C>>,
}

impl<C, F> ParticleFieldRenderer<C, F>
where
    C: Container + 'static,
    C::Surface: 'static,
    F: FrameScheduler + 'static,
{
    pub fn new(config: FieldConfig, scheduler: Rc<F>) -> Self {
        Self {
            config,
            scheduler,
            mounted: None,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Acquire the container's surface, seed the particles, start observing
    /// size changes and request the first frame.
    ///
    /// Nothing is scheduled or observed if this returns an error.
    pub fn mount(&mut self, container: Rc<C>, mut observer: Box<dyn ResizeObserver>) -> Result<()> {
        if self.mounted.is_some() {
            return Err(FieldError::AlreadyMounted);
        }
        self.config.validate()?;

        let Some(mut surface) = container.context_2d() else {
            warn!("Particle field mount skipped: container has no 2D context");
            return Err(FieldError::NoSurface);
        };

        let geometry = SurfaceState::measure(&*container);
        geometry.apply(&mut surface);
        let particles = Seeder::new(self.config.seed).particles(geometry.logical, &self.config);

        let resize_pending = Rc::new(Cell::new(false));
        let state = Rc::new(RefCell::new(FieldState {
            config: self.config.clone(),
            container,
            surface,
            geometry,
            particles,
            clock: FrameClock::new(),
            pending: None,
            resize_pending: resize_pending.clone(),
        }));

        let weak_state = Rc::downgrade(&state);
        observer.observe(Box::new(move || {
            let Some(state) = weak_state.upgrade() else {
                return;
            };
            // Mid-frame notifications are applied before the next frame draws.
            match state.try_borrow_mut() {
                Ok(mut state) => state.on_resize(),
                Err(_) => resize_pending.set(true),
            };
        }))?;

        schedule_frame(&state, &self.scheduler);

        debug!(
            "Particle field mounted: {} particles on {}x{} @{}x",
            self.config.particle_count, geometry.logical.x, geometry.logical.y, geometry.pixel_ratio
        );
        self.mounted = Some(Mounted { state, observer });
        Ok(())
    }

    /// Re-measure the container and resize the backing buffer.
    ///
    /// Normally driven by the resize observer; calling it directly is useful
    /// when the host knows the layout changed.
    pub fn on_resize(&self) {
        if let Some(mounted) = &self.mounted {
            mounted.state.borrow_mut().on_resize();
        }
    }

    /// Draw one frame immediately, outside the scheduled loop.
    pub fn render_frame(&self) {
        if let Some(mounted) = &self.mounted {
            mounted.state.borrow_mut().render_frame();
        }
    }

    /// Cancel the pending frame and stop observing. No drawing happens
    /// after this returns. Does nothing when not mounted.
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            let frames = mounted.teardown(&*self.scheduler);
            debug!("Particle field unmounted after {} frames", frames);
        }
    }

    /// Current surface geometry, if mounted.
    pub fn surface_state(&self) -> Option<SurfaceState> {
        self.mounted.as_ref().map(|m| m.state.borrow().geometry)
    }

    /// Copy of the current particle set, if mounted.
    pub fn particles(&self) -> Option<Vec<Particle>> {
        self.mounted.as_ref().map(|m| m.state.borrow().particles.clone())
    }

    /// Run `f` against the mounted surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&C::Surface) -> R) -> Option<R> {
        self.mounted.as_ref().map(|m| f(&m.state.borrow().surface))
    }

    /// Frames rendered since mount.
    pub fn frames_rendered(&self) -> u64 {
        self.mounted.as_ref().map_or(0, |m| m.state.borrow().clock.frame())
    }

    /// Achieved frame rate since mount.
    pub fn fps(&self) -> f32 {
        self.mounted.as_ref().map_or(0.0, |m| m.state.borrow().clock.fps())
    }

    /// Logical size of the mounted field.
    pub fn logical_size(&self) -> Option<Vec2> {
        self.surface_state().map(|s| s.logical)
    }
}

impl<C: Container, F: FrameScheduler> Drop for ParticleFieldRenderer<C, F> {
    fn drop(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.teardown(&*self.scheduler);
        }
    }
}
