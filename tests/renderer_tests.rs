//! Integration tests for the particle field render loop.
//!
//! These drive a mounted renderer frame by frame through a manual scheduler
//! and check the field's invariants from the outside: particle count,
//! wraparound, constant velocity/radius, resize handling, lifecycle and
//! frame-to-frame clearing.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{UVec2, Vec2};
use particle_field::{
    Container, DrawCommand, FieldConfig, ManualResizeObserver, ManualScheduler, ParticleFieldRenderer,
    RasterSurface, RecordingSurface, Rgba, StaticContainer, Surface,
};

type Recorded = ParticleFieldRenderer<StaticContainer<RecordingSurface>, ManualScheduler>;

struct Harness {
    renderer: Recorded,
    scheduler: Rc<ManualScheduler>,
    container: Rc<StaticContainer<RecordingSurface>>,
    observer: ManualResizeObserver,
    surface: RecordingSurface,
}

fn harness(size: Vec2, ratio: f32, config: FieldConfig) -> Harness {
    let scheduler = Rc::new(ManualScheduler::new());
    let surface = RecordingSurface::new();
    let container = Rc::new(StaticContainer::new(size, ratio, surface.clone()));
    let observer = ManualResizeObserver::new();
    let mut renderer = ParticleFieldRenderer::new(config, scheduler.clone());
    renderer
        .mount(container.clone(), Box::new(observer.clone()))
        .unwrap();
    Harness {
        renderer,
        scheduler,
        container,
        observer,
        surface,
    }
}

// ============================================================================
// Particle Invariants
// ============================================================================

#[test]
fn test_particle_count_is_constant() {
    let h = harness(Vec2::new(800.0, 600.0), 1.0, FieldConfig::default().with_seed(1));
    assert_eq!(h.renderer.particles().unwrap().len(), 36);
    for _ in 0..50 {
        h.scheduler.run_frame();
        assert_eq!(h.renderer.particles().unwrap().len(), 36);
    }
}

#[test]
fn test_custom_particle_count() {
    let h = harness(
        Vec2::new(320.0, 200.0),
        1.0,
        FieldConfig::default().with_particle_count(5).with_seed(2),
    );
    h.scheduler.run_frames(3);
    assert_eq!(h.renderer.particles().unwrap().len(), 5);
    let discs = h
        .surface
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::Disc { .. }))
        .count();
    assert_eq!(discs, 15);
}

#[test]
fn test_positions_wrap_within_margin() {
    let (w, h_) = (100.0, 80.0);
    let config = FieldConfig::default().with_max_speed(15.0).with_seed(3);
    let h = harness(Vec2::new(w, h_), 1.0, config);

    let mut previous = h.renderer.particles().unwrap();
    for _ in 0..1000 {
        h.scheduler.run_frame();
        let current = h.renderer.particles().unwrap();
        for (before, after) in previous.iter().zip(&current) {
            let p = after.position();
            assert!((-20.0..=w + 20.0).contains(&p.x), "x out of range: {}", p.x);
            assert!((-20.0..=h_ + 20.0).contains(&p.y), "y out of range: {}", p.y);

            let moved = before.position() + before.velocity();
            if moved.x > w + 20.0 {
                assert_eq!(p.x, -20.0);
            } else if moved.x < -20.0 {
                assert_eq!(p.x, w + 20.0);
            } else {
                assert_eq!(p.x, moved.x);
            }
            if moved.y > h_ + 20.0 {
                assert_eq!(p.y, -20.0);
            } else if moved.y < -20.0 {
                assert_eq!(p.y, h_ + 20.0);
            } else {
                assert_eq!(p.y, moved.y);
            }
        }
        previous = current;
    }
}

#[test]
fn test_velocity_and_radius_never_change() {
    let h = harness(Vec2::new(640.0, 480.0), 1.0, FieldConfig::default().with_seed(4));
    h.scheduler.run_frame();
    let first = h.renderer.particles().unwrap();
    h.scheduler.run_frames(999);
    let last = h.renderer.particles().unwrap();

    assert_eq!(h.renderer.frames_rendered(), 1000);
    for (a, b) in first.iter().zip(&last) {
        assert_eq!(a.velocity(), b.velocity());
        assert_eq!(a.radius(), b.radius());
    }
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_link_alpha_and_style() {
    let config = FieldConfig::default().with_seed(5);
    let h = harness(Vec2::new(300.0, 300.0), 1.0, config.clone());
    h.surface.clear_log();
    h.scheduler.run_frame();

    for command in h.surface.commands() {
        if let DrawCommand::Line { from, to, color, width } = command {
            let d = from.distance(to);
            assert!(d < 120.0);
            let expected = (1.0 - d / 120.0) * 0.35;
            assert!((color.a - expected).abs() < 1e-5);
            assert_eq!(Rgba { a: 1.0, ..color }, config.link_color);
            assert_eq!(width, 1.0);
        }
    }
}

#[test]
fn test_every_frame_starts_with_full_clear() {
    let h = harness(Vec2::new(500.0, 250.0), 1.0, FieldConfig::default());
    for _ in 0..3 {
        h.surface.clear_log();
        h.scheduler.run_frame();
        assert_eq!(
            h.surface.commands()[0],
            DrawCommand::ClearRect { x: 0.0, y: 0.0, width: 500.0, height: 250.0 }
        );
    }
}

#[test]
fn test_frozen_field_renders_identical_pixels() {
    let scheduler = Rc::new(ManualScheduler::new());
    let container = Rc::new(StaticContainer::new(Vec2::new(160.0, 120.0), 2.0, RasterSurface::new()));
    let config = FieldConfig::default().with_max_speed(0.0).with_seed(6);
    let mut renderer = ParticleFieldRenderer::new(config, scheduler.clone());
    renderer
        .mount(container, Box::new(ManualResizeObserver::new()))
        .unwrap();

    scheduler.run_frame();
    let first = renderer.with_surface(|s| s.snapshot()).unwrap();
    scheduler.run_frame();
    let second = renderer.with_surface(|s| s.snapshot()).unwrap();

    assert_eq!(first.dimensions(), (320, 240));
    assert!(first.pixels().any(|p| p[3] > 0));
    assert_eq!(first, second);
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_rescales_backing_buffer() {
    let h = harness(Vec2::new(800.0, 600.0), 2.0, FieldConfig::default());
    assert_eq!(h.surface.commands()[0], DrawCommand::ResizeBacking { width: 1600, height: 1200 });
    h.scheduler.run_frame();

    h.container.set_content_box(Vec2::new(400.0, 300.0));
    h.surface.clear_log();
    assert!(h.observer.notify());

    assert_eq!(
        h.surface.commands(),
        vec![
            DrawCommand::ResizeBacking { width: 800, height: 600 },
            DrawCommand::DisplaySize(Vec2::new(400.0, 300.0)),
            DrawCommand::SetScale(2.0),
        ]
    );
    let state = h.renderer.surface_state().unwrap();
    assert_eq!(state.physical(), UVec2::new(800, 600));
    assert_eq!(state.logical, Vec2::new(400.0, 300.0));

    h.surface.clear_log();
    h.scheduler.run_frame();
    assert_eq!(
        h.surface.commands()[0],
        DrawCommand::ClearRect { x: 0.0, y: 0.0, width: 400.0, height: 300.0 }
    );
}

#[test]
fn test_pixel_ratio_change_is_picked_up() {
    let h = harness(Vec2::new(100.0, 50.0), 1.0, FieldConfig::default());
    h.container.set_pixel_ratio(3.0);
    h.renderer.on_resize();
    assert_eq!(h.renderer.surface_state().unwrap().physical(), UVec2::new(300, 150));
}

/// Surface that fires a resize notification from inside its first clear,
/// i.e. while a frame is being drawn.
struct ResizingSurface {
    inner: RecordingSurface,
    trigger: Rc<RefCell<Option<(ManualResizeObserver, Vec2)>>>,
    container: Rc<RefCell<Option<Rc<StaticContainer<ResizingSurface>>>>>,
}

impl Surface for ResizingSurface {
    fn resize_backing(&mut self, width: u32, height: u32) {
        self.inner.resize_backing(width, height);
    }

    fn set_scale(&mut self, scale: f32) {
        self.inner.set_scale(scale);
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.inner.clear_rect(x, y, width, height);
        let fired = self.trigger.borrow_mut().take();
        if let Some((observer, size)) = fired {
            if let Some(container) = self.container.borrow().as_ref() {
                container.set_content_box(size);
            }
            observer.notify();
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.inner.stroke_line(from, to, color, width);
    }

    fn fill_radial_disc(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        self.inner.fill_radial_disc(center, radius, inner, outer);
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.inner.fill_disc(center, radius, color);
    }
}

#[test]
fn test_mid_frame_resize_applies_before_next_frame() {
    let log = RecordingSurface::new();
    let trigger = Rc::new(RefCell::new(None));
    let container_slot = Rc::new(RefCell::new(None));
    let surface = ResizingSurface {
        inner: log.clone(),
        trigger: trigger.clone(),
        container: container_slot.clone(),
    };
    let container = Rc::new(StaticContainer::new(Vec2::new(200.0, 100.0), 1.0, surface));
    *container_slot.borrow_mut() = Some(container.clone());

    let scheduler = Rc::new(ManualScheduler::new());
    let observer = ManualResizeObserver::new();
    let mut renderer = ParticleFieldRenderer::new(FieldConfig::default().with_seed(7), scheduler.clone());
    renderer
        .mount(container.clone(), Box::new(observer.clone()))
        .unwrap();

    *trigger.borrow_mut() = Some((observer, Vec2::new(120.0, 60.0)));
    log.clear_log();
    scheduler.run_frame();
    // The notification could not be applied while the frame held the state.
    assert_eq!(renderer.logical_size(), Some(Vec2::new(200.0, 100.0)));
    assert!(!log
        .commands()
        .iter()
        .any(|c| matches!(c, DrawCommand::ResizeBacking { .. })));

    log.clear_log();
    scheduler.run_frame();
    let commands = log.commands();
    assert_eq!(commands[0], DrawCommand::ResizeBacking { width: 120, height: 60 });
    assert_eq!(commands[1], DrawCommand::DisplaySize(Vec2::new(120.0, 60.0)));
    assert_eq!(commands[2], DrawCommand::SetScale(1.0));
    assert_eq!(
        commands[3],
        DrawCommand::ClearRect { x: 0.0, y: 0.0, width: 120.0, height: 60.0 }
    );
    assert_eq!(renderer.logical_size(), Some(Vec2::new(120.0, 60.0)));

    renderer.unmount();
    container_slot.borrow_mut().take();
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_no_drawing_after_unmount() {
    let mut h = harness(Vec2::new(800.0, 600.0), 1.0, FieldConfig::default());
    assert_eq!(h.scheduler.run_frames(5), 5);
    assert_eq!(h.renderer.frames_rendered(), 5);
    assert_eq!(h.scheduler.pending(), 1);

    h.renderer.unmount();
    assert!(!h.renderer.is_mounted());
    assert_eq!(h.scheduler.pending(), 0);
    assert!(!h.observer.is_connected());

    h.surface.clear_log();
    assert_eq!(h.scheduler.run_frames(5), 0);
    assert!(!h.observer.notify());
    assert!(h.surface.is_empty());
}

#[test]
fn test_unmount_is_safe_to_repeat() {
    let mut h = harness(Vec2::new(10.0, 10.0), 1.0, FieldConfig::default());
    h.renderer.unmount();
    h.renderer.unmount();
    assert_eq!(h.renderer.frames_rendered(), 0);
    assert!(h.renderer.particles().is_none());
}

#[test]
fn test_remount_reseeds_field() {
    let mut h = harness(Vec2::new(400.0, 400.0), 1.0, FieldConfig::default().with_seed(8));
    h.scheduler.run_frames(10);
    h.renderer.unmount();

    let fresh = Rc::new(StaticContainer::new(Vec2::new(400.0, 400.0), 1.0, RecordingSurface::new()));
    h.renderer
        .mount(fresh, Box::new(ManualResizeObserver::new()))
        .unwrap();
    assert_eq!(h.renderer.frames_rendered(), 0);
    assert_eq!(h.scheduler.pending(), 1);
}

#[test]
fn test_instances_are_independent() {
    let scheduler = Rc::new(ManualScheduler::new());
    let surfaces = [RecordingSurface::new(), RecordingSurface::new()];
    let mut renderers: Vec<_> = surfaces
        .iter()
        .map(|s| {
            let container = Rc::new(StaticContainer::new(Vec2::new(300.0, 200.0), 1.0, s.clone()));
            let mut r = ParticleFieldRenderer::new(FieldConfig::default(), scheduler.clone());
            r.mount(container, Box::new(ManualResizeObserver::new())).unwrap();
            r
        })
        .collect();

    assert_eq!(scheduler.run_frames(2), 4);
    renderers[0].unmount();
    surfaces[0].clear_log();
    surfaces[1].clear_log();

    assert_eq!(scheduler.run_frames(3), 3);
    assert!(surfaces[0].is_empty());
    assert!(!surfaces[1].is_empty());
    assert_eq!(renderers[1].frames_rendered(), 5);
}

#[test]
fn test_repeated_resizes_track_container() {
    let h = harness(Vec2::new(100.0, 100.0), 1.0, FieldConfig::default());
    for size in [Vec2::new(50.0, 50.0), Vec2::new(75.0, 25.0)] {
        h.container.set_content_box(size);
        assert!(h.observer.notify());
        assert_eq!(h.renderer.logical_size(), Some(size));
    }
    assert_eq!(h.container.content_box(), Vec2::new(75.0, 25.0));
}
