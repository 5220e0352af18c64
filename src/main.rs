//! Headless export: render a particle field and save the last frame as PNG.
//!
//! ```text
//! particle-field [WIDTH] [HEIGHT] [FRAMES] [OUT.png] [CONFIG.json]
//! ```
//!
//! Set `RUST_LOG=debug` to see mount and resize details.

use std::rc::Rc;

use particle_field::prelude::*;

/// Positional argument `index`, or `default` when absent.
fn arg<T: std::str::FromStr>(args: &[String], index: usize, name: &str, default: T) -> Result<T> {
    match args.get(index) {
        Some(value) => value
            .parse()
            .map_err(|_| FieldError::InvalidConfig(format!("{name} must be a number, got {value:?}"))),
        None => Ok(default),
    }
}

fn run(args: &[String]) -> Result<()> {
    let width: f32 = arg(args, 1, "WIDTH", 800.0)?;
    let height: f32 = arg(args, 2, "HEIGHT", 600.0)?;
    let frames: usize = arg(args, 3, "FRAMES", 120)?;
    let out = args.get(4).cloned().unwrap_or_else(|| "particle-field.png".to_string());
    let config = match args.get(5) {
        Some(path) => FieldConfig::load(path)?,
        None => FieldConfig::default(),
    };

    log::info!(
        "Rendering {} particles on {}x{} for {} frames",
        config.particle_count, width, height, frames
    );

    let scheduler = Rc::new(ManualScheduler::new());
    let container = Rc::new(StaticContainer::new(
        Vec2::new(width, height),
        1.0,
        RasterSurface::new(),
    ));
    let mut field = ParticleFieldRenderer::new(config, scheduler.clone());
    field.mount(container, Box::new(ManualResizeObserver::new()))?;

    scheduler.run_frames(frames);

    field
        .with_surface(|surface| surface.save_png(&out))
        .unwrap_or(Err(FieldError::NoSurface))?;
    field.unmount();

    log::info!("Wrote {}", out);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
