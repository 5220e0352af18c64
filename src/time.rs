//! Frame counting and achieved frame rate.
//!
//! Purely informational: particle motion is one velocity step per rendered
//! frame and never reads these values.
//!
//! # Example
//!
//! ```ignore
//! use particle_field::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // Once per rendered frame:
//! clock.tick();
//!
//! println!("Frame: {}", clock.frame());
//! println!("FPS: {:.1}", clock.fps());
//! ```

use web_time::{Duration, Instant};

/// Counts rendered frames and measures FPS over a sliding window.
#[derive(Debug)]
pub struct FrameClock {
    /// Total frames since creation.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// Create a clock that recomputes FPS every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: interval,
        }
    }

    /// Record one rendered frame.
    ///
    /// Returns `true` when the FPS estimate was refreshed by this tick.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval && !fps_elapsed.is_zero() {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return true;
        }
        false
    }

    /// Total frames since creation.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second, `0.0` until the first window closes.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
