use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use super::Surface;
use crate::color::Rgba;

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    ResizeBacking { width: u32, height: u32 },
    DisplaySize(Vec2),
    SetScale(f32),
    ClearRect { x: f32, y: f32, width: f32, height: f32 },
    Line { from: Vec2, to: Vec2, color: Rgba, width: f32 },
    RadialDisc { center: Vec2, radius: f32, inner: Rgba, outer: Rgba },
    Disc { center: Vec2, radius: f32, color: Rgba },
}

/// Surface that draws nothing and logs every call.
///
/// Clones share one log, so a test can keep a clone after handing the
/// surface to a renderer and inspect what was drawn, including after unmount.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    log: Rc<RefCell<Vec<DrawCommand>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the log.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.log.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Empty the log.
    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    fn push(&self, command: DrawCommand) {
        self.log.borrow_mut().push(command);
    }
}

impl Surface for RecordingSurface {
    fn resize_backing(&mut self, width: u32, height: u32) {
        self.push(DrawCommand::ResizeBacking { width, height });
    }

    fn set_display_size(&mut self, size: Vec2) {
        self.push(DrawCommand::DisplaySize(size));
    }

    fn set_scale(&mut self, scale: f32) {
        self.push(DrawCommand::SetScale(scale));
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawCommand::ClearRect { x, y, width, height });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.push(DrawCommand::Line { from, to, color, width });
    }

    fn fill_radial_disc(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        self.push(DrawCommand::RadialDisc { center, radius, inner, outer });
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.push(DrawCommand::Disc { center, radius, color });
    }
}
