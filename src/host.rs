//! Host integration: the element a field is mounted into, and how it reports
//! size changes.
//!
//! A browser host backs these with a canvas, its parent element, and a DOM
//! `ResizeObserver` (see the `web` feature). [`StaticContainer`] and
//! [`ManualResizeObserver`] are headless stand-ins for export and tests.
//!
//! ```ignore
//! let container = Rc::new(StaticContainer::new(Vec2::new(800.0, 600.0), 2.0, RasterSurface::new()));
//! let observer = ManualResizeObserver::new();
//! renderer.mount(container.clone(), Box::new(observer.clone()))?;
//!
//! container.set_content_box(Vec2::new(400.0, 300.0));
//! observer.notify();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

use crate::error::Result;
use crate::surface::Surface;

/// Element that can host a drawable surface.
pub trait Container {
    /// Drawing context handed out by this container.
    type Surface: Surface;

    /// Current content-box size in logical units.
    fn content_box(&self) -> Vec2;

    /// Physical pixels per logical unit.
    fn device_pixel_ratio(&self) -> f32;

    /// Acquire the 2D drawing context, if the container has one.
    fn context_2d(&self) -> Option<Self::Surface>;
}

/// Called whenever the observed box changes size.
pub type ResizeCallback = Box<dyn FnMut()>;

/// Size-change notifications for one container.
///
/// The observer is bound to its container when constructed; `observe` only
/// supplies the callback.
pub trait ResizeObserver {
    /// Start delivering notifications to `on_change`.
    fn observe(&mut self, on_change: ResizeCallback) -> Result<()>;

    /// Stop delivering notifications and drop the callback.
    fn disconnect(&mut self);
}

/// Container with a size set by code rather than layout.
///
/// Hands out its surface once; a second `context_2d` call returns `None`,
/// matching a context that is already owned by a mounted renderer.
pub struct StaticContainer<S> {
    content_box: Cell<Vec2>,
    pixel_ratio: Cell<f32>,
    surface: RefCell<Option<S>>,
}

impl<S: Surface> StaticContainer<S> {
    pub fn new(content_box: Vec2, pixel_ratio: f32, surface: S) -> Self {
        Self {
            content_box: Cell::new(content_box),
            pixel_ratio: Cell::new(pixel_ratio),
            surface: RefCell::new(Some(surface)),
        }
    }

    /// Container with no drawing context at all.
    pub fn without_surface(content_box: Vec2, pixel_ratio: f32) -> Self {
        Self {
            content_box: Cell::new(content_box),
            pixel_ratio: Cell::new(pixel_ratio),
            surface: RefCell::new(None),
        }
    }

    /// Change the content box. Pair with an observer notification.
    pub fn set_content_box(&self, size: Vec2) {
        self.content_box.set(size);
    }

    /// Change the pixel ratio, e.g. when moved to another display.
    pub fn set_pixel_ratio(&self, ratio: f32) {
        self.pixel_ratio.set(ratio);
    }
}

impl<S: Surface> Container for StaticContainer<S> {
    type Surface = S;

    fn content_box(&self) -> Vec2 {
        self.content_box.get()
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.pixel_ratio.get()
    }

    fn context_2d(&self) -> Option<S> {
        self.surface.borrow_mut().take()
    }
}

/// Content box of an element whose client area (content plus padding, no
/// border) is `client`. `padding` is `[top, right, bottom, left]`.
pub fn content_box_within(client: Vec2, padding: [f32; 4]) -> Vec2 {
    let [top, right, bottom, left] = padding;
    (client - Vec2::new(left + right, top + bottom)).max(Vec2::ZERO)
}

/// Parse a computed CSS length such as `"16px"`. Anything else is `0.0`.
pub fn parse_css_px(value: &str) -> f32 {
    value
        .trim()
        .strip_suffix("px")
        .and_then(|n| n.trim().parse::<f32>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

#[derive(Default)]
struct ObserverSlot {
    callback: Option<ResizeCallback>,
    connected: bool,
}

/// Observer fired by calling [`notify`](Self::notify).
///
/// Clones share one slot: hand one clone to the renderer and keep another to
/// trigger resizes.
#[derive(Clone, Default)]
pub struct ManualResizeObserver {
    slot: Rc<RefCell<ObserverSlot>>,
}

impl ManualResizeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a callback is attached.
    pub fn is_connected(&self) -> bool {
        self.slot.borrow().connected
    }

    /// Deliver one size-change notification. Returns `false` when nothing
    /// is observing.
    pub fn notify(&self) -> bool {
        // Take the callback out so it may call back into this observer.
        let Some(mut callback) = self.slot.borrow_mut().callback.take() else {
            return false;
        };
        callback();
        let mut slot = self.slot.borrow_mut();
        if slot.connected && slot.callback.is_none() {
            slot.callback = Some(callback);
        }
        true
    }
}

impl ResizeObserver for ManualResizeObserver {
    fn observe(&mut self, on_change: ResizeCallback) -> Result<()> {
        let mut slot = self.slot.borrow_mut();
        slot.callback = Some(on_change);
        slot.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut slot = self.slot.borrow_mut();
        slot.callback = None;
        slot.connected = false;
    }
}
