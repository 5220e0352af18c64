//! Browser backend: HTML canvas, `requestAnimationFrame` and DOM
//! `ResizeObserver`.
//!
//! From JavaScript:
//!
//! ```js
//! import init, { ParticleBackground } from "./particle_field.js";
//!
//! await init();
//! const background = new ParticleBackground(document.querySelector("#bg"));
//! // later, when the page section goes away:
//! background.unmount();
//! ```
//!
//! The canvas is sized to its parent's content box: the backing buffer in
//! device pixels, and its CSS `width`/`height` in logical pixels.

use std::cell::Cell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, ResizeObserverEntry};

use crate::color::Rgba;
use crate::config::FieldConfig;
use crate::error::Result;
use crate::host::{content_box_within, parse_css_px, Container, ResizeCallback, ResizeObserver};
use crate::renderer::ParticleFieldRenderer;
use crate::scheduler::{FrameCallback, FrameHandle, FrameScheduler};
use crate::surface::Surface;

/// A canvas and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    fn arc(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
    }
}

impl Surface for CanvasSurface {
    fn resize_backing(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_display_size(&mut self, size: Vec2) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", size.x));
        let _ = style.set_property("height", &format!("{}px", size.y));
    }

    fn set_scale(&mut self, scale: f32) {
        let s = scale as f64;
        let _ = self.ctx.set_transform(s, 0.0, 0.0, s, 0.0, 0.0);
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx
            .clear_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn fill_radial_disc(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        let (x, y) = (center.x as f64, center.y as f64);
        let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius as f64) else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, &inner.to_css());
        let _ = gradient.add_color_stop(1.0, &outer.to_css());
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.arc(center, radius);
        self.ctx.fill();
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.arc(center, radius);
        self.ctx.fill();
    }
}

/// Content rect last reported by a DOM `ResizeObserver`.
type ReportedBox = Rc<Cell<Option<Vec2>>>;

/// A canvas sized to the element that hosts it.
///
/// The content box is measured on the canvas's parent; a canvas without a
/// parent measures itself. Once an observer from
/// [`resize_observer`](Self::resize_observer) has fired, its content rect is
/// used as is.
pub struct CanvasContainer {
    canvas: HtmlCanvasElement,
    host: Element,
    reported: ReportedBox,
}

impl CanvasContainer {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let host = canvas
            .parent_element()
            .unwrap_or_else(|| canvas.clone().unchecked_into::<Element>());
        Self {
            canvas,
            host,
            reported: Rc::default(),
        }
    }

    /// Element whose size drives the canvas.
    pub fn host(&self) -> &Element {
        &self.host
    }

    /// Observer on the host element that feeds its content rect back here.
    pub fn resize_observer(&self) -> DomResizeObserver {
        DomResizeObserver::reporting(self.host.clone(), self.reported.clone())
    }

    /// Client area minus computed padding.
    fn measure(&self) -> Vec2 {
        let client = Vec2::new(self.host.client_width() as f32, self.host.client_height() as f32);
        let padding = web_sys::window()
            .and_then(|w| w.get_computed_style(&self.host).ok().flatten())
            .map(|style| {
                ["padding-top", "padding-right", "padding-bottom", "padding-left"]
                    .map(|side| parse_css_px(&style.get_property_value(side).unwrap_or_default()))
            })
            .unwrap_or_default();
        content_box_within(client, padding)
    }
}

impl Container for CanvasContainer {
    type Surface = CanvasSurface;

    fn content_box(&self) -> Vec2 {
        self.reported.get().unwrap_or_else(|| self.measure())
    }

    fn device_pixel_ratio(&self) -> f32 {
        web_sys::window().map_or(1.0, |w| w.device_pixel_ratio() as f32)
    }

    fn context_2d(&self) -> Option<CanvasSurface> {
        let ctx = self
            .canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(CanvasSurface {
            canvas: self.canvas.clone(),
            ctx,
        })
    }
}

/// Frames from `window.requestAnimationFrame`.
#[derive(Default)]
pub struct AnimationFrameScheduler;

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let Some(window) = web_sys::window() else {
            warn!("requestAnimationFrame unavailable: no window");
            return FrameHandle::new(0);
        };
        // Frees itself after the single invocation.
        let closure = Closure::once_into_js(move || callback());
        match window.request_animation_frame(closure.unchecked_ref()) {
            Ok(id) => FrameHandle::new(id as u64),
            Err(err) => {
                warn!("requestAnimationFrame failed: {err:?}");
                FrameHandle::new(0)
            }
        }
    }

    fn cancel(&self, handle: FrameHandle) {
        if handle.id() == 0 {
            return;
        }
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle.id() as i32);
        }
    }
}

type ObserverClosure = Closure<dyn FnMut(js_sys::Array, web_sys::ResizeObserver)>;

/// DOM `ResizeObserver` on one element.
pub struct DomResizeObserver {
    target: Element,
    report: Option<ReportedBox>,
    observer: Option<web_sys::ResizeObserver>,
    closure: Option<ObserverClosure>,
}

impl DomResizeObserver {
    pub fn new(target: Element) -> Self {
        Self {
            target,
            report: None,
            observer: None,
            closure: None,
        }
    }

    /// Observer that also stores each entry's content rect in `report`.
    fn reporting(target: Element, report: ReportedBox) -> Self {
        Self {
            target,
            report: Some(report),
            observer: None,
            closure: None,
        }
    }
}

impl ResizeObserver for DomResizeObserver {
    fn observe(&mut self, mut on_change: ResizeCallback) -> Result<()> {
        self.disconnect();
        let report = self.report.clone();
        let closure: ObserverClosure = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: web_sys::ResizeObserver| {
                if let Some(report) = &report {
                    let latest = entries
                        .iter()
                        .filter_map(|e| e.dyn_into::<ResizeObserverEntry>().ok())
                        .last();
                    if let Some(entry) = latest {
                        let rect = entry.content_rect();
                        report.set(Some(Vec2::new(rect.width() as f32, rect.height() as f32)));
                    }
                }
                on_change();
            },
        ) as Box<dyn FnMut(_, _)>);
        let observer = web_sys::ResizeObserver::new(closure.as_ref().unchecked_ref())?;
        observer.observe(&self.target);
        self.observer = Some(observer);
        self.closure = Some(closure);
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.closure = None;
    }
}

impl Drop for DomResizeObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Particle background mounted on a canvas element.
#[wasm_bindgen]
pub struct ParticleBackground {
    renderer: ParticleFieldRenderer<CanvasContainer, AnimationFrameScheduler>,
}

#[wasm_bindgen]
impl ParticleBackground {
    /// Mount the stock field on `canvas` and start animating.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> std::result::Result<ParticleBackground, JsValue> {
        Self::mount(canvas, FieldConfig::default())
    }

    /// Mount with a JSON configuration; missing keys take their defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        canvas: HtmlCanvasElement,
        config_json: &str,
    ) -> std::result::Result<ParticleBackground, JsValue> {
        let config = FieldConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::mount(canvas, config)
    }

    /// Stop animating and release the observer.
    pub fn unmount(&mut self) {
        self.renderer.unmount();
    }

    /// Frames drawn since mount.
    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> f64 {
        self.renderer.frames_rendered() as f64
    }
}

impl ParticleBackground {
    fn mount(canvas: HtmlCanvasElement, config: FieldConfig) -> std::result::Result<ParticleBackground, JsValue> {
        let container = Rc::new(CanvasContainer::new(canvas));
        let observer = container.resize_observer();
        let mut renderer = ParticleFieldRenderer::new(config, Rc::new(AnimationFrameScheduler));
        renderer
            .mount(container, Box::new(observer))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { renderer })
    }
}
