//! Canvas 2D surface, `setTimeout` frame timer and `fetch` mesh source.

use std::cell::RefCell;
use std::rc::Weak;
use std::time::Duration;

use gloo_net::http::Request;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};
use wireframe_core::{FrameTimer, LineCap, LoadError, MeshSource, Resolution, Surface};

use crate::Instance;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, context })
    }
}

impl Surface for CanvasSurface {
    fn client_size(&self) -> Resolution {
        Resolution::new(
            self.canvas.client_width().max(0) as u32,
            self.canvas.client_height().max(0) as u32,
        )
    }

    fn set_size(&mut self, resolution: Resolution) {
        self.canvas.set_width(resolution.width);
        self.canvas.set_height(resolution.height);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.clear_rect(x, y, width, height);
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }

    fn fill(&mut self) {
        self.context.fill();
    }

    fn set_line_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.context.set_stroke_style_str(style);
    }

    fn set_fill_style(&mut self, style: &str) {
        self.context.set_fill_style_str(style);
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.context.set_shadow_blur(blur);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.context.set_line_cap(line_cap_name(cap));
    }
}

pub(crate) fn line_cap_name(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Butt => "butt",
        LineCap::Round => "round",
        LineCap::Square => "square",
    }
}

/// Schedules frames with `window.setTimeout`, calling back into the owning instance
pub struct WindowTimer {
    window: Window,
    target: Weak<RefCell<Instance>>,
}

impl WindowTimer {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            target: Weak::new(),
        }
    }

    /// Point the timer at the instance that owns it
    pub fn bind(&mut self, target: Weak<RefCell<Instance>>) {
        self.target = target;
    }
}

impl FrameTimer for WindowTimer {
    type Handle = i32;

    fn schedule(&mut self, delay: Duration) -> i32 {
        let target = self.target.clone();
        let callback = Closure::once_into_js(move || {
            if let Some(instance) = target.upgrade() {
                if let Ok(mut instance) = instance.try_borrow_mut() {
                    instance.render_frame();
                }
            }
        });

        let millis = delay.as_millis().min(i32::MAX as u128) as i32;
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            Ok(handle) => handle,
            Err(error) => {
                web_sys::console::error_2(&JsValue::from_str("wireframe: setTimeout failed"), &error);
                0
            }
        }
    }

    fn cancel(&mut self, handle: i32) {
        self.window.clear_timeout_with_handle(handle);
    }
}

/// Fetches mesh text over HTTP; non-2xx responses are load failures
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchSource;

impl MeshSource for FetchSource {
    async fn fetch_text(&self, location: &str) -> Result<String, LoadError> {
        let response = Request::get(location)
            .send()
            .await
            .map_err(|e| LoadError::fetch(format!("{location}: {e}")))?;
        if !response.ok() {
            return Err(LoadError::fetch(format!(
                "{location}: HTTP {} {}",
                response.status(),
                response.status_text()
            )));
        }
        response
            .text()
            .await
            .map_err(|e| LoadError::fetch(format!("{location}: {e}")))
    }
}
