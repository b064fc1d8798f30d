//! Browser host for the wireframe widget.
//!
//! `attach(canvas, options)` binds one instance to a canvas element and returns a
//! [`WireframeHandle`]. The handle owns the instance and every DOM listener it installed;
//! `detach()` (or freeing the handle from JS) removes them all.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlCanvasElement;
use wireframe_core::{loader, LoadOutcome, LoadRequest, Settings, WireframeInstance};

mod canvas;
mod events;

pub use canvas::{CanvasSurface, FetchSource, WindowTimer};
use events::Listener;

pub(crate) type Instance = WireframeInstance<CanvasSurface, WindowTimer>;

fn js_error(error: impl Display) -> JsValue {
    JsError::new(&error.to_string()).into()
}

/// Read a JS options object; `undefined` and `null` mean "no options"
fn settings_from_js(options: &JsValue) -> Result<Settings, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(Settings::default());
    }
    let json = js_sys::JSON::stringify(options)?
        .as_string()
        .unwrap_or_default();
    Settings::from_json(&json).map_err(js_error)
}

/// Fetch the requested mesh and hand it to the instance.
///
/// Resolves with the polygon count, or `undefined` when a newer load superseded this one.
fn start_load(instance: &Rc<RefCell<Instance>>, request: LoadRequest) -> Promise {
    let instance = Rc::downgrade(instance);
    future_to_promise(async move {
        let result = loader::load(&FetchSource, request.location()).await;

        let Some(instance) = instance.upgrade() else {
            return Ok(JsValue::UNDEFINED);
        };
        let outcome = instance.borrow_mut().complete_load(&request, result);
        match outcome {
            Ok(LoadOutcome::Applied { polygons }) => Ok(JsValue::from(polygons as u32)),
            Ok(LoadOutcome::Stale) => Ok(JsValue::UNDEFINED),
            Err(error) => {
                web_sys::console::error_1(&JsValue::from_str(&format!("wireframe: {error}")));
                Err(js_error(error))
            }
        }
    })
}

#[wasm_bindgen]
pub struct WireframeHandle {
    instance: Rc<RefCell<Instance>>,
    listeners: Vec<Listener>,
    loaded: Promise,
}

#[wasm_bindgen]
impl WireframeHandle {
    /// Merge new options over the current ones, reload the mesh and reset the camera
    pub fn reconfigure(&mut self, options: JsValue) -> Result<Promise, JsValue> {
        let settings = settings_from_js(&options)?;
        let request = self
            .instance
            .borrow_mut()
            .reconfigure(settings)
            .map_err(js_error)?;
        self.loaded = start_load(&self.instance, request);
        Ok(self.loaded.clone())
    }

    /// Promise for the most recent mesh load
    pub fn loaded(&self) -> Promise {
        self.loaded.clone()
    }

    pub fn zoom(&self) -> f64 {
        self.instance.borrow().camera().zoom()
    }

    pub fn polygons(&self) -> u32 {
        self.instance.borrow().mesh().len() as u32
    }

    /// Stop the frame loop and remove every listener this instance installed
    pub fn detach(&mut self) {
        self.listeners.clear();
        self.instance.borrow_mut().detach();
    }
}

/// Bind a wireframe to `canvas` and start loading `options.url`
#[wasm_bindgen]
pub fn attach(canvas: HtmlCanvasElement, options: JsValue) -> Result<WireframeHandle, JsValue> {
    let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
    let document = window.document().ok_or_else(|| js_error("no document"))?;
    let settings = settings_from_js(&options)?;

    let surface = CanvasSurface::new(canvas.clone())?;
    let (instance, request) =
        WireframeInstance::attach(surface, WindowTimer::new(window.clone()), settings)
            .map_err(js_error)?;
    let instance = Rc::new(RefCell::new(instance));
    instance.borrow_mut().timer_mut().bind(Rc::downgrade(&instance));

    let listeners = vec![
        Listener::new(&canvas, "mousedown", events::forward(&instance, events::pointer_down))?,
        Listener::new(&canvas, "mousemove", events::forward(&instance, events::pointer_move))?,
        Listener::new(&canvas, "contextmenu", events::forward(&instance, events::context_menu))?,
        Listener::new(&canvas, "wheel", events::forward(&instance, events::wheel))?,
        Listener::new(&document, "mouseup", events::forward(&instance, events::pointer_up))?,
        Listener::new(&window, "resize", events::forward_resize(&instance))?,
    ];

    let loaded = start_load(&instance, request);
    Ok(WireframeHandle {
        instance,
        listeners,
        loaded,
    })
}
