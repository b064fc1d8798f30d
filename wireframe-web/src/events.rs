//! DOM listeners feeding the input state machine.
//!
//! Every listener belongs to one instance and is removed when that instance detaches.
//! The wheel listener sits on the instance's own canvas, never on the document.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use nalgebra::Point2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, MouseEvent, WheelEvent};
use wireframe_core::{EventResponse, InputEvent, PointerButton, WheelDelta};

use crate::Instance;

/// A registered DOM listener, unregistered on drop
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Route a DOM event through the instance, suppressing the default action when asked
pub fn forward<F>(instance: &Rc<RefCell<Instance>>, translate: F) -> Closure<dyn FnMut(Event)>
where
    F: Fn(&Event) -> Option<InputEvent> + 'static,
{
    let target: Weak<RefCell<Instance>> = Rc::downgrade(instance);
    Closure::new(move |event: Event| {
        let Some(input) = translate(&event) else {
            return;
        };
        let Some(instance) = target.upgrade() else {
            return;
        };
        let Ok(mut instance) = instance.try_borrow_mut() else {
            return;
        };
        if instance.handle_input(input) == EventResponse::Consumed {
            event.prevent_default();
        }
    })
}

/// Resize notifications carry no size; the instance re-reads its canvas
pub fn forward_resize(instance: &Rc<RefCell<Instance>>) -> Closure<dyn FnMut(Event)> {
    let target: Weak<RefCell<Instance>> = Rc::downgrade(instance);
    Closure::new(move |_event: Event| {
        if let Some(instance) = target.upgrade() {
            if let Ok(mut instance) = instance.try_borrow_mut() {
                instance.handle_resize();
            }
        }
    })
}

/// `MouseEvent.button`: 0 is the primary button, 2 the secondary
pub fn pointer_button(button: i16) -> PointerButton {
    match button {
        0 => PointerButton::Primary,
        2 => PointerButton::Secondary,
        _ => PointerButton::Other,
    }
}

const DOM_DELTA_LINE: u32 = 1;
const DOM_DELTA_PAGE: u32 = 2;

/// Normalize `WheelEvent.deltaY` by its `deltaMode`
pub fn wheel_delta(mode: u32, delta_y: f64) -> WheelDelta {
    match mode {
        DOM_DELTA_LINE => WheelDelta::Lines(delta_y),
        DOM_DELTA_PAGE => WheelDelta::Notches(-delta_y.signum()),
        _ => WheelDelta::Pixels(delta_y),
    }
}

fn page_position(event: &MouseEvent) -> Point2<f64> {
    Point2::new(f64::from(event.page_x()), f64::from(event.page_y()))
}

pub fn pointer_down(event: &Event) -> Option<InputEvent> {
    let event = event.dyn_ref::<MouseEvent>()?;
    Some(InputEvent::PointerDown {
        button: pointer_button(event.button()),
        position: page_position(event),
    })
}

pub fn pointer_move(event: &Event) -> Option<InputEvent> {
    let event = event.dyn_ref::<MouseEvent>()?;
    Some(InputEvent::PointerMove {
        position: page_position(event),
    })
}

pub fn pointer_up(_event: &Event) -> Option<InputEvent> {
    Some(InputEvent::PointerUp)
}

pub fn context_menu(_event: &Event) -> Option<InputEvent> {
    Some(InputEvent::ContextMenu)
}

pub fn wheel(event: &Event) -> Option<InputEvent> {
    let event = event.dyn_ref::<WheelEvent>()?;
    Some(InputEvent::Wheel(wheel_delta(
        event.delta_mode(),
        event.delta_y(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_buttons() {
        assert_eq!(pointer_button(0), PointerButton::Primary);
        assert_eq!(pointer_button(2), PointerButton::Secondary);
        assert_eq!(pointer_button(1), PointerButton::Other);
    }

    #[test]
    fn test_wheel_modes() {
        assert_eq!(wheel_delta(0, -100.0).normalize(), 1.0);
        assert_eq!(wheel_delta(1, 3.0).normalize(), -1.0);
        assert_eq!(wheel_delta(2, 1.0).normalize(), -1.0);
    }
}
