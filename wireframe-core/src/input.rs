//! Pointer, wheel and resize handling.
//!
//! [`InputController`] is a small state machine: idle, rotating (primary drag) or
//! panning (secondary drag). Hosts translate their native events into
//! [`InputEvent`]s and honour the returned [`EventResponse`].

use std::f64::consts::PI;

use nalgebra::Point2;
use tracing::trace;

use crate::projection::{CameraState, Resolution, UNIT_ZOOM};
use crate::transform::RotationState;

/// Zoom divisor applied to wheel steps once zoom reaches [`UNIT_ZOOM`]
const WHEEL_ACCELERATION: f64 = 60.0;

/// Legacy `detail` units per wheel notch
const LINES_PER_NOTCH: f64 = 3.0;

/// Pixel-mode wheel distance per notch
const PIXELS_PER_NOTCH: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

/// Raw wheel movement as reported by a host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelDelta {
    /// Signed notches; positive zooms in
    Notches(f64),
    /// Line units, positive scrolls down (legacy `detail`, DOM line mode)
    Lines(f64),
    /// Pixel units, positive scrolls down (DOM pixel mode)
    Pixels(f64),
}

impl WheelDelta {
    /// Signed notch count, positive meaning zoom in
    pub fn normalize(self) -> f64 {
        match self {
            Self::Notches(n) => n,
            Self::Lines(d) => -d / LINES_PER_NOTCH,
            Self::Pixels(d) => -d / PIXELS_PER_NOTCH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown {
        button: PointerButton,
        position: Point2<f64>,
    },
    PointerMove {
        position: Point2<f64>,
    },
    /// Release anywhere, including outside the surface
    PointerUp,
    Wheel(WheelDelta),
    ContextMenu,
    Resize(Resolution),
}

/// Whether the host should suppress the native default action of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Passthrough,
    Consumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Idle,
    Rotating,
    Panning,
}

/// Snapshot taken when a drag starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSession {
    Rotate {
        start: Point2<f64>,
        rotation: RotationState,
    },
    Pan {
        start: Point2<f64>,
        origin: Point2<f64>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct InputController {
    session: Option<DragSession>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InputState {
        match self.session {
            None => InputState::Idle,
            Some(DragSession::Rotate { .. }) => InputState::Rotating,
            Some(DragSession::Pan { .. }) => InputState::Panning,
        }
    }

    /// Drop any drag in progress
    pub fn reset(&mut self) {
        self.session = None;
    }

    pub fn handle(
        &mut self,
        event: InputEvent,
        camera: &mut CameraState,
        resolution: &mut Resolution,
    ) -> EventResponse {
        match event {
            InputEvent::PointerDown { button, position } => {
                self.press(button, position, camera);
                EventResponse::Consumed
            }
            InputEvent::PointerMove { position } => {
                self.drag(position, camera, *resolution);
                EventResponse::Passthrough
            }
            InputEvent::PointerUp => {
                self.session = None;
                EventResponse::Passthrough
            }
            InputEvent::Wheel(delta) => {
                apply_wheel(camera, delta);
                EventResponse::Consumed
            }
            InputEvent::ContextMenu => EventResponse::Consumed,
            InputEvent::Resize(size) => {
                *resolution = size;
                camera.recenter(size);
                EventResponse::Passthrough
            }
        }
    }

    fn press(&mut self, button: PointerButton, start: Point2<f64>, camera: &CameraState) {
        let session = match button {
            PointerButton::Primary => DragSession::Rotate {
                start,
                rotation: camera.rotation,
            },
            PointerButton::Secondary => DragSession::Pan {
                start,
                origin: camera.origin,
            },
            PointerButton::Other => return,
        };
        trace!(?session, "drag started");
        self.session = Some(session);
    }

    fn drag(&self, pointer: Point2<f64>, camera: &mut CameraState, resolution: Resolution) {
        match self.session {
            None => {}
            Some(DragSession::Rotate { start, rotation }) => {
                if resolution.width > 0 {
                    camera.rotation.x =
                        rotation.x + (start.x - pointer.x) / f64::from(resolution.width) * PI;
                }
                if resolution.height > 0 {
                    camera.rotation.y =
                        rotation.y + (pointer.y - start.y) / f64::from(resolution.height) * PI;
                }
            }
            Some(DragSession::Pan { start, origin }) => {
                camera.origin.x = origin.x - (start.x - pointer.x);
                camera.origin.y = origin.y - (start.y - pointer.y);
            }
        }
    }
}

/// Step the zoom by one normalized wheel movement.
///
/// Steps are multiplied by `zoom / 60` from zoom 100 upwards so zooming feels uniform
/// at large scales; below that they are applied as-is. The result never drops below 1.
pub fn apply_wheel(camera: &mut CameraState, delta: WheelDelta) {
    let zoom = camera.zoom();
    let step = delta.normalize();
    let step = if zoom >= UNIT_ZOOM {
        step * (zoom / WHEEL_ACCELERATION)
    } else {
        step
    };
    camera.set_zoom(zoom + step);
}
