/// Camera state and vertex projection
use nalgebra::Point2;

use crate::geometry::Vertex;
use crate::transform::{RotationState, Transform};

/// Smallest zoom the camera will accept
pub const MIN_ZOOM: f64 = 1.0;

/// Zoom that maps one model unit to one pixel
pub const UNIT_ZOOM: f64 = 100.0;

/// Drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// A projected vertex: pixel position plus a zoom-scaled depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Everything the projector needs besides the vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub rotation: RotationState,
    zoom: f64,
    pub origin: Point2<f64>,
}

impl CameraState {
    /// Unrotated camera centred on `resolution`. Zoom is clamped to at least 1.
    pub fn new(zoom: f64, resolution: Resolution) -> Self {
        Self {
            rotation: RotationState::zero(),
            zoom: clamp_zoom(zoom),
            origin: resolution.center(),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Move the pan origin back to the centre of `resolution`
    pub fn recenter(&mut self, resolution: Resolution) {
        self.origin = resolution.center();
    }

    pub fn project(&self, vertex: &Vertex) -> ScreenPoint {
        project(vertex, &self.rotation, self.zoom, &self.origin)
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    // NaN compares false and would otherwise survive `max`
    if zoom.is_nan() {
        MIN_ZOOM
    } else {
        zoom.max(MIN_ZOOM)
    }
}

/// Project a model-space vertex onto the drawing surface.
///
/// The vertex is rotated with [`Transform::twin_y_rotate`], scaled by `zoom / 100`
/// and translated to `origin`, with screen y growing downwards. There is no
/// perspective divide.
pub fn project(
    vertex: &Vertex,
    rotation: &RotationState,
    zoom: f64,
    origin: &Point2<f64>,
) -> ScreenPoint {
    let rotated = Transform::twin_y_rotate(&vertex.position, rotation);
    let scale = zoom / UNIT_ZOOM;

    ScreenPoint {
        x: rotated.x * scale + origin.x,
        y: origin.y - rotated.y * scale,
        z: rotated.z * zoom,
    }
}
