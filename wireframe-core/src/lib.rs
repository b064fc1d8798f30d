//! Wireframe Core Library - host-agnostic mesh loading, projection and interaction
//!
//! This library provides everything a wireframe widget needs apart from the host:
//! the OFF-style mesh parser, the twin-Y projection, the drag/zoom state machine,
//! the polygon renderer and the instance lifecycle that ties them together.
//! Hosts supply a [`Surface`], a [`FrameTimer`] and a [`MeshSource`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod instance;
pub mod loader;
pub mod off;
pub mod projection;
pub mod render;
pub mod transform;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{Options, Settings};
pub use error::{ConfigError, LoadError, WireframeError, WireframeResult};
pub use geometry::{Mesh, Polygon, Vertex};
pub use input::{EventResponse, InputEvent, InputState, PointerButton, WheelDelta};
pub use instance::{LoadOutcome, LoadRequest, WireframeInstance};
pub use loader::{MemorySource, MeshSource};
pub use projection::{project, CameraState, Resolution, ScreenPoint};
pub use render::{FrameTimer, LineCap, Renderer, Surface};
pub use transform::{RotationState, Transform};
