//! A single wireframe widget bound to one surface.
//!
//! Loading is split in two so hosts can await the fetch without holding the instance:
//! [`WireframeInstance::attach`] and [`WireframeInstance::reconfigure`] hand back a
//! [`LoadRequest`], the host fetches the mesh (usually through [`crate::loader::load`]),
//! then passes the result to [`WireframeInstance::complete_load`]. Every request carries
//! a generation number and only the latest one is ever applied.

use tracing::{debug, info, warn};

use crate::config::{Options, Settings};
use crate::error::{ConfigError, LoadError};
use crate::geometry::Mesh;
use crate::input::{EventResponse, InputController, InputEvent, InputState};
use crate::projection::{CameraState, Resolution};
use crate::render::{FrameTimer, Renderer, Surface};

/// A mesh fetch the instance is waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    generation: u64,
    location: String,
}

impl LoadRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The mesh replaced the previous one and the frame loop is running
    Applied { polygons: usize },
    /// A newer attach or reconfigure superseded this request; nothing changed
    Stale,
}

pub struct WireframeInstance<S: Surface, T: FrameTimer> {
    surface: S,
    timer: T,
    settings: Settings,
    options: Options,
    renderer: Renderer,
    camera: CameraState,
    resolution: Resolution,
    input: InputController,
    mesh: Mesh,
    pending_frame: Option<T::Handle>,
    generation: u64,
}

impl<S: Surface, T: FrameTimer> WireframeInstance<S, T> {
    /// Bind to a surface and start loading the configured mesh
    pub fn attach(
        surface: S,
        timer: T,
        settings: Settings,
    ) -> Result<(Self, LoadRequest), ConfigError> {
        let options = Options::resolve(&settings)?;
        let resolution = surface.client_size();

        let mut instance = Self {
            surface,
            timer,
            renderer: Renderer::from_options(&options),
            camera: CameraState::new(options.zoom, resolution),
            resolution,
            settings,
            options,
            input: InputController::new(),
            mesh: Mesh::new(),
            pending_frame: None,
            generation: 0,
        };
        let request = instance.init();
        Ok((instance, request))
    }

    /// Merge new settings over the current ones and restart from a fresh load.
    ///
    /// On error nothing changes: the previous options, mesh and frame loop are kept.
    pub fn reconfigure(&mut self, settings: Settings) -> Result<LoadRequest, ConfigError> {
        let merged = settings.merged_over(&self.settings);
        let options = Options::resolve(&merged)?;
        self.settings = merged;
        self.options = options;
        Ok(self.init())
    }

    fn init(&mut self) -> LoadRequest {
        self.stop();
        self.generation += 1;

        self.renderer = Renderer::from_options(&self.options);
        self.mesh = Mesh::new();
        self.input.reset();
        self.resolution = self.surface.client_size();
        self.camera = CameraState::new(self.options.zoom, self.resolution);
        self.resize_surface();

        debug!(
            generation = self.generation,
            location = %self.options.url,
            "initialized"
        );
        LoadRequest {
            generation: self.generation,
            location: self.options.url.clone(),
        }
    }

    /// Apply the result of a fetch started by `request`.
    ///
    /// Results for superseded requests are dropped, failed or not. A failed current
    /// request leaves the frame loop stopped.
    pub fn complete_load(
        &mut self,
        request: &LoadRequest,
        result: Result<Mesh, LoadError>,
    ) -> Result<LoadOutcome, LoadError> {
        if request.generation != self.generation {
            warn!(
                generation = request.generation,
                current = self.generation,
                location = %request.location,
                "ignoring superseded mesh load"
            );
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(mesh) => {
                let polygons = mesh.len();
                info!(location = %request.location, polygons, "starting frame loop");
                self.mesh = mesh;
                self.render_frame();
                Ok(LoadOutcome::Applied { polygons })
            }
            Err(error) => {
                warn!(location = %request.location, %error, "mesh load failed");
                Err(error)
            }
        }
    }

    /// Draw one frame and schedule the next, replacing any frame already pending
    pub fn render_frame(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.timer.cancel(handle);
        }
        self.renderer
            .render_mesh(&mut self.surface, &self.mesh, &self.camera, self.resolution);
        self.pending_frame = Some(self.timer.schedule(self.options.frame_interval()));
    }

    /// Feed one host event through the input state machine
    pub fn handle_input(&mut self, event: InputEvent) -> EventResponse {
        let response = self
            .input
            .handle(event, &mut self.camera, &mut self.resolution);
        if let InputEvent::Resize(_) = event {
            self.resize_surface();
        }
        response
    }

    /// Re-read the surface's on-screen size after the host reports a resize
    pub fn handle_resize(&mut self) -> EventResponse {
        let size = self.surface.client_size();
        self.handle_input(InputEvent::Resize(size))
    }

    fn resize_surface(&mut self) {
        self.surface.set_size(self.resolution);
        // A resized buffer may have lost its drawing state
        self.renderer.apply_style(&mut self.surface);
    }

    /// Cancel the pending frame, if any
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            debug!("cancelling pending frame");
            self.timer.cancel(handle);
        }
    }

    /// Stop drawing for good; loads still in flight will be ignored
    pub fn detach(&mut self) {
        self.stop();
        self.input.reset();
        self.generation += 1;
    }

    pub fn is_running(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn input_state(&self) -> InputState {
        self.input.state()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}
