/// Drawing surface abstraction and the per-frame polygon renderer
use std::time::Duration;

use crate::config::Options;
use crate::geometry::{Mesh, Polygon};
use crate::projection::{CameraState, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

/// A 2D path-drawing target, shaped after the canvas 2D context
pub trait Surface {
    /// Size the host currently gives the surface on screen
    fn client_size(&self) -> Resolution;
    /// Resize the pixel buffer. May reset drawing state.
    fn set_size(&mut self, resolution: Resolution);

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);
    fn fill(&mut self);

    fn set_line_width(&mut self, width: f64);
    fn set_stroke_style(&mut self, style: &str);
    fn set_fill_style(&mut self, style: &str);
    fn set_shadow_blur(&mut self, blur: f64);
    fn set_line_cap(&mut self, cap: LineCap);
}

/// Delayed single-shot callbacks used to pace frames
pub trait FrameTimer {
    type Handle;

    /// Arrange for the next frame to be drawn after `delay`
    fn schedule(&mut self, delay: Duration) -> Self::Handle;
    /// Cancel a scheduled frame; cancelling one that already fired is a no-op
    fn cancel(&mut self, handle: Self::Handle);
}

/// Stroke and fill configuration for a frame
#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    line_width: f64,
    stroke: Option<String>,
    fill: Option<String>,
}

impl Renderer {
    pub fn new(line_width: f64, stroke: Option<String>, fill: Option<String>) -> Self {
        Self {
            line_width,
            stroke,
            fill,
        }
    }

    pub fn from_options(options: &Options) -> Self {
        Self::new(
            options.line_width,
            options.stroke.clone(),
            options.fill.clone(),
        )
    }

    /// Push line and colour state to the surface
    pub fn apply_style<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.set_line_width(self.line_width);
        if let Some(stroke) = &self.stroke {
            surface.set_stroke_style(stroke);
        }
        if let Some(fill) = &self.fill {
            surface.set_fill_style(fill);
        }
        surface.set_shadow_blur(0.0);
        surface.set_line_cap(LineCap::Round);
    }

    /// Clear the surface and draw every polygon in mesh order
    pub fn render_mesh<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        mesh: &Mesh,
        camera: &CameraState,
        resolution: Resolution,
    ) {
        surface.clear_rect(
            0.0,
            0.0,
            f64::from(resolution.width),
            f64::from(resolution.height),
        );
        for polygon in &mesh.polygons {
            self.render_polygon(surface, polygon, camera);
        }
    }

    fn render_polygon<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        polygon: &Polygon,
        camera: &CameraState,
    ) {
        let Some((first, rest)) = polygon.vertices().split_first() else {
            return;
        };

        surface.begin_path();
        let start = camera.project(first);
        surface.move_to(start.x, start.y);
        for vertex in rest {
            let point = camera.project(vertex);
            surface.line_to(point.x, point.y);
        }
        surface.close_path();

        if self.stroke.is_some() {
            surface.stroke();
        }
        if self.fill.is_some() {
            surface.fill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex;
    use crate::test_support::{DrawCommand, RecordingSurface};

    fn triangle() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_polygon(
            Polygon::new(vec![
                Vertex::new(0.0, 0.0, 0.0),
                Vertex::new(1.0, 0.0, 0.0),
                Vertex::new(0.0, 1.0, 0.0),
            ])
            .unwrap(),
        );
        mesh
    }

    #[test]
    fn test_polygon_is_a_closed_path() {
        let resolution = Resolution::new(20, 10);
        let camera = CameraState::new(100.0, resolution);
        let renderer = Renderer::new(1.0, Some("black".into()), Some("grey".into()));
        let mut surface = RecordingSurface::new(resolution);

        renderer.render_mesh(&mut surface, &triangle(), &camera, resolution);

        assert_eq!(
            surface.commands,
            vec![
                DrawCommand::ClearRect(0.0, 0.0, 20.0, 10.0),
                DrawCommand::BeginPath,
                DrawCommand::MoveTo(10.0, 5.0),
                DrawCommand::LineTo(11.0, 5.0),
                DrawCommand::LineTo(10.0, 4.0),
                DrawCommand::ClosePath,
                DrawCommand::Stroke,
                DrawCommand::Fill,
            ]
        );
    }

    #[test]
    fn test_disabled_passes_are_skipped() {
        let resolution = Resolution::new(20, 10);
        let camera = CameraState::new(100.0, resolution);
        let mut surface = RecordingSurface::new(resolution);

        Renderer::new(1.0, None, Some("grey".into())).render_mesh(
            &mut surface,
            &triangle(),
            &camera,
            resolution,
        );
        assert!(!surface.commands.contains(&DrawCommand::Stroke));
        assert!(surface.commands.contains(&DrawCommand::Fill));

        surface.commands.clear();
        Renderer::new(1.0, Some("black".into()), None).render_mesh(
            &mut surface,
            &triangle(),
            &camera,
            resolution,
        );
        assert!(surface.commands.contains(&DrawCommand::Stroke));
        assert!(!surface.commands.contains(&DrawCommand::Fill));
    }

    #[test]
    fn test_apply_style() {
        let mut surface = RecordingSurface::new(Resolution::new(1, 1));
        Renderer::new(0.2, Some("red".into()), None).apply_style(&mut surface);
        assert_eq!(
            surface.commands,
            vec![
                DrawCommand::LineWidth(0.2),
                DrawCommand::StrokeStyle("red".into()),
                DrawCommand::ShadowBlur(0.0),
                DrawCommand::LineCap(LineCap::Round),
            ]
        );
    }
}
