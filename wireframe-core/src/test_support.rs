//! Host doubles for exercising the core without a real surface or clock.

use std::time::Duration;

use crate::projection::Resolution;
use crate::render::{FrameTimer, LineCap, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetSize(Resolution),
    ClearRect(f64, f64, f64, f64),
    BeginPath,
    ClosePath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
    Fill,
    LineWidth(f64),
    StrokeStyle(String),
    FillStyle(String),
    ShadowBlur(f64),
    LineCap(LineCap),
}

/// Records every call in order
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub client: Resolution,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(client: Resolution) -> Self {
        Self {
            client,
            commands: Vec::new(),
        }
    }

    /// Closed paths in the most recent frame, as lists of points
    pub fn last_frame_paths(&self) -> Vec<Vec<(f64, f64)>> {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::ClearRect(..)))
            .map_or(0, |i| i + 1);

        let mut paths = Vec::new();
        let mut current = Vec::new();
        for command in &self.commands[start..] {
            match command {
                DrawCommand::BeginPath => current.clear(),
                DrawCommand::MoveTo(x, y) | DrawCommand::LineTo(x, y) => current.push((*x, *y)),
                DrawCommand::ClosePath => paths.push(std::mem::take(&mut current)),
                _ => {}
            }
        }
        paths
    }
}

impl Surface for RecordingSurface {
    fn client_size(&self) -> Resolution {
        self.client
    }

    fn set_size(&mut self, resolution: Resolution) {
        self.commands.push(DrawCommand::SetSize(resolution));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect(x, y, width, height));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.commands.push(DrawCommand::StrokeStyle(style.to_owned()));
    }

    fn set_fill_style(&mut self, style: &str) {
        self.commands.push(DrawCommand::FillStyle(style.to_owned()));
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.commands.push(DrawCommand::ShadowBlur(blur));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.commands.push(DrawCommand::LineCap(cap));
    }
}

/// A timer that only remembers what was asked of it
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    next: u32,
    pub pending: Vec<(u32, Duration)>,
    pub cancelled: Vec<u32>,
}

impl FrameTimer for ManualTimer {
    type Handle = u32;

    fn schedule(&mut self, delay: Duration) -> u32 {
        self.next += 1;
        self.pending.push((self.next, delay));
        self.next
    }

    fn cancel(&mut self, handle: u32) {
        self.pending.retain(|(id, _)| *id != handle);
        self.cancelled.push(handle);
    }
}
