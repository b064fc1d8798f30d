/// ASCII rasterizer that implements the core drawing surface on a character grid
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wireframe_core::{LineCap, Resolution, Surface};

/// Character luminosity ramp for coverage (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Upper bound on steps walked along one line segment
const MAX_SEGMENT_STEPS: usize = 16_384;

/// A paint colour with its opacity mapped onto the ramp
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ink {
    color: Color,
    level: usize,
}

impl Ink {
    /// Read a CSS-style colour: `rgb(..)`, `rgba(..)`, `#rrggbb` or a basic name
    fn parse(style: &str) -> Self {
        let style = style.trim().to_ascii_lowercase();
        let (color, alpha) = parse_functional(&style)
            .or_else(|| parse_hex(&style).map(|c| (c, 1.0)))
            .unwrap_or_else(|| (named_color(&style), 1.0));

        let top = LUMINOSITY_RAMP.len() - 1;
        let level = ((alpha.clamp(0.0, 1.0) * top as f64).round() as usize).clamp(1, top);
        Self { color, level }
    }

    fn glyph(&self) -> char {
        LUMINOSITY_RAMP[self.level]
    }
}

fn parse_functional(style: &str) -> Option<(Color, f64)> {
    let inner = style
        .strip_prefix("rgba(")
        .or_else(|| style.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let channel = |i: usize| -> Option<u8> {
        let value: f64 = parts.get(i)?.parse().ok()?;
        Some(value.clamp(0.0, 255.0) as u8)
    };
    let color = Color::Rgb {
        r: channel(0)?,
        g: channel(1)?,
        b: channel(2)?,
    };
    let alpha = match parts.get(3) {
        Some(a) => a.parse().ok()?,
        None => 1.0,
    };
    Some((color, alpha))
}

fn parse_hex(style: &str) -> Option<Color> {
    let hex = style.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(Color::Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

fn named_color(name: &str) -> Color {
    match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "fuchsia" => Color::Magenta,
        "cyan" | "aqua" => Color::Cyan,
        "grey" | "gray" => Color::Grey,
        _ => Color::White,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
    level: usize,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        color: Color::Reset,
        level: 0,
    };
}

#[derive(Debug, Clone, Default)]
struct Subpath {
    points: Vec<(f64, f64)>,
    closed: bool,
}

/// Character-grid surface; one cell is one pixel
pub struct AsciiSurface {
    client: Resolution,
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    path: Vec<Subpath>,
    stroke_ink: Ink,
    fill_ink: Ink,
}

impl AsciiSurface {
    pub fn new(client: Resolution) -> Self {
        Self {
            client,
            width: 0,
            height: 0,
            cells: Vec::new(),
            path: Vec::new(),
            stroke_ink: Ink::parse("black"),
            fill_ink: Ink::parse("black"),
        }
    }

    /// Record the size the terminal now offers; takes effect on the next resize
    pub fn set_client_size(&mut self, client: Resolution) {
        self.client = client;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn glyph_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].glyph)
    }

    /// One string per row, for inspection
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|c| c.glyph).collect())
            .collect()
    }

    /// Brighter ink wins, so later translucent fills never hide earlier strokes
    fn plot(&mut self, x: i64, y: i64, ink: Ink) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let cell = &mut self.cells[y as usize * self.width + x as usize];
        if ink.level >= cell.level {
            *cell = Cell {
                glyph: ink.glyph(),
                color: ink.color,
                level: ink.level,
            };
        }
    }

    fn draw_segment(&mut self, from: (f64, f64), to: (f64, f64), ink: Ink) {
        if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
            return;
        }
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = (dx.abs().max(dy.abs()).ceil() as usize).clamp(1, MAX_SEGMENT_STEPS);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (from.0 + dx * t).floor() as i64;
            let y = (from.1 + dy * t).floor() as i64;
            self.plot(x, y, ink);
        }
    }

    /// Even-odd scanline fill sampled at cell centres
    fn fill_path(&mut self, ink: Ink) {
        let edges: Vec<((f64, f64), (f64, f64))> = self
            .path
            .iter()
            .filter(|sub| sub.points.len() >= 3)
            .flat_map(|sub| {
                let n = sub.points.len();
                (0..n).map(move |i| (sub.points[i], sub.points[(i + 1) % n]))
            })
            .collect();
        if edges
            .iter()
            .any(|(a, b)| ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()))
        {
            return;
        }

        let mut crossings = Vec::new();
        for row in 0..self.height {
            let y = row as f64 + 0.5;
            crossings.clear();
            for &((x0, y0), (x1, y1)) in &edges {
                if (y0 <= y) != (y1 <= y) {
                    crossings.push(x0 + (y - y0) / (y1 - y0) * (x1 - x0));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0) as i64;
                let end = (span[1] - 0.5).floor().min(self.width as f64 - 1.0) as i64;
                for x in start..=end {
                    self.plot(x, row as i64, ink);
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                writer.queue(SetForegroundColor(cell.color))?;
                writer.queue(Print(cell.glyph))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for AsciiSurface {
    fn client_size(&self) -> Resolution {
        self.client
    }

    fn set_size(&mut self, resolution: Resolution) {
        self.width = resolution.width as usize;
        self.height = resolution.height as usize;
        self.cells = vec![Cell::BLANK; self.width * self.height];
        self.path.clear();
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let x0 = x.max(0.0) as usize;
        let y0 = y.max(0.0) as usize;
        let x1 = ((x + width).max(0.0) as usize).min(self.width);
        let y1 = ((y + height).max(0.0) as usize).min(self.height);
        for row in y0..y1 {
            for col in x0..x1 {
                self.cells[row * self.width + col] = Cell::BLANK;
            }
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn close_path(&mut self) {
        if let Some(sub) = self.path.last_mut() {
            sub.closed = true;
        }
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(Subpath {
            points: vec![(x, y)],
            closed: false,
        });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        match self.path.last_mut() {
            Some(sub) if !sub.closed => sub.points.push((x, y)),
            _ => self.move_to(x, y),
        }
    }

    fn stroke(&mut self) {
        let ink = self.stroke_ink;
        let segments: Vec<((f64, f64), (f64, f64))> = self
            .path
            .iter()
            .flat_map(|sub| {
                let closing = sub
                    .closed
                    .then(|| (sub.points[sub.points.len() - 1], sub.points[0]));
                sub.points
                    .windows(2)
                    .map(|w| (w[0], w[1]))
                    .chain(closing)
                    .collect::<Vec<_>>()
            })
            .collect();
        for (from, to) in segments {
            self.draw_segment(from, to, ink);
        }
    }

    fn fill(&mut self) {
        self.fill_path(self.fill_ink);
    }

    fn set_line_width(&mut self, _width: f64) {
        // Lines are always one cell wide
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.stroke_ink = Ink::parse(style);
    }

    fn set_fill_style(&mut self, style: &str) {
        self.fill_ink = Ink::parse(style);
    }

    fn set_shadow_blur(&mut self, _blur: f64) {}

    fn set_line_cap(&mut self, _cap: LineCap) {}
}
