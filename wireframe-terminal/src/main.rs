/// Wireframe Terminal - interactive OFF mesh viewer
///
/// Controls:
///   - Left drag: Rotate
///   - Right drag: Pan
///   - Wheel: Zoom
///   - R: Reload the mesh
///   - Q/ESC: Quit
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wireframe_core::{config::Numeric, MemorySource, Settings};
use wireframe_terminal::{FileSource, TerminalApp};

/// Demo mesh shown when no file is given
const CUBE: &str = include_str!("../assets/cube.off");
const CUBE_LOCATION: &str = "builtin:cube.off";

/// Render an OFF mesh as a rotating wireframe in the terminal
#[derive(Parser, Debug)]
#[command(name = "wireframe-terminal")]
#[command(version)]
struct Args {
    /// OFF mesh to display (a path or file:// URL); shows a cube when omitted
    #[arg(value_name = "MESH")]
    mesh: Option<String>,

    /// Initial zoom; 100 maps one model unit to one cell
    #[arg(long)]
    zoom: Option<f64>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Fill colour, e.g. "rgba(60, 60, 60, 0.1)"
    #[arg(long, default_value = "rgba(90, 90, 90, 0.1)")]
    fill: String,

    /// Stroke colour, e.g. "rgb(220, 220, 220)"
    #[arg(long, default_value = "rgba(220, 220, 220, 1)")]
    stroke: String,

    /// Stroke line width
    #[arg(long)]
    line: Option<f64>,

    /// Do not fill polygons
    #[arg(long)]
    no_fill: bool,

    /// Do not stroke polygon outlines
    #[arg(long)]
    no_stroke: bool,

    /// Path to log file for diagnostics
    #[arg(long, value_name = "PATH", default_value = "/tmp/wireframe-terminal.log")]
    log_file: PathBuf,
}

impl Args {
    fn settings(&self, url: &str) -> Settings {
        Settings {
            url: Some(url.to_owned()),
            zoom: self.zoom.map(Numeric::from),
            fps: self.fps.map(Numeric::from),
            fill: Some((!self.no_fill).then(|| self.fill.clone())),
            stroke: Some((!self.no_stroke).then(|| self.stroke.clone())),
            line: self.line.map(Numeric::from),
        }
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    // Log to a file to avoid interfering with the alternate screen
    if let Ok(log_file) = std::fs::File::create(&args.log_file) {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::sync::Arc::new(log_file)))
            .with(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
            .init();
    }

    match &args.mesh {
        Some(location) => {
            println!("Loading mesh: {}", location);
            let mut app = TerminalApp::new(FileSource, args.settings(location))?;
            println!("Loaded {} polygons", app.instance().mesh().len());
            app.run()?;
        }
        None => {
            let source = MemorySource::new().with(CUBE_LOCATION, CUBE);
            let mut app = TerminalApp::new(source, args.settings(CUBE_LOCATION))?;
            app.run()?;
        }
    }

    tracing::info!("viewer closed");
    Ok(())
}
