/// Terminal host for the wireframe widget
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use nalgebra::Point2;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wireframe_core::{
    loader, EventResponse, InputEvent, LoadRequest, MeshSource, PointerButton, Resolution,
    Settings, WheelDelta, WireframeInstance, WireframeResult,
};

pub mod renderer;
pub mod source;
pub mod timer;

pub use renderer::AsciiSurface;
pub use source::FileSource;
pub use timer::DeadlineTimer;

/// Longest wait for input while no frame is scheduled
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp<M: MeshSource> {
    instance: WireframeInstance<AsciiSurface, DeadlineTimer>,
    source: M,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl<M: MeshSource> TerminalApp<M> {
    /// Attach to a surface the size of the terminal and load the first mesh
    pub fn new(source: M, settings: Settings) -> io::Result<Self> {
        let size = terminal_resolution()?;
        Self::with_resolution(source, settings, size)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn with_resolution(
        source: M,
        settings: Settings,
        size: Resolution,
    ) -> WireframeResult<Self> {
        let (instance, request) =
            WireframeInstance::attach(AsciiSurface::new(size), DeadlineTimer::new(), settings)?;
        let mut app = Self {
            instance,
            source,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.load(request)?;
        Ok(app)
    }

    fn load(&mut self, request: LoadRequest) -> WireframeResult<()> {
        let result = pollster::block_on(loader::load(&self.source, request.location()));
        self.instance.complete_load(&request, result)?;
        Ok(())
    }

    /// Re-read the mesh and reset the camera, keeping every option
    pub fn reload(&mut self) -> WireframeResult<()> {
        let request = self.instance.reconfigure(Settings::default())?;
        self.load(request)
    }

    pub fn instance(&self) -> &WireframeInstance<AsciiSurface, DeadlineTimer> {
        &self.instance
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        self.instance.detach();
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let wait = self.instance.timer().time_left(Instant::now(), IDLE_POLL);
            if event::poll(wait)? {
                let event = event::read()?;
                self.handle_event(event);
            }

            if self.instance.timer_mut().take_due(Instant::now()) {
                self.instance.render_frame();
                self.present()?;
            }
        }

        Ok(())
    }

    /// Route one terminal event; returns how the widget responded, if it saw it
    pub fn handle_event(&mut self, event: Event) -> Option<EventResponse> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                    KeyCode::Char('r') => {
                        if let Err(error) = self.reload() {
                            tracing::error!(%error, "reload failed");
                        }
                    }
                    _ => {}
                }
                None
            }
            Event::Mouse(mouse) => {
                let input = translate_mouse(mouse)?;
                Some(self.instance.handle_input(input))
            }
            Event::Resize(width, height) => {
                self.instance
                    .surface_mut()
                    .set_client_size(Resolution::new(u32::from(width), u32::from(height)));
                Some(self.instance.handle_resize())
            }
            _ => None,
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.instance.surface().draw(&mut stdout)?;

        // Update FPS counter
        self.frame_count += 1;
        let now = Instant::now();
        if (now - self.last_frame).as_secs() >= 1 {
            self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
            self.frame_count = 0;
            self.last_frame = now;
        }

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Wireframe | zoom {:.0} | FPS: {:.1} | drag=rotate right-drag=pan wheel=zoom r=reload q=quit",
                self.instance.camera().zoom(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()
    }
}

fn terminal_resolution() -> io::Result<Resolution> {
    let (width, height) = terminal::size()?;
    Ok(Resolution::new(u32::from(width), u32::from(height)))
}

/// Map a crossterm mouse event onto the widget's pointer model
pub fn translate_mouse(mouse: MouseEvent) -> Option<InputEvent> {
    let position = Point2::new(f64::from(mouse.column), f64::from(mouse.row));
    let button = |b: MouseButton| match b {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Other,
    };

    match mouse.kind {
        MouseEventKind::Down(b) => Some(InputEvent::PointerDown {
            button: button(b),
            position,
        }),
        MouseEventKind::Drag(_) | MouseEventKind::Moved => {
            Some(InputEvent::PointerMove { position })
        }
        MouseEventKind::Up(_) => Some(InputEvent::PointerUp),
        MouseEventKind::ScrollUp => Some(InputEvent::Wheel(WheelDelta::Notches(1.0))),
        MouseEventKind::ScrollDown => Some(InputEvent::Wheel(WheelDelta::Notches(-1.0))),
        _ => None,
    }
}
