//! Animator backends for the runner.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use crate::board_view::{BoardView, PlaybackStatus, Viewport};
use crate::display_board::DisplayBoard;
use crate::engine::Animator;
use crate::fb::FrameBuffer;
use crate::renderer::TerminalRenderer;
use crate::types::{SimulationEvent, Size};

/// `q`, Esc, or Ctrl-C.
pub fn is_quit_key(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Wall-clock time to hold a frame of `duration_ms` at playback `speed`.
pub fn scaled_duration(duration_ms: u32, speed: f64) -> Duration {
    if speed.is_finite() && speed > 0.0 {
        Duration::from_secs_f64(duration_ms as f64 / 1000.0 / speed)
    } else {
        Duration::ZERO
    }
}

/// Live playback in the terminal's alternate screen.
pub struct TerminalAnimator {
    renderer: TerminalRenderer,
    view: BoardView,
    board: DisplayBoard,
    fb: FrameBuffer,
    status: PlaybackStatus,
    speed: f64,
    quit: bool,
}

impl TerminalAnimator {
    pub fn new(speed: f64) -> Self {
        Self {
            renderer: TerminalRenderer::new(),
            view: BoardView::default(),
            board: DisplayBoard::new(Size::default()),
            fb: FrameBuffer::new(0, 0),
            status: PlaybackStatus::default(),
            speed,
            quit: false,
        }
    }

    fn draw(&mut self) -> Result<()> {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        self.view
            .render_into(&self.board, Some(&self.status), Viewport::new(w, h), &mut self.fb);
        self.renderer.present(&self.fb)
    }

    /// Sleep for `wait`, watching for quit keys and resizes.
    fn hold(&mut self, wait: Duration) -> Result<()> {
        let deadline = Instant::now() + wait;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(());
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press && is_quit_key(key) => {
                    debug!("quit requested");
                    self.quit = true;
                    return Ok(());
                }
                Event::Resize(_, _) => {
                    self.renderer.invalidate();
                    self.draw()?;
                }
                _ => {}
            }
        }
    }
}

impl Animator for TerminalAnimator {
    fn prepare(&mut self, size: Size, _all_events: Option<&[SimulationEvent]>) -> Result<()> {
        self.board = DisplayBoard::new(size);
        self.status = PlaybackStatus::default();
        self.renderer.enter()?;
        self.draw()
    }

    fn animate_event(&mut self, event: &SimulationEvent) -> Result<()> {
        self.board.apply(event)?;
        match event {
            SimulationEvent::Appear(_) => self.status.pieces += 1,
            SimulationEvent::Clear(_) => self.status.clears += 1,
            SimulationEvent::Move(_) => {}
        }
        self.draw()?;
        self.hold(scaled_duration(event.duration_ms(), self.speed))
    }

    fn finalize(&mut self) -> Result<()> {
        self.renderer.exit()
    }

    fn is_finished(&self) -> bool {
        self.quit
    }
}

/// Writes the whole event stream as JSON lines, one event per line.
pub struct JsonLinesAnimator<W: Write> {
    out: W,
    written: usize,
}

impl JsonLinesAnimator<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesAnimator<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Animator for JsonLinesAnimator<W> {
    fn requires_precomputation(&self) -> bool {
        true
    }

    fn prepare(&mut self, size: Size, all_events: Option<&[SimulationEvent]>) -> Result<()> {
        info!(
            width = size.width,
            height = size.height,
            events = all_events.map_or(0, <[SimulationEvent]>::len),
            "exporting event stream"
        );
        Ok(())
    }

    fn animate_event(&mut self, event: &SimulationEvent) -> Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Headless playback: keeps a display board in sync and nothing else.
#[derive(Debug, Default)]
pub struct NopAnimator {
    board: Option<DisplayBoard>,
    events: usize,
}

impl NopAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> Option<&DisplayBoard> {
        self.board.as_ref()
    }

    pub fn events(&self) -> usize {
        self.events
    }
}

impl Animator for NopAnimator {
    fn prepare(&mut self, size: Size, _all_events: Option<&[SimulationEvent]>) -> Result<()> {
        self.board = Some(DisplayBoard::new(size));
        Ok(())
    }

    fn animate_event(&mut self, event: &SimulationEvent) -> Result<()> {
        if let Some(board) = self.board.as_mut() {
            board.apply(event)?;
        }
        self.events += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}
