//! Terminal output for framebuffers.
//!
//! [`TerminalRenderer`] owns the terminal session (raw mode, alternate screen)
//! and remembers the last frame it presented. A frame the same size as that one
//! goes out as a patch of changed spans; anything else is a full repaint.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    out: io::Stdout,
    shown: Option<FrameBuffer>,
    scratch: Vec<u8>,
    active: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            shown: None,
            scratch: Vec::with_capacity(16 * 1024),
            active: false,
        }
    }

    /// Switch to raw mode and the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        self.shown = None;
        self.scratch.clear();
        self.scratch
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        self.flush_scratch()
    }

    /// Restore the terminal. Does nothing when the session isn't active.
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.scratch.clear();
        self.scratch
            .queue(SetAttribute(Attribute::Reset))?
            .queue(ResetColor)?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        let flushed = self.flush_scratch();
        terminal::disable_raw_mode()?;
        flushed
    }

    /// Repaint everything on the next [`present`](Self::present).
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    pub fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        self.scratch.clear();
        match self.shown.as_mut() {
            Some(shown) if shown.width() == frame.width() && shown.height() == frame.height() => {
                write_patch(shown, frame, &mut self.scratch)?;
                shown.clone_from(frame);
            }
            _ => {
                write_repaint(frame, &mut self.scratch)?;
                self.shown = Some(frame.clone());
            }
        }
        self.flush_scratch()
    }

    fn flush_scratch(&mut self) -> Result<()> {
        self.out.write_all(&self.scratch)?;
        self.out.flush()?;
        Ok(())
    }
}

/// A horizontal run of cells that differ between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

/// Runs of changed cells, row by row. Frames of different sizes differ
/// everywhere.
pub fn changed_spans(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<Span> {
    let (w, h) = (next.width(), next.height());
    if prev.width() != w || prev.height() != h {
        return (0..h).map(|y| Span { x: 0, y, len: w }).collect();
    }

    let mut spans = Vec::new();
    for y in 0..h {
        let mut start = None;
        for x in 0..=w {
            let differs = x < w && prev.get(x, y) != next.get(x, y);
            match (start, differs) {
                (None, true) => start = Some(x),
                (Some(s), false) => {
                    spans.push(Span { x: s, y, len: x - s });
                    start = None;
                }
                _ => {}
            }
        }
    }
    spans
}

/// Clear the screen and write every cell of `frame`.
pub fn write_repaint<W: Write>(frame: &FrameBuffer, out: &mut W) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?
        .queue(cursor::MoveTo(0, 0))?;

    let mut pen = Pen::default();
    for y in 0..frame.height() {
        if y > 0 {
            out.queue(Print("\r\n"))?;
        }
        for x in 0..frame.width() {
            pen.draw(out, frame.get(x, y).unwrap_or_default())?;
        }
    }
    pen.release(out)
}

/// Write only the cells of `next` that differ from `prev`.
pub fn write_patch<W: Write>(prev: &FrameBuffer, next: &FrameBuffer, out: &mut W) -> Result<()> {
    let spans = changed_spans(prev, next);
    if spans.is_empty() {
        return Ok(());
    }

    let mut pen = Pen::default();
    for span in spans {
        out.queue(cursor::MoveTo(span.x, span.y))?;
        for x in span.x..span.x + span.len {
            pen.draw(out, next.get(x, span.y).unwrap_or_default())?;
        }
    }
    pen.release(out)
}

/// Tracks the style the terminal is currently drawing with so only the parts
/// that change get emitted.
#[derive(Default)]
struct Pen {
    style: Option<CellStyle>,
}

impl Pen {
    fn draw<W: Write>(&mut self, out: &mut W, cell: Cell) -> Result<()> {
        let next = cell.style;
        match self.style {
            Some(cur) if cur == next => {}
            Some(cur) if cur.bold == next.bold && cur.dim == next.dim => {
                if cur.fg != next.fg {
                    out.queue(SetForegroundColor(color(next.fg)))?;
                }
                if cur.bg != next.bg {
                    out.queue(SetBackgroundColor(color(next.bg)))?;
                }
            }
            // SGR reset drops colors too, so everything is set again.
            _ => {
                out.queue(SetAttribute(Attribute::Reset))?
                    .queue(SetForegroundColor(color(next.fg)))?
                    .queue(SetBackgroundColor(color(next.bg)))?;
                if next.bold {
                    out.queue(SetAttribute(Attribute::Bold))?;
                }
                if next.dim {
                    out.queue(SetAttribute(Attribute::Dim))?;
                }
            }
        }
        self.style = Some(next);
        out.queue(Print(cell.ch))?;
        Ok(())
    }

    fn release<W: Write>(self, out: &mut W) -> Result<()> {
        if self.style.is_some() {
            out.queue(SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
