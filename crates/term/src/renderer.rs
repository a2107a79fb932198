//! Renderer contract and the crossterm-backed terminal renderer.
//!
//! A renderer only ever sees a [`GameSnapshot`] by reference and cannot reach
//! back into the session. [`TerminalRenderer`] lays the snapshot out with a
//! [`GameView`], diffs against the previous frame and flushes only the changed
//! runs.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::core::GameSnapshot;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::game_view::{GameView, Viewport};

/// Draws a snapshot. Called after every dispatched event.
pub trait Renderer {
    fn render(&mut self, snap: &GameSnapshot) -> Result<()>;
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    view: GameView,
    frame: FrameBuffer,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new(view: GameView) -> Self {
        Self {
            stdout: io::stdout(),
            view,
            frame: FrameBuffer::default(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a framebuffer, swapping it into internal state.
    ///
    /// Diffs against the previous frame, then swaps buffers so `fb` can be
    /// reused for the next frame without cloning.
    fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        // Take previous out to avoid borrow conflicts (no cloning).
        // An empty previous frame forces a full redraw.
        let mut prev = self.last.take().unwrap_or_default();
        let needs_full = prev.width() != fb.width() || prev.height() != fb.height();

        if needs_full {
            self.buf.clear();
            encode_full_into(fb, &mut self.buf)?;
            self.flush_buf()?;
            prev.resize(fb.width(), fb.height());
        } else {
            self.buf.clear();
            encode_diff_into(&prev, fb, &mut self.buf)?;
            self.flush_buf()?;
        }

        // Swap current into prev so next frame can diff without cloning.
        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, snap: &GameSnapshot) -> Result<()> {
        let (w, h) = terminal::size().unwrap_or((80, 24));
        let mut fb = std::mem::take(&mut self.frame);
        self.view.render_into(snap, Viewport::new(w, h), &mut fb);
        let drawn = self.draw_swap(&mut fb);
        self.frame = fb;
        drawn
    }
}

/// Queues cell output, emitting style changes only when the style differs.
struct Painter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> Painter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn cell(&mut self, cell: Cell) -> Result<()> {
        if self.style != Some(cell.style) {
            let style = cell.style;
            self.out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
            self.out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
            self.out.queue(SetAttribute(Attribute::Reset))?;
            if style.bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                self.out.queue(SetAttribute(Attribute::Dim))?;
            }
            self.style = Some(style);
        }
        self.out.queue(Print(cell.ch))?;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out` without touching stdout.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    let mut painter = Painter::new(out);
    let width = fb.width() as usize;

    if width > 0 {
        for (y, row) in fb.cells().chunks(width).enumerate() {
            if y > 0 {
                painter.out.queue(Print("\r\n"))?;
            }
            for &cell in row {
                painter.cell(cell)?;
            }
        }
    }

    painter.finish()
}

/// Encode only the cells that changed between `prev` and `next` into `out`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut painter = Painter::new(out);
    let width = next.width() as usize;

    changed_runs(prev, next, |x, y, len| {
        painter.out.queue(cursor::MoveTo(x as u16, y as u16))?;
        let start = y * width + x;
        for &cell in &next.cells()[start..start + len] {
            painter.cell(cell)?;
        }
        Ok(())
    })?;

    painter.finish()
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Call `f(x, y, len)` for every horizontal run of cells that differ.
///
/// Frames of different sizes are treated as entirely dirty.
fn changed_runs(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(usize, usize, usize) -> Result<()>,
) -> Result<()> {
    let width = next.width() as usize;
    if width == 0 {
        return Ok(());
    }
    let same_size = prev.width() == next.width() && prev.height() == next.height();

    for (y, row) in next.cells().chunks(width).enumerate() {
        if !same_size {
            f(0, y, width)?;
            continue;
        }

        let old = &prev.cells()[y * width..(y + 1) * width];
        let mut x = 0;
        while x < width {
            if row[x] == old[x] {
                x += 1;
                continue;
            }
            let start = x;
            while x < width && row[x] != old[x] {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }

    Ok(())
}
