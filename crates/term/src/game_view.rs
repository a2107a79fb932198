//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, SessionPhase};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Each board cell is two terminal columns wide: `[]` filled, ` .` empty.
const CELL_W: u16 = 2;

const FRAME_W: u16 = (BOARD_WIDTH as u16) * CELL_W + 2;
const FRAME_H: u16 = BOARD_HEIGHT as u16 + 2;

const WELL_BG: Rgb = Rgb::new(0, 0, 0);

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameView {
    /// Draw every filled cell in plain white instead of per-kind colors.
    monochrome: bool,
}

impl GameView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn monochrome(mut self, monochrome: bool) -> Self {
        self.monochrome = monochrome;
        self
    }

    /// Render a snapshot into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let start_x = viewport.width.saturating_sub(FRAME_W) / 2;
        let start_y = viewport.height.saturating_sub(FRAME_H) / 2;

        let border = CellStyle {
            fg: Rgb::new(240, 240, 240),
            bg: WELL_BG,
            bold: false,
            dim: false,
        };
        draw_border(fb, start_x, start_y, FRAME_W, FRAME_H, border);

        let grid = snap.composite();
        for (y, row) in grid.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let px = start_x + 1 + (x as u16) * CELL_W;
                let py = start_y + 1 + y as u16;
                match PieceKind::from_code(code) {
                    Some(kind) => self.draw_filled(fb, px, py, kind),
                    None => draw_empty(fb, px, py),
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x, start_y);

        match snap.phase {
            SessionPhase::GameOver => draw_overlay(
                fb,
                start_x,
                start_y,
                &[
                    ("GAME OVER!", None),
                    ("Score: ", Some(snap.score)),
                    ("Press R to restart", None),
                ],
            ),
            SessionPhase::Idle => {
                draw_overlay(fb, start_x, start_y, &[("Press R to start", None)])
            }
            SessionPhase::Falling => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_filled(&self, fb: &mut FrameBuffer, px: u16, py: u16, kind: PieceKind) {
        let fg = if self.monochrome {
            Rgb::new(240, 240, 240)
        } else {
            piece_color(kind)
        };
        let style = CellStyle {
            fg,
            bg: WELL_BG,
            bold: true,
            dim: false,
        };
        fb.put_char(px, py, '[', style);
        fb.put_char(px + 1, py, ']', style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
    ) {
        let panel_x = start_x.saturating_add(FRAME_W).saturating_add(2);
        if panel_x.saturating_add(8) > viewport.width {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle::default();

        let mut y = start_y.saturating_add(1);
        for (name, v) in [("SCORE", snap.score), ("LINES", snap.lines), ("PIECES", snap.pieces)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), v, value);
            y = y.saturating_add(3);
        }
    }
}

fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::Z => Rgb::new(220, 80, 80),
    }
}

fn draw_empty(fb: &mut FrameBuffer, px: u16, py: u16) {
    let style = CellStyle {
        fg: Rgb::new(90, 90, 100),
        bg: WELL_BG,
        bold: false,
        dim: true,
    };
    fb.put_char(px, py, ' ', style);
    fb.put_char(px + 1, py, '.', style);
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Centered text lines over the well; a line may end with a number.
fn draw_overlay(fb: &mut FrameBuffer, start_x: u16, start_y: u16, lines: &[(&str, Option<u32>)]) {
    let style = CellStyle {
        fg: Rgb::new(255, 255, 255),
        bg: WELL_BG,
        bold: true,
        dim: false,
    };
    let inner_w = FRAME_W - 2;
    let first_y = start_y + 1 + (FRAME_H - 2).saturating_sub(lines.len() as u16 * 2) / 2;

    for (i, &(text, number)) in lines.iter().enumerate() {
        let digits = number.map_or(0, |n| n.checked_ilog10().unwrap_or(0) as u16 + 1);
        let text_w = text.chars().count() as u16 + digits;
        let x = start_x + 1 + inner_w.saturating_sub(text_w) / 2;
        let y = first_y + (i as u16) * 2;

        fb.fill_rect(start_x + 1, y, inner_w, 1, ' ', style);
        fb.put_str(x, y, text, style);
        if let Some(n) = number {
            fb.put_u32(x + text.chars().count() as u16, y, n, style);
        }
    }
}
