//! GameView: maps a `GameState` snapshot into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameState, Grid};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::GameStatus;

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// How many queued letters the side panel previews.
pub const PREVIEW_LEN: usize = 5;

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

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Screen rectangle of the bordered board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// Terminal view of the letter grid plus a score panel.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 3 columns per cell leaves a gap either side of each letter.
        Self {
            cell_w: 3,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    fn frame(&self, grid_rows: usize, grid_cols: usize, viewport: Viewport) -> Frame {
        let w = clamp_u16(grid_cols)
            .saturating_mul(self.cell_w)
            .saturating_add(2);
        let h = clamp_u16(grid_rows).saturating_add(2);
        let x = viewport.width.saturating_sub(w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        Frame { x, y, w, h }
    }

    /// Grid column under the terminal position `(x, y)`, if any.
    ///
    /// Any row inside the board frame counts, so a click anywhere in a
    /// column selects it.
    pub fn column_at(&self, grid: &Grid, viewport: Viewport, x: u16, y: u16) -> Option<usize> {
        let frame = self.frame(grid.rows(), grid.cols(), viewport);
        if y < frame.y || y >= frame.y.saturating_add(frame.h) {
            return None;
        }
        let inner_x = x.checked_sub(frame.x + 1)?;
        let col = (inner_x / self.cell_w) as usize;
        (col < grid.cols()).then_some(col)
    }

    /// Render the state into an existing framebuffer.
    ///
    /// Callers can reuse one framebuffer across frames; it is only resized
    /// when the viewport changes.
    pub fn render_into(&self, state: &GameState, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let grid = &state.grid;
        let frame = self.frame(grid.rows(), grid.cols(), viewport);
        let border = CellStyle::plain(Rgb::new(200, 200, 200), PANEL_BG);

        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            frame.w.saturating_sub(2),
            frame.h.saturating_sub(2),
            ' ',
            CellStyle::plain(BOARD_BG, BOARD_BG),
        );
        draw_border(fb, frame, border);

        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                match grid.letter_at(row, col) {
                    Some(letter) => {
                        self.draw_letter(fb, frame, row, col, letter, placed_style(letter))
                    }
                    None => self.draw_letter(fb, frame, row, col, '·', empty_style()),
                }
            }
        }

        if let Some(falling) = state.falling_letter {
            let landing = falling.landing_row(grid);
            if landing > falling.row {
                let guide = CellStyle::plain(Rgb::new(140, 140, 140), BOARD_BG).dim();
                self.draw_letter(fb, frame, landing, falling.col, '░', guide);
            }
            let style = CellStyle::plain(Rgb::new(20, 20, 20), Rgb::new(255, 217, 61)).bold();
            self.draw_letter(fb, frame, falling.row, falling.col, falling.letter, style);
        }

        self.draw_side_panel(fb, state, viewport, frame);

        match state.status() {
            GameStatus::Idle => draw_overlay(fb, frame, "PRESS ENTER"),
            GameStatus::Paused => draw_overlay(fb, frame, "PAUSED"),
            GameStatus::GameOver => draw_overlay(fb, frame, "GAME OVER"),
            GameStatus::Playing if state.ui.show_level_up => {
                draw_overlay(fb, frame, "LEVEL UP")
            }
            GameStatus::Playing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, state: &GameState, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(state, viewport, &mut fb);
        fb
    }

    fn draw_letter(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        row: usize,
        col: usize,
        ch: char,
        style: CellStyle,
    ) {
        let px = frame.x + 1 + clamp_u16(col).saturating_mul(self.cell_w);
        let py = frame.y + 1 + clamp_u16(row);
        fb.fill_rect(px, py, self.cell_w, 1, ' ', style);
        fb.put_char(px + self.cell_w / 2, py, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        state: &GameState,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::plain(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::plain(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        for (name, number) in [
            ("SCORE", state.score),
            ("LEVEL", state.level),
            ("COMBO", state.combo),
            ("WORDS", state.words_completed),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_str(panel_x, y.saturating_add(1), &number.to_string(), value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        let mut x = panel_x;
        for letter in state.upcoming(PREVIEW_LEN) {
            let style = if x == panel_x { value.bold() } else { value.dim() };
            x = fb.put_str(x, y, &letter.to_string(), style).saturating_add(1);
        }
        y = y.saturating_add(2);

        if let Some(last) = state.words_found.last() {
            fb.put_str(panel_x, y, "LAST", label);
            fb.put_str(panel_x, y.saturating_add(1), last, value);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }

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

fn draw_overlay(fb: &mut FrameBuffer, frame: Frame, text: &str) {
    let style = CellStyle::plain(Rgb::new(255, 255, 255), PANEL_BG).bold();
    fb.put_centered(frame.x, frame.y + frame.h / 2, frame.w, text, style);
}

fn empty_style() -> CellStyle {
    CellStyle::plain(Rgb::new(90, 90, 100), BOARD_BG).dim()
}

/// Vowels and consonants get different colors so words are easier to spot.
fn placed_style(letter: char) -> CellStyle {
    let fg = if matches!(letter, 'A' | 'E' | 'I' | 'O' | 'U') {
        Rgb::new(80, 220, 220)
    } else {
        Rgb::new(240, 240, 240)
    };
    CellStyle::plain(fg, Rgb::new(60, 60, 80)).bold()
}

fn clamp_u16(n: usize) -> u16 {
    n.min(u16::MAX as usize) as u16
}
