//! Terminal rasteriser
//!
//! Maps the fixed 1200x700 world onto whatever character grid the terminal
//! offers. Shapes fill cell backgrounds; text and tiny circles use glyphs.
//! Only rows that changed since the previous frame are re-emitted.

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Print},
};
use glam::Vec2;

use super::{Canvas, Color, Shape};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::Rect;

/// Glyph for circles smaller than a cell
const DOT: char = '●';

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    fn blank(bg: Color) -> Self {
        Self { ch: ' ', fg: bg, bg }
    }
}

/// Character-grid frame buffer
#[derive(Debug, Clone)]
pub struct TerminalRaster {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    /// What the terminal currently shows (None forces a full redraw)
    shown: Option<Vec<Cell>>,
}

impl TerminalRaster {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![Cell::blank(Color::default()); cols as usize * rows as usize],
            shown: None,
        }
    }

    /// Adapt to a new terminal size
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if (cols.max(1), rows.max(1)) != (self.cols, self.rows) {
            log::debug!("Terminal resized to {}x{}", cols, rows);
            *self = Self::new(cols, rows);
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    /// Forget what is on screen so the next flush redraws everything
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    fn scale(&self) -> Vec2 {
        Vec2::new(
            self.cols as f32 / SCREEN_WIDTH,
            self.rows as f32 / SCREEN_HEIGHT,
        )
    }

    /// World point to (col, row), unclamped
    fn to_cell(&self, p: Vec2) -> (i32, i32) {
        let c = p * self.scale();
        (c.x.floor() as i32, c.y.floor() as i32)
    }

    /// World-space centre of a cell
    fn cell_center(&self, col: i32, row: i32) -> Vec2 {
        (Vec2::new(col as f32, row as f32) + 0.5) / self.scale()
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(idx)
    }

    fn paint(&mut self, col: i32, row: i32, color: Color) {
        if let Some(cell) = self.cell_mut(col, row) {
            *cell = Cell::blank(color);
        }
    }

    fn glyph(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    /// Rasterise a canvas, replacing the current frame
    pub fn rasterize(&mut self, canvas: &Canvas) {
        let bg = canvas.background();
        self.cells.fill(Cell::blank(bg));

        for shape in canvas.shapes() {
            match shape {
                Shape::Rect {
                    rect,
                    color,
                    filled: true,
                } => self.fill_rect(rect, *color),
                Shape::Rect {
                    rect,
                    color,
                    filled: false,
                } => self.outline_rect(rect, *color),
                Shape::Circle {
                    center,
                    radius,
                    color,
                } => self.circle(*center, *radius, *color),
                Shape::Line { from, to, color } => self.line(*from, *to, *color),
                Shape::Text {
                    pos,
                    text,
                    color,
                    centered,
                } => self.text(*pos, text, *color, *centered),
            }
        }
    }

    /// Cell span covered by a rect (at least one cell in each direction)
    fn span(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let s = self.scale();
        let c0 = (rect.x * s.x).floor() as i32;
        let r0 = (rect.y * s.y).floor() as i32;
        let c1 = ((rect.right() * s.x).ceil() as i32).max(c0 + 1);
        let r1 = ((rect.bottom() * s.y).ceil() as i32).max(r0 + 1);
        (c0, r0, c1, r1)
    }

    fn fill_rect(&mut self, rect: &Rect, color: Color) {
        let (c0, r0, c1, r1) = self.span(rect);
        for row in r0.max(0)..r1.min(self.rows as i32) {
            for col in c0.max(0)..c1.min(self.cols as i32) {
                self.paint(col, row, color);
            }
        }
    }

    /// Box-drawing border; skipped when the rect is too small to hold one
    fn outline_rect(&mut self, rect: &Rect, color: Color) {
        let (c0, r0, c1, r1) = self.span(rect);
        let (c1, r1) = (c1 - 1, r1 - 1);
        if c1 - c0 < 2 || r1 - r0 < 2 {
            return;
        }
        for col in c0 + 1..c1 {
            self.glyph(col, r0, '─', color);
            self.glyph(col, r1, '─', color);
        }
        for row in r0 + 1..r1 {
            self.glyph(c0, row, '│', color);
            self.glyph(c1, row, '│', color);
        }
        self.glyph(c0, r0, '┌', color);
        self.glyph(c1, r0, '┐', color);
        self.glyph(c0, r1, '└', color);
        self.glyph(c1, r1, '┘', color);
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let (c0, r0, c1, r1) = self.span(&Rect::around_circle(center, radius));
        let mut covered = false;
        for row in r0..r1 {
            for col in c0..c1 {
                if self.cell_center(col, row).distance(center) <= radius {
                    self.paint(col, row, color);
                    covered = true;
                }
            }
        }
        if !covered {
            let (col, row) = self.to_cell(center);
            self.glyph(col, row, DOT, color);
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let cell = Vec2::ONE / self.scale();
        let step = cell.min_element() / 2.0;
        let steps = ((to - from).length() / step).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = from.lerp(to, i as f32 / steps as f32);
            let (col, row) = self.to_cell(p);
            self.paint(col, row, color);
        }
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Color, centered: bool) {
        let (mut col, row) = self.to_cell(pos);
        if centered {
            col -= text.chars().count() as i32 / 2;
        }
        for (i, ch) in text.chars().enumerate() {
            self.glyph(col + i as i32, row, ch, color);
        }
    }

    /// Emit changed rows as crossterm commands
    pub fn flush<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let cols = self.cols as usize;
        let mut run = String::new();

        for row in 0..self.rows as usize {
            let line = &self.cells[row * cols..(row + 1) * cols];
            if let Some(shown) = &self.shown {
                if shown[row * cols..(row + 1) * cols] == *line {
                    continue;
                }
            }

            out.queue(cursor::MoveTo(0, row as u16))?;
            let mut current: Option<(Color, Color)> = None;
            for cell in line {
                if current != Some((cell.fg, cell.bg)) {
                    if !run.is_empty() {
                        out.queue(Print(&run))?;
                        run.clear();
                    }
                    out.queue(style::SetForegroundColor(cell.fg.into()))?;
                    out.queue(style::SetBackgroundColor(cell.bg.into()))?;
                    current = Some((cell.fg, cell.bg));
                }
                run.push(cell.ch);
            }
            if !run.is_empty() {
                out.queue(Print(&run))?;
                run.clear();
            }
        }

        out.queue(style::ResetColor)?;
        out.flush()?;
        self.shown = Some(self.cells.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::colors;

    fn raster() -> TerminalRaster {
        // 10 world pixels per column, 17.5 per row
        TerminalRaster::new(120, 40)
    }

    #[test]
    fn test_fill_rect_cells() {
        let mut r = raster();
        let mut canvas = Canvas::new();
        canvas.clear(colors::DARK_BLUE);
        canvas.fill_rect(Rect::new(0.0, 0.0, 25.0, 30.0), colors::STONE_GRAY);
        r.rasterize(&canvas);

        assert_eq!(r.cell(0, 0).map(|c| c.bg), Some(colors::STONE_GRAY));
        assert_eq!(r.cell(2, 1).map(|c| c.bg), Some(colors::STONE_GRAY));
        assert_eq!(r.cell(3, 0).map(|c| c.bg), Some(colors::DARK_BLUE));
        assert_eq!(r.cell(0, 2).map(|c| c.bg), Some(colors::DARK_BLUE));
    }

    #[test]
    fn test_tiny_circle_still_visible() {
        let mut r = raster();
        let mut canvas = Canvas::new();
        canvas.circle(Vec2::new(105.0, 100.0), 1.0, colors::ENEMY_RED);
        r.rasterize(&canvas);
        let cell = r.cell(10, 5).copied();
        assert_eq!(cell.map(|c| c.ch), Some(DOT));
        assert_eq!(cell.map(|c| c.fg), Some(colors::ENEMY_RED));
    }

    #[test]
    fn test_offscreen_shapes_are_clipped() {
        let mut r = raster();
        let mut canvas = Canvas::new();
        canvas.fill_rect(Rect::new(-500.0, -500.0, 3000.0, 3000.0), colors::WHITE);
        canvas.line(Vec2::new(-100.0, 50.0), Vec2::new(2000.0, 50.0), colors::ROTOR);
        canvas.text(Vec2::new(1190.0, 690.0), "overflowing text", colors::WHITE);
        r.rasterize(&canvas);
        assert_eq!(r.cell(119, 39).map(|c| c.bg), Some(colors::WHITE));
        assert_eq!(r.cell(119, 2).map(|c| c.bg), Some(colors::ROTOR));
    }

    #[test]
    fn test_centered_text() {
        let mut r = raster();
        let mut canvas = Canvas::new();
        canvas.text_centered(Vec2::new(600.0, 350.0), "PAUSED", colors::WHITE);
        r.rasterize(&canvas);
        let row: String = (57..63)
            .filter_map(|c| r.cell(c, 20).map(|cell| cell.ch))
            .collect();
        assert_eq!(row, "PAUSED");
    }

    #[test]
    fn test_flush_skips_unchanged_rows() {
        let mut r = raster();
        let mut canvas = Canvas::new();
        canvas.text(Vec2::new(20.0, 20.0), "Score: 10", colors::WHITE);
        r.rasterize(&canvas);

        let mut first = Vec::new();
        r.flush(&mut first).unwrap();
        assert!(String::from_utf8_lossy(&first).contains("Score: 10"));

        r.rasterize(&canvas);
        let mut second = Vec::new();
        r.flush(&mut second).unwrap();
        assert!(second.len() < first.len() / 10);

        r.invalidate();
        let mut third = Vec::new();
        r.flush(&mut third).unwrap();
        assert_eq!(third.len(), first.len());
    }

    #[test]
    fn test_resize_resets_frame() {
        let mut r = raster();
        r.resize(80, 24);
        assert_eq!(r.size(), (80, 24));
        assert!(r.cell(79, 23).is_some());
        assert!(r.cell(80, 0).is_none());
    }
}
