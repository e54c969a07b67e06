use ratatui::prelude::*;

use crate::color::RgbColor;
use crate::surface::{DrawingSurface, SurfaceError};

/// Braille dot positions within a 2x4 cell:
/// (0,0)=0x01 (1,0)=0x08
/// (0,1)=0x02 (1,1)=0x10
/// (0,2)=0x04 (1,2)=0x20
/// (0,3)=0x40 (1,3)=0x80
pub const DOT_MAP: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40],
    [0x08, 0x10, 0x20, 0x80],
];

pub const DOTS_PER_CELL_X: u32 = 2;
pub const DOTS_PER_CELL_Y: u32 = 4;

/// A drawing surface made of braille dots.
/// Each terminal character cell maps to a 2x4 grid of dots and carries one color:
/// whichever stroke last set a dot inside it.
pub struct BrailleCanvas {
    grid: Vec<bool>,
    colors: Vec<Option<RgbColor>>,
    grid_w: usize,
    grid_h: usize,
    char_w: usize,
    char_h: usize,
    stroke: RgbColor,
}

impl BrailleCanvas {
    /// Create a canvas of `width` x `height` dots.
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            grid: Vec::new(),
            colors: Vec::new(),
            grid_w: 0,
            grid_h: 0,
            char_w: 0,
            char_h: 0,
            stroke: RgbColor::new(255, 255, 255),
        };
        canvas.resize(width, height);
        canvas
    }

    pub fn cells(&self) -> (usize, usize) {
        (self.char_w, self.char_h)
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < self.grid_w && y < self.grid_h && self.grid[y * self.grid_w + x]
    }

    pub fn lit_dots(&self) -> usize {
        self.grid.iter().filter(|&&d| d).count()
    }

    /// Set a single dot on the braille grid (bounds-checked).
    #[inline]
    fn plot(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= self.grid_w as i64 || y >= self.grid_h as i64 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        self.grid[y * self.grid_w + x] = true;
        let cell = (y / DOTS_PER_CELL_Y as usize) * self.char_w + x / DOTS_PER_CELL_X as usize;
        self.colors[cell] = Some(self.stroke);
    }

    /// Braille glyph and color for the cell at (cx, cy), or `None` if no dot is set.
    pub fn cell(&self, cx: usize, cy: usize) -> Option<(char, RgbColor)> {
        if cx >= self.char_w || cy >= self.char_h {
            return None;
        }
        let mut braille: u8 = 0;
        for (dx, col) in DOT_MAP.iter().enumerate() {
            for (dy, &bit) in col.iter().enumerate() {
                if self.is_set(cx * 2 + dx, cy * 4 + dy) {
                    braille |= bit;
                }
            }
        }
        if braille == 0 {
            return None;
        }
        let ch = char::from_u32(0x2800 + braille as u32)?;
        let color = self.colors[cy * self.char_w + cx]?;
        Some((ch, color))
    }

    /// Write the braille cells into the frame buffer, clipped to `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let cols = self.char_w.min(area.width as usize);
        let rows = self.char_h.min(area.height as usize);
        for cy in 0..rows {
            for cx in 0..cols {
                if let Some((ch, RgbColor { r, g, b })) = self.cell(cx, cy) {
                    let cell = frame
                        .buffer_mut()
                        .cell_mut((area.x + cx as u16, area.y + cy as u16));
                    if let Some(cell) = cell {
                        cell.set_char(ch);
                        cell.set_fg(Color::Rgb(r, g, b));
                    }
                }
            }
        }
    }
}

impl DrawingSurface for BrailleCanvas {
    fn size(&self) -> (u32, u32) {
        (self.grid_w as u32, self.grid_h as u32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.grid_w = width as usize;
        self.grid_h = height as usize;
        self.char_w = width.div_ceil(DOTS_PER_CELL_X) as usize;
        self.char_h = height.div_ceil(DOTS_PER_CELL_Y) as usize;
        self.grid = vec![false; self.grid_w * self.grid_h];
        self.colors = vec![None; self.char_w * self.char_h];
    }

    fn clear(&mut self) {
        self.grid.fill(false);
        self.colors.fill(None);
    }

    fn set_stroke_color(&mut self, color: RgbColor) {
        self.stroke = color;
    }

    fn draw_line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) -> Result<(), SurfaceError> {
        bresenham_line(x1, y1, x2, y2, |x, y| self.plot(x, y));
        Ok(())
    }
}

/// Walk the pixels of a line using Bresenham's algorithm.
pub fn bresenham_line(x0: i64, y0: i64, x1: i64, y1: i64, mut plot: impl FnMut(i64, i64)) {
    let (mut x0, mut y0) = (x0, y0);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx: i64 = if x0 < x1 { 1 } else { -1 };
    let sy: i64 = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(x0, y0);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
