//! Terminal surface
//!
//! Rasterizes rectangles into a character grid. Darker colors use denser
//! glyphs so that dark objects stay visible on the black background.
//! A cell is twice as tall as it is wide, so one row covers `2 * scale`
//! scene units.

use std::io::Write;

use super::Surface;
use crate::scene::{Color, Rect, Viewport};

const SHADES: [char; 5] = ['█', '▓', '▒', '░', '·'];

/// Character-grid surface
pub struct AsciiSurface {
    width: usize,
    height: usize,
    /// Scene units per cell
    scale: f32,
    cells: Vec<char>,
    /// Print every presented frame to stdout
    echo: bool,
    /// Grid changed size since the last presented frame
    resized: bool,
}

fn cell_scale(scale: f32) -> f32 {
    if scale > 0.0 {
        scale
    } else {
        1.0
    }
}

impl AsciiSurface {
    pub fn new(width: usize, height: usize, scale: f32) -> Self {
        Self {
            width,
            height,
            scale: cell_scale(scale),
            cells: vec![' '; width * height],
            echo: false,
            resized: false,
        }
    }

    /// Viewport covered by a `cols` x `rows` grid
    pub fn viewport_for(cols: usize, rows: usize, scale: f32) -> Viewport {
        let scale = cell_scale(scale);
        Viewport::new(cols as f32 * scale, rows as f32 * scale * 2.0)
    }

    /// Grid size in cells as `(width, height)`
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Print each presented frame to the terminal
    pub fn echo_to_stdout(mut self) -> Self {
        self.echo = true;
        self
    }

    /// Current grid, one `String` per row
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
            .collect()
    }

    /// Write the grid to `out`, homing the cursor first
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "\x1b[H")?;
        for row in self.rows() {
            writeln!(out, "{}", row)?;
        }
        out.flush()
    }

    fn glyph(color: Color) -> char {
        let level = ((1.0 - color.luminance()) * (SHADES.len() - 1) as f32).round() as usize;
        SHADES[SHADES.len() - 1 - level.min(SHADES.len() - 1)]
    }
}

impl Surface for AsciiSurface {
    fn resize(&mut self, viewport: Viewport) {
        let width = (viewport.width / self.scale).round().max(1.0) as usize;
        let height = (viewport.height / (self.scale * 2.0)).round().max(1.0) as usize;
        if (width, height) == (self.width, self.height) {
            return;
        }

        tracing::debug!(width, height, "Resizing terminal surface");
        self.width = width;
        self.height = height;
        self.cells = vec![' '; width * height];
        self.resized = true;
    }

    fn clear(&mut self, _color: Color) {
        self.cells.iter_mut().for_each(|c| *c = ' ');
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let glyph = Self::glyph(color);
        let to_cell = |v: f32, max: usize| ((v / self.scale).floor().max(0.0) as usize).min(max);

        let x0 = to_cell(rect.x, self.width);
        let x1 = to_cell(rect.x + rect.w, self.width);
        let y0 = to_cell(rect.y / 2.0, self.height);
        let y1 = to_cell((rect.y + rect.h) / 2.0, self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                self.cells[y * self.width + x] = glyph;
            }
        }
    }

    fn present(&mut self) {
        if !self.echo {
            self.resized = false;
            return;
        }

        let mut out = std::io::stdout().lock();
        let result = if std::mem::take(&mut self.resized) {
            // Old content outside the new grid would stay on screen
            write!(out, "\x1b[2J").and_then(|_| self.write_to(&mut out))
        } else {
            self.write_to(&mut out)
        };
        if let Err(e) = result {
            tracing::warn!("Failed to draw frame: {}", e);
        }
    }
}

/// Size of the controlling terminal as `(columns, rows)`, if stdout is one
#[cfg(unix)]
pub fn terminal_size() -> Option<(usize, usize)> {
    let mut size: libc::winsize = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut size) };
    if ret != 0 || size.ws_col == 0 || size.ws_row == 0 {
        return None;
    }
    Some((usize::from(size.ws_col), usize::from(size.ws_row)))
}

#[cfg(not(unix))]
pub fn terminal_size() -> Option<(usize, usize)> {
    None
}
