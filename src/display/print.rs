use anyhow::Result;
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{stdout, Write};
use tracing::info;

use crate::config::Config;
use crate::display::braille::BrailleCanvas;
use crate::geometry::{centroid, diameter};
use crate::renderer::ConcentricRenderer;

/// Render once at the configured surface size and write the result to stdout.
pub fn run(config: &Config) -> Result<()> {
    let canvas = BrailleCanvas::new(config.surface.width, config.surface.height);
    let mut renderer = ConcentricRenderer::new(canvas, config.squares.policy());
    renderer.render_all()?;

    let (cols, rows) = renderer.surface().cells();
    if let Some(innermost) = renderer.generations().last() {
        let center = centroid(&innermost);
        info!(
            dots = renderer.surface().lit_dots(),
            innermost_diameter = diameter(&innermost),
            "Printing {}x{} cells, spiral centered at ({:.2}, {:.2})",
            cols,
            rows,
            center.x,
            center.y
        );
    }

    let mut out = stdout().lock();
    write_rows(renderer.surface(), &mut out)?;
    out.flush()?;
    Ok(())
}

/// Write every cell row as colored braille text, one line per row.
pub fn write_rows(canvas: &BrailleCanvas, out: &mut impl Write) -> Result<()> {
    let (cols, rows) = canvas.cells();
    for cy in 0..rows {
        let mut current = None;
        for cx in 0..cols {
            match canvas.cell(cx, cy) {
                Some((ch, color)) => {
                    if current != Some(color) {
                        let (r, g, b) = (color.r, color.g, color.b);
                        queue!(out, SetForegroundColor(Color::Rgb { r, g, b }))?;
                        current = Some(color);
                    }
                    queue!(out, Print(ch))?;
                }
                None => queue!(out, Print(' '))?,
            }
        }
        queue!(out, ResetColor, Print('\n'))?;
    }
    Ok(())
}
