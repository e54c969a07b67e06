//! The drawing primitives the renderer needs from an output backend.

use thiserror::Error;

use crate::color::RgbColor;

#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The backend could not provide a surface to draw on.
    #[error("drawing surface unavailable: {0}")]
    Unavailable(String),
}

/// A pixel surface addressed in device coordinates (origin top-left, Y down).
///
/// Backends clip segments that leave the surface; an off-surface line is not
/// an error.
pub trait DrawingSurface {
    /// Current `(width, height)` in device pixels.
    fn size(&self) -> (u32, u32);

    fn resize(&mut self, width: u32, height: u32);

    fn clear(&mut self);

    fn set_stroke_color(&mut self, color: RgbColor);

    fn draw_line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) -> Result<(), SurfaceError>;
}
