//! Logical (Y-up, continuous) to device (Y-down, integral) coordinate mapping.

use crate::geometry::Point;

/// Geometry derived from a surface size.
///
/// Immutable. A resize builds a new extent instead of patching this one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceExtent {
    pub max_x: i64,
    pub max_y: i64,
    pub min_max_xy: i64,
    pub center: Point,
}

impl SurfaceExtent {
    /// Derive the extent of a `width` x `height` surface.
    ///
    /// Sizes of 0 or 1 give a zero or negative extent rather than an error.
    pub fn new(width: u32, height: u32) -> Self {
        let max_x = i64::from(width) - 1;
        let max_y = i64::from(height) - 1;
        Self {
            max_x,
            max_y,
            min_max_xy: max_x.min(max_y),
            center: Point::new(max_x as f64 / 2.0, max_y as f64 / 2.0),
        }
    }
}

/// Round to the nearest device column. Ties round half away from zero.
#[inline]
pub fn to_device_x(x: f64) -> i64 {
    x.round() as i64
}

/// Round and flip so that logical "up" becomes device "down".
#[inline]
pub fn to_device_y(y: f64, max_y: i64) -> i64 {
    max_y - y.round() as i64
}

// Drawing never maps back to logical space; the inverses only check the mapping.
#[cfg(test)]
#[inline]
pub fn to_logical_x(x: i64) -> f64 {
    x as f64
}

#[cfg(test)]
#[inline]
pub fn to_logical_y(y: i64, max_y: i64) -> f64 {
    (max_y - y) as f64
}

/// Conversion functions bound to the extent of the current surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    extent: SurfaceExtent,
}

impl CoordinateMapper {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            extent: SurfaceExtent::new(width, height),
        }
    }

    pub fn extent(&self) -> SurfaceExtent {
        self.extent
    }

    /// Replace the extent wholesale for a new surface size.
    pub fn reinitialize(&mut self, width: u32, height: u32) -> SurfaceExtent {
        self.extent = SurfaceExtent::new(width, height);
        self.extent
    }

    pub fn device_point(&self, point: Point) -> (i64, i64) {
        (
            to_device_x(point.x),
            to_device_y(point.y, self.extent.max_y),
        )
    }

    #[cfg(test)]
    pub fn logical_point(&self, x: i64, y: i64) -> Point {
        Point::new(to_logical_x(x), to_logical_y(y, self.extent.max_y))
    }
}
