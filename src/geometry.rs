//! Logical-space geometry for the concentric squares.
//!
//! Everything here works in continuous Y-up coordinates. Nothing is rounded;
//! device rounding belongs to [`crate::mapper`].

use std::ops::{Add, Mul};

/// Number of vertices every polygon in this crate carries.
pub const QUAD_VERTICES: usize = 4;

/// A point in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<Point> for f64 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        Point::new(self * rhs.x, self * rhs.y)
    }
}

/// Counter-clockwise quadrilateral. Edge `i` runs from slot `i` to slot `(i + 1) % 4`.
pub type Polygon = [Point; QUAD_VERTICES];

/// Retain/advance factors of one contraction step.
///
/// Only constructible from `q`, so `p + q == 1` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contraction {
    p: f64,
    q: f64,
}

impl Contraction {
    pub const DEFAULT_Q: f64 = 0.05;

    pub fn new(q: f64) -> Self {
        Self { p: 1.0 - q, q }
    }

    /// Fraction of the current vertex that is kept.
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Fraction of the way each vertex moves toward its successor.
    pub fn q(&self) -> f64 {
        self.q
    }
}

impl Default for Contraction {
    fn default() -> Self {
        Self::new(Self::DEFAULT_Q)
    }
}

/// Move every vertex `q` of the way toward its counter-clockwise successor.
///
/// Slot `i` of the result comes from old slots `i` and `i + 1`, so chained
/// calls keep the winding and the polygon spirals inward around its centroid.
pub fn next_generation(vertices: &Polygon, contraction: Contraction) -> Polygon {
    let (p, q) = (contraction.p(), contraction.q());
    std::array::from_fn(|i| p * vertices[i] + q * vertices[(i + 1) % QUAD_VERTICES])
}

pub fn centroid(vertices: &[Point]) -> Point {
    if vertices.is_empty() {
        return Point::default();
    }
    let n = vertices.len() as f64;
    let sum = vertices.iter().fold(Point::default(), |acc, v| acc + *v);
    Point::new(sum.x / n, sum.y / n)
}

/// Largest distance between any two vertices.
pub fn diameter(vertices: &[Point]) -> f64 {
    let mut max = 0.0_f64;
    for (i, a) in vertices.iter().enumerate() {
        for b in &vertices[i + 1..] {
            max = max.max(a.distance(b));
        }
    }
    max
}
