//! Generation loop for the concentric squares.
//!
//! The renderer keeps every generation in exact logical coordinates and only
//! rounds through the [`CoordinateMapper`] when a segment is handed to the
//! surface. Feeding rounded vertices back into the recurrence would make the
//! spiral drift after a few dozen generations.

use thiserror::Error;
use tracing::debug;

use crate::color::{HueCycle, RgbColor};
use crate::geometry::{next_generation, Contraction, Point, Polygon, QUAD_VERTICES};
use crate::mapper::{CoordinateMapper, SurfaceExtent};
use crate::surface::{DrawingSurface, SurfaceError};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("polygon must have exactly 4 vertices, got {0}")]
    MalformedPolygon(usize),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Constants that shape one full drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPolicy {
    pub generations: usize,
    /// Side of the first square as a fraction of the smaller surface extent.
    pub side_fraction: f64,
    pub contraction: Contraction,
    pub hues: HueCycle,
    /// Stroke set after clearing, before the first generation picks its hue.
    pub base_stroke: RgbColor,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            generations: 50,
            side_fraction: 0.95,
            contraction: Contraction::default(),
            hues: HueCycle::default(),
            base_stroke: RgbColor::new(0x21, 0x96, 0xF3),
        }
    }
}

/// Axis-aligned square centered on the surface, counter-clockwise from bottom-left.
pub fn build_initial_square(extent: &SurfaceExtent, side_fraction: f64) -> Polygon {
    let half = 0.5 * side_fraction * extent.min_max_xy as f64;
    let Point { x: cx, y: cy } = extent.center;
    [
        Point::new(cx - half, cy - half),
        Point::new(cx + half, cy - half),
        Point::new(cx + half, cy + half),
        Point::new(cx - half, cy + half),
    ]
}

/// Iterator over the logical polygons of one drawing, first square first.
pub struct Generations {
    current: Polygon,
    contraction: Contraction,
    remaining: usize,
}

impl Iterator for Generations {
    type Item = Polygon;

    fn next(&mut self) -> Option<Polygon> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let polygon = self.current;
        self.current = next_generation(&polygon, self.contraction);
        Some(polygon)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Generations {}

/// Owns a drawing surface and the extent derived from its size.
pub struct ConcentricRenderer<S: DrawingSurface> {
    surface: S,
    mapper: CoordinateMapper,
    policy: RenderPolicy,
}

impl<S: DrawingSurface> ConcentricRenderer<S> {
    pub fn new(surface: S, policy: RenderPolicy) -> Self {
        let (width, height) = surface.size();
        Self {
            surface,
            mapper: CoordinateMapper::new(width, height),
            policy,
        }
    }

    pub fn extent(&self) -> SurfaceExtent {
        self.mapper.extent()
    }

    pub fn policy(&self) -> &RenderPolicy {
        &self.policy
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Resize the surface and swap in the extent for the new size.
    pub fn reinitialize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        let extent = self.mapper.reinitialize(width, height);
        debug!(width, height, min_max_xy = extent.min_max_xy, "Reinitialized extent");
    }

    pub fn generations(&self) -> Generations {
        Generations {
            current: build_initial_square(&self.extent(), self.policy.side_fraction),
            contraction: self.policy.contraction,
            remaining: self.policy.generations,
        }
    }

    /// Draw one closed quadrilateral. Any other vertex count is rejected
    /// before a single segment reaches the surface.
    pub fn draw_polygon(&mut self, vertices: &[Point]) -> Result<(), RenderError> {
        if vertices.len() != QUAD_VERTICES {
            return Err(RenderError::MalformedPolygon(vertices.len()));
        }
        for i in 0..QUAD_VERTICES {
            let (x1, y1) = self.mapper.device_point(vertices[i]);
            let (x2, y2) = self.mapper.device_point(vertices[(i + 1) % QUAD_VERTICES]);
            self.surface.draw_line(x1, y1, x2, y2)?;
        }
        Ok(())
    }

    /// Clear the surface and draw every generation.
    pub fn render_all(&mut self) -> Result<(), RenderError> {
        self.surface.clear();
        self.surface.set_stroke_color(self.policy.base_stroke);

        let hues = self.policy.hues;
        for (i, polygon) in self.generations().enumerate() {
            self.surface.set_stroke_color(hues.color(i));
            self.draw_polygon(&polygon)?;
        }

        debug!(
            generations = self.policy.generations,
            max_x = self.extent().max_x,
            max_y = self.extent().max_y,
            "Rendered concentric squares"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Stroke(RgbColor),
        Line(i64, i64, i64, i64),
        Resize(u32, u32),
    }

    struct RecordingSurface {
        width: u32,
        height: u32,
        calls: Vec<Call>,
    }

    impl RecordingSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                calls: Vec::new(),
            }
        }

        fn lines(&self) -> Vec<Call> {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Line(..)))
                .cloned()
                .collect()
        }
    }

    impl DrawingSurface for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.width = width;
            self.height = height;
            self.calls.push(Call::Resize(width, height));
        }

        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn set_stroke_color(&mut self, color: RgbColor) {
            self.calls.push(Call::Stroke(color));
        }

        fn draw_line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) -> Result<(), SurfaceError> {
            self.calls.push(Call::Line(x1, y1, x2, y2));
            Ok(())
        }
    }

    struct BrokenSurface;

    impl DrawingSurface for BrokenSurface {
        fn size(&self) -> (u32, u32) {
            (10, 10)
        }
        fn resize(&mut self, _: u32, _: u32) {}
        fn clear(&mut self) {}
        fn set_stroke_color(&mut self, _: RgbColor) {}
        fn draw_line(&mut self, _: i64, _: i64, _: i64, _: i64) -> Result<(), SurfaceError> {
            Err(SurfaceError::Unavailable("gone".into()))
        }
    }

    fn renderer(width: u32, height: u32) -> ConcentricRenderer<RecordingSurface> {
        ConcentricRenderer::new(RecordingSurface::new(width, height), RenderPolicy::default())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn initial_square_is_centered_and_ccw() {
        let extent = SurfaceExtent::new(640, 480);
        let square = build_initial_square(&extent, 0.95);
        let half = 0.5 * 0.95 * 479.0;
        let (cx, cy) = (319.5, 239.5);

        assert_eq!(square[0], Point::new(cx - half, cy - half));
        assert_eq!(square[1], Point::new(cx + half, cy - half));
        assert_eq!(square[2], Point::new(cx + half, cy + half));
        assert_eq!(square[3], Point::new(cx - half, cy + half));
        assert!(close(square[1].x - square[0].x, 0.95 * 479.0));
        assert!(close(square[3].y - square[0].y, 0.95 * 479.0));

        // Positive shoelace area means counter-clockwise in a Y-up space.
        let area2: f64 = (0..4)
            .map(|i| {
                let (a, b) = (square[i], square[(i + 1) % 4]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        assert!(area2 > 0.0);
    }

    #[test]
    fn end_to_end_500_by_500() {
        let r = renderer(500, 500);
        let extent = r.extent();
        assert_eq!((extent.max_x, extent.max_y, extent.min_max_xy), (499, 499, 499));
        assert_eq!(extent.center, Point::new(249.5, 249.5));

        let half = 0.5 * 0.95 * 499.0;

        let mut gens = r.generations();
        let g0 = gens.next().unwrap();
        assert!(close(g0[0].x, 249.5 - half) && close(g0[0].y, 249.5 - half));
        assert!(close(g0[2].x, 249.5 + half) && close(g0[2].y, 249.5 + half));

        let g1 = gens.next().unwrap();
        let (p, q) = (0.95, 0.05);
        let expected_x = p * (249.5 - half) + q * (249.5 + half);
        let expected_y = p * (249.5 - half) + q * (249.5 - half);
        assert!(close(g1[0].x, expected_x));
        assert!(close(g1[0].y, expected_y));
        assert_eq!(g1, next_generation(&g0, Contraction::new(0.05)));
    }

    #[test]
    fn render_all_draws_every_generation() {
        let mut r = renderer(500, 500);
        r.render_all().unwrap();
        let calls = &r.surface().calls;

        assert_eq!(calls[0], Call::Clear);
        assert_eq!(calls[1], Call::Stroke(RgbColor::new(0x21, 0x96, 0xF3)));
        assert_eq!(calls[2], Call::Stroke(HueCycle::default().color(0)));
        assert_eq!(r.surface().lines().len(), 50 * 4);
        let strokes = calls.iter().filter(|c| matches!(c, Call::Stroke(_))).count();
        assert_eq!(strokes, 51);

        // First square: bottom edge from x = 12.475 to 486.525 at logical y = 12.475,
        // so device y = 499 - 12.
        assert_eq!(calls[3], Call::Line(12, 487, 487, 487));
    }

    #[test]
    fn render_all_is_deterministic() {
        let mut r = renderer(640, 480);
        r.render_all().unwrap();
        let first = r.surface().calls.clone();
        r.render_all().unwrap();
        let all = &r.surface().calls;
        assert_eq!(&all[first.len()..], &first[..]);
    }

    #[test]
    fn iterated_state_is_never_rounded() {
        let r = renderer(500, 500);
        let mut exact = build_initial_square(&r.extent(), 0.95);
        for polygon in r.generations() {
            assert_eq!(polygon, exact);
            exact = next_generation(&exact, Contraction::default());
        }
        let last = r.generations().last().unwrap();
        assert!(last.iter().any(|v| v.x.fract() != 0.0));
    }

    #[test]
    fn one_by_one_surface_draws_degenerate_squares() {
        let mut r = renderer(1, 1);
        assert_eq!(r.extent().min_max_xy, 0);
        r.render_all().unwrap();
        let lines = r.surface().lines();
        assert_eq!(lines.len(), 200);
        assert!(lines.iter().all(|l| *l == Call::Line(0, 0, 0, 0)));
    }

    #[test]
    fn zero_sized_surface_does_not_fail() {
        let mut r = renderer(0, 0);
        assert!(r.render_all().is_ok());
    }

    #[test]
    fn draw_polygon_rejects_wrong_vertex_counts() {
        let mut r = renderer(100, 100);
        let points = [Point::new(1.0, 1.0); 5];

        for n in [3, 5, 0] {
            match r.draw_polygon(&points[..n]) {
                Err(RenderError::MalformedPolygon(found)) => assert_eq!(found, n),
                other => panic!("expected MalformedPolygon, got {other:?}"),
            }
        }
        assert!(r.surface().calls.is_empty());

        r.draw_polygon(&points[..4]).unwrap();
        assert_eq!(r.surface().lines().len(), 4);
    }

    #[test]
    fn draw_polygon_closes_the_loop() {
        let mut r = renderer(11, 11);
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        r.draw_polygon(&square).unwrap();
        assert_eq!(
            r.surface().lines(),
            vec![
                Call::Line(0, 10, 10, 10),
                Call::Line(10, 10, 10, 0),
                Call::Line(10, 0, 0, 0),
                Call::Line(0, 0, 0, 10),
            ]
        );
    }

    #[test]
    fn reinitialize_swaps_extent_and_resizes_surface() {
        let mut r = renderer(500, 500);
        r.reinitialize(800, 300);
        assert_eq!(r.extent(), SurfaceExtent::new(800, 300));
        assert_eq!(r.surface().size(), (800, 300));
        assert_eq!(r.surface().calls, vec![Call::Resize(800, 300)]);

        r.render_all().unwrap();
        let g0 = r.generations().next().unwrap();
        assert!(close(g0[0].x, 399.5 - 0.5 * 0.95 * 299.0));
    }

    #[test]
    fn surface_errors_abort_the_render() {
        let mut r = ConcentricRenderer::new(BrokenSurface, RenderPolicy::default());
        assert!(matches!(r.render_all(), Err(RenderError::Surface(_))));
    }

    #[test]
    fn generation_count_follows_policy() {
        let policy = RenderPolicy {
            generations: 7,
            ..RenderPolicy::default()
        };
        let r = ConcentricRenderer::new(RecordingSurface::new(50, 50), policy);
        assert_eq!(r.generations().len(), 7);
    }
}
