// Geometry primitives for the radial diagram
//
// All coordinates are center-origin with y pointing down (screen frame), so
// increasing angle proceeds clockwise and pi/2 is the bottom of the circle.

use crate::model::InterfaceKind;

/// One cartesian point in the diagram's center-origin frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert polar (angle in radians, radius) to cartesian.
    pub fn from_polar(angle: f64, radius: f64) -> Self {
        Self {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
        }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn scale(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Extra tangential units added to the outer edge per row, to suggest
/// outward flaring for interfaces in deeper rows.
const ROW_FLARE_PER_ROW: f64 = 3.0;

/// Ring-segment outline of one interface glyph: two arcs joined by straight
/// radial edges. The edge widths are flared by row so deeper rows read as
/// widening outward; angular spans for both edges are computed against the
/// glyph's own base radius, which is what gives the ring-segment look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphOutline {
    /// Angle of the glyph center.
    pub center_angle: f64,
    /// Radius of the inner edge (closer to center).
    pub radius_inner: f64,
    /// Radius of the outer edge.
    pub radius_outer: f64,
    /// Angular half-span of the inner edge.
    pub half_span_inner: f64,
    /// Angular half-span of the outer edge.
    pub half_span_outer: f64,
}

impl GlyphOutline {
    /// Build the outline for a glyph of tangential width `width` and radial
    /// height `height` whose inner edge sits at `radius`, in row `row`.
    pub fn new(center_angle: f64, radius: f64, width: f64, height: f64, row: usize) -> Self {
        let flare = row as f64 * ROW_FLARE_PER_ROW;
        let outer_width = width + flare;
        // The inner edge loses slightly less than the outer edge gains.
        let inner_width = (width - (flare - 2.0).max(0.0)).max(2.0);
        Self {
            center_angle,
            radius_inner: radius,
            radius_outer: radius + height,
            half_span_inner: inner_width / 2.0 / radius,
            half_span_outer: outer_width / 2.0 / radius,
        }
    }

    /// Sample the outline into a closed polygon: outer arc swept forward,
    /// then inner arc swept back. For backends without arc primitives.
    pub fn to_polygon(&self, samples_per_arc: usize) -> Vec<Point> {
        let n = samples_per_arc.max(2);
        let mut points = Vec::with_capacity(n * 2);
        for k in 0..n {
            let t = k as f64 / (n - 1) as f64;
            let a = self.center_angle - self.half_span_outer
                + t * 2.0 * self.half_span_outer;
            points.push(Point::from_polar(a, self.radius_outer));
        }
        for k in 0..n {
            let t = k as f64 / (n - 1) as f64;
            let a = self.center_angle + self.half_span_inner
                - t * 2.0 * self.half_span_inner;
            points.push(Point::from_polar(a, self.radius_inner));
        }
        points
    }
}

/// One quadratic Bezier describing a traffic curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadCurve {
    pub from: Point,
    pub ctrl: Point,
    pub to: Point,
}

impl QuadCurve {
    /// Point on the curve at parameter `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        Point::new(
            u * u * self.from.x + 2.0 * u * t * self.ctrl.x + t * t * self.to.x,
            u * u * self.from.y + 2.0 * u * t * self.ctrl.y + t * t * self.to.y,
        )
    }
}

/// Fraction of the anchor midpoint kept when pulling the control point
/// toward the diagram center.
const CURVE_CENTER_PULL: f64 = 0.4;

/// Perpendicular bow, as a fraction of the ring radius, that keeps curves
/// converging on one anchor visually distinguishable.
const CURVE_PERP_FRACTION: f64 = 0.08;

/// Build the traffic curve between two anchor points.
///
/// The control point is the anchor midpoint pulled toward the center (scaled
/// by 0.4 in the center-origin frame) plus a lateral offset perpendicular to
/// the anchor-to-anchor direction.
pub fn traffic_curve(from: Point, to: Point, ring_radius: f64) -> QuadCurve {
    let pull = from.midpoint(to).scale(CURVE_CENTER_PULL);

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    let ctrl = if len > f64::EPSILON {
        let mag = ring_radius * CURVE_PERP_FRACTION;
        pull.add(Point::new(-dy / len * mag, dx / len * mag))
    } else {
        pull
    };

    QuadCurve { from, ctrl, to }
}

/// Whether a traffic curve may be drawn between two interface kinds.
///
/// Standard interfaces connect to anything; infrastructure appliances only
/// connect to standard interfaces, so the diagram never shows
/// infra-to-infra curves.
pub fn can_connect(src: InterfaceKind, dst: InterfaceKind) -> bool {
    src == InterfaceKind::Standard || dst == InterfaceKind::Standard
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_from_polar_bottom_of_circle() {
        // pi/2 is the bottom in the y-down frame.
        let p = Point::from_polar(PI / 2.0, 10.0);
        assert!(p.x.abs() < EPS);
        assert!((p.y - 10.0).abs() < EPS);
    }

    #[test]
    fn test_from_polar_clockwise() {
        // A little past pi/2 moves toward negative x (clockwise on screen).
        let p = Point::from_polar(PI / 2.0 + 0.1, 10.0);
        assert!(p.x < 0.0);
    }

    #[test]
    fn test_glyph_outline_row_zero_no_flare() {
        let g = GlyphOutline::new(PI / 2.0, 100.0, 34.0, 16.0, 0);
        assert!((g.radius_outer - 116.0).abs() < EPS);
        // Row 0: outer 34 wide, inner 34 wide (no flare, no narrowing).
        assert!((g.half_span_outer - 17.0 / 100.0).abs() < EPS);
        assert!((g.half_span_inner - 17.0 / 100.0).abs() < EPS);
    }

    #[test]
    fn test_glyph_outline_deeper_rows_flare() {
        let g = GlyphOutline::new(0.0, 100.0, 34.0, 16.0, 2);
        // Row 2: outer widened by 6, inner narrowed by 4.
        assert!((g.half_span_outer - 20.0 / 100.0).abs() < EPS);
        assert!((g.half_span_inner - 15.0 / 100.0).abs() < EPS);
    }

    #[test]
    fn test_glyph_polygon_is_closed_band() {
        let g = GlyphOutline::new(1.0, 100.0, 34.0, 16.0, 0);
        let poly = g.to_polygon(8);
        assert_eq!(poly.len(), 16);
        // First half on the outer radius, second half on the inner radius.
        let origin = Point::default();
        for p in &poly[..8] {
            assert!((p.distance(origin) - g.radius_outer).abs() < 1e-6);
        }
        for p in &poly[8..] {
            assert!((p.distance(origin) - g.radius_inner).abs() < 1e-6);
        }
    }

    #[test]
    fn test_quad_curve_endpoints() {
        let c = QuadCurve {
            from: Point::new(0.0, 0.0),
            ctrl: Point::new(5.0, 10.0),
            to: Point::new(10.0, 0.0),
        };
        assert!((c.point_at(0.0).x - 0.0).abs() < EPS);
        assert!((c.point_at(1.0).x - 10.0).abs() < EPS);
        // Midpoint of a quadratic passes halfway toward the control point.
        assert!((c.point_at(0.5).y - 5.0).abs() < EPS);
    }

    #[test]
    fn test_traffic_curve_control_point() {
        let from = Point::new(100.0, 0.0);
        let to = Point::new(0.0, 100.0);
        let c = traffic_curve(from, to, 100.0);
        // Pull component: midpoint (50, 50) scaled by 0.4 = (20, 20).
        // Perp of normalized (-100, 100)/len with magnitude 8:
        // (-dy, dx)/len * 8 = (-100, -100)/141.42 * 8.
        let len = (2.0_f64).sqrt() * 100.0;
        let expected_x = 20.0 + (-100.0 / len) * 8.0;
        let expected_y = 20.0 + (-100.0 / len) * 8.0;
        assert!((c.ctrl.x - expected_x).abs() < 1e-9);
        assert!((c.ctrl.y - expected_y).abs() < 1e-9);
    }

    #[test]
    fn test_traffic_curve_degenerate_pair() {
        let p = Point::new(30.0, 40.0);
        let c = traffic_curve(p, p, 100.0);
        // Coincident anchors: control is just the center pull, no NaN.
        assert!((c.ctrl.x - 12.0).abs() < EPS);
        assert!((c.ctrl.y - 16.0).abs() < EPS);
    }

    #[test]
    fn test_can_connect_matrix() {
        use InterfaceKind::*;
        assert!(can_connect(Igw, Standard));
        assert!(can_connect(Standard, Igw));
        assert!(can_connect(Standard, Standard));
        assert!(!can_connect(Igw, Igw));
        assert!(!can_connect(Endpoint, Dns));
        assert!(can_connect(Vgw, Standard));
    }
}
