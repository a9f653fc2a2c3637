use crate::node::Point;
use crate::viewport::Viewport;

/// Cubic bezier curve used for connection rendering and hit testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start point
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End point
}

impl CubicBezier {
    /// Left-to-right flowchart curve: both control points are pushed
    /// horizontally by `offset`, forward from the start and back from the end.
    pub fn flowchart(start: Point, end: Point, offset: f32) -> Self {
        CubicBezier {
            p0: start,
            p1: start.offset(offset, 0.0),
            p2: end.offset(-offset, 0.0),
            p3: end,
        }
    }

    /// Map every point from screen space into canvas space.
    ///
    /// Paths live inside the scaled and translated canvas, next to the nodes
    /// and port dots.
    pub fn to_canvas(&self, viewport: &Viewport) -> Self {
        let f = |p: Point| viewport.screen_to_canvas(p);
        CubicBezier {
            p0: f(self.p0),
            p1: f(self.p1),
            p2: f(self.p2),
            p3: f(self.p3),
        }
    }

    /// SVG path commands, e.g. `"M 10 20 C 110 20 90 80 190 80"`.
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        )
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.p0.x
            + 3.0 * mt2 * t * self.p1.x
            + 3.0 * mt * t2 * self.p2.x
            + t3 * self.p3.x;
        let y = mt3 * self.p0.y
            + 3.0 * mt2 * t * self.p1.y
            + 3.0 * mt * t2 * self.p2.y
            + t3 * self.p3.y;

        Point::new(x, y)
    }
}

/// Path commands for a connection between two screen-space anchors.
///
/// Control points are offset by `offset` screen units, then every coordinate
/// is mapped back into canvas space, so the path shares the transform of the
/// node boxes it joins.
pub fn connection_path(start: Point, end: Point, viewport: &Viewport, offset: f32) -> String {
    CubicBezier::flowchart(start, end, offset).to_canvas(viewport).to_svg()
}

/// Calculate squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f32 {
    let ab = (b.x - a.x, b.y - a.y);
    let ap = (point.x - a.x, point.y - a.y);

    let ab_len_sq = ab.0 * ab.0 + ab.1 * ab.1;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.0 * ap.0 + ap.1 * ap.1;
    }

    // Project point onto line, clamped to segment
    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / ab_len_sq).clamp(0.0, 1.0);

    let closest = Point::new(a.x + t * ab.0, a.y + t * ab.1);
    point.distance_sq(closest)
}

/// Calculate the minimum distance from a point to a cubic bezier curve
///
/// Samples the curve into `num_samples` segments (20 if zero) and measures
/// the distance to the closest one.
pub fn distance_to_bezier(point: Point, bezier: &CubicBezier, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);

        let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}
