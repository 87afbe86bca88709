//! Geometry kernel: pure functions shared by hit testing and rendering.

pub mod outline;
pub mod sketch;

pub use outline::{FreehandOptions, outline_to_path, stroke_outline};
pub use sketch::{FillGeometry, SketchGenerator, SketchShape};

use kurbo::{BezPath, Circle, Point, Rect, Vec2};

/// Length of each arrowhead blade.
pub const ARROW_HEAD_LENGTH: f64 = 20.0;

/// Angle between the shaft and each blade (30°).
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Distance from a point to a line segment (a→b).
///
/// The projection parameter is clamped to `[0, 1]`; a degenerate segment
/// measures the distance to `a`.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Axis-aligned box spanned by `origin` and `origin + (width, height)`.
///
/// Negative extents (reverse drags) are normalized so that `x0 <= x1` and
/// `y0 <= y1`.
pub fn normalized_rect(origin: Point, width: f64, height: f64) -> Rect {
    Rect::new(origin.x, origin.y, origin.x + width, origin.y + height).abs()
}

/// Inclusive containment test (kurbo's `Rect::contains` excludes the far edges).
pub fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Circle derived from a drag box: the box diagonal is the diameter and the
/// box center is the circle center.
pub fn circle_from_box(origin: Point, width: f64, height: f64) -> Circle {
    let diameter = Vec2::new(width, height).hypot();
    let center = Point::new(origin.x + width / 2.0, origin.y + height / 2.0);
    Circle::new(center, diameter / 2.0)
}

/// End points of the two arrowhead blades for a shaft `start → end`.
///
/// Each blade starts at `end` and points back toward `start`, rotated by
/// `∓angle` from the shaft direction.
pub fn arrowhead_blades(start: Point, end: Point, length: f64, angle: f64) -> [Point; 2] {
    let shaft = (end.y - start.y).atan2(end.x - start.x);
    let blade = |theta: f64| Point::new(end.x - length * theta.cos(), end.y - length * theta.sin());
    [blade(shaft - angle), blade(shaft + angle)]
}

/// Closed smooth path through a polygon.
///
/// Each vertex becomes the control point of a quadratic curve whose end point
/// is the midpoint to the next vertex; the last vertex wraps to the first.
pub fn smooth_closed_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = points.first() else {
        return path;
    };
    path.move_to(first);
    for (i, &p0) in points.iter().enumerate() {
        let p1 = points[(i + 1) % points.len()];
        path.quad_to(p0, p0.midpoint(p1));
    }
    path.close_path();
    path
}
