//! Arrow shape.

use super::{ElementId, ShapeStyle, ShapeTrait};
use crate::geometry::{ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH, arrowhead_blades, point_to_segment_dist};
use kurbo::{Point, Rect};
use uuid::Uuid;

/// A straight arrow with a two-blade head at the end point.
#[derive(Debug)]
pub struct Arrow {
    pub(crate) id: ElementId,
    /// Tail of the arrow.
    pub start: Point,
    /// Tip of the arrow.
    pub end: Point,
    /// Style properties.
    pub style: Option<ShapeStyle>,
}

impl Arrow {
    /// Create a new arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style: Some(ShapeStyle::default()),
        }
    }

    /// Attach a style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Blade tips with the default head geometry.
    pub fn blades(&self) -> [Point; 2] {
        self.blades_with(ARROW_HEAD_LENGTH, ARROW_HEAD_ANGLE)
    }

    pub fn blades_with(&self, length: f64, angle: f64) -> [Point; 2] {
        arrowhead_blades(self.start, self.end, length, angle)
    }

    /// Shaft followed by both blades, each drawn from the tip outwards.
    pub fn segments(&self, length: f64, angle: f64) -> [(Point, Point); 3] {
        let [left, right] = self.blades_with(length, angle);
        [(self.start, self.end), (self.end, left), (self.end, right)]
    }
}

impl Clone for Arrow {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            start: self.start,
            end: self.end,
            style: self.style.clone(),
        }
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ElementId {
        self.id
    }

    fn origin(&self) -> Point {
        self.start
    }

    fn bounds(&self) -> Rect {
        let [left, right] = self.blades();
        Rect::from_points(self.start, self.end)
            .union_pt(left)
            .union_pt(right)
    }

    /// Only the shaft is hit-tested; the head is decoration.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start, self.end) < tolerance
    }

    fn style(&self) -> Option<&ShapeStyle> {
        self.style.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_start_at_tip() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let segs = arrow.segments(ARROW_HEAD_LENGTH, ARROW_HEAD_ANGLE);
        assert_eq!(segs[0], (Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
        for (from, to) in &segs[1..] {
            assert_eq!(*from, Point::new(100.0, 0.0));
            assert!(((*to - *from).hypot() - 20.0).abs() < 1e-9);
            assert!(to.x < 100.0);
        }
    }

    #[test]
    fn test_bounds_include_head() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let bounds = arrow.bounds();
        assert!(bounds.y0 < -9.0 && bounds.y1 > 9.0);
    }

    #[test]
    fn test_hit_shaft() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(arrow.hit_test(Point::new(50.0, 5.0), 10.0));
        assert!(!arrow.hit_test(Point::new(50.0, 20.0), 10.0));
    }
}
