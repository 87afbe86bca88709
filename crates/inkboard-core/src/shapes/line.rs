//! Line shape.

use super::{ElementId, ShapeStyle, ShapeTrait};
use crate::geometry::point_to_segment_dist;
use kurbo::{Point, Rect};
use uuid::Uuid;

/// A straight line segment.
#[derive(Debug)]
pub struct Line {
    pub(crate) id: ElementId,
    /// Start point (where the drag began).
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Style properties.
    pub style: Option<ShapeStyle>,
}

impl Line {
    /// Create a new line.
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
}

// A clone is a new element with a fresh id.
impl Clone for Line {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            start: self.start,
            end: self.end,
            style: self.style.clone(),
        }
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ElementId {
        self.id
    }

    fn origin(&self) -> Point {
        self.start
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

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
    fn test_line_creation() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
        assert_eq!(line.origin(), Point::ZERO);
    }

    #[test]
    fn test_hit_test() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 5.0), 10.0));
        assert!(!line.hit_test(Point::new(50.0, 20.0), 10.0));
        // Tolerance is exclusive.
        assert!(!line.hit_test(Point::new(50.0, 10.0), 10.0));
    }

    #[test]
    fn test_bounds_normalized() {
        let line = Line::new(Point::new(100.0, 80.0), Point::new(20.0, 10.0));
        assert_eq!(line.bounds(), Rect::new(20.0, 10.0, 100.0, 80.0));
    }
}
