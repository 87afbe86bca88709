//! Freehand drawing shape.

use super::{ElementId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use uuid::Uuid;

/// A freehand stroke: sample points in the order they were drawn.
#[derive(Debug)]
pub struct Freehand {
    pub(crate) id: ElementId,
    /// Points in the freehand path.
    pub points: Vec<Point>,
    /// Style properties.
    pub style: Option<ShapeStyle>,
}

impl Freehand {
    /// Create a new empty freehand shape.
    pub fn new() -> Self {
        Self::from_points(Vec::new())
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: Some(ShapeStyle::default()),
        }
    }

    /// Attach a style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for Freehand {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Freehand {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: self.points.clone(),
            style: self.style.clone(),
        }
    }
}

impl ShapeTrait for Freehand {
    fn id(&self) -> ElementId {
        self.id
    }

    fn origin(&self) -> Point {
        self.points.first().copied().unwrap_or(Point::ZERO)
    }

    fn bounds(&self) -> Rect {
        let mut iter = self.points.iter();
        let Some(&first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(Rect::from_points(first, first), |r, &p| r.union_pt(p))
    }

    /// A hit is any sample inside a square of half-size `tolerance`.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.points
            .iter()
            .any(|p| (p.x - point.x).abs() < tolerance && (p.y - point.y).abs() < tolerance)
    }

    fn style(&self) -> Option<&ShapeStyle> {
        self.style.as_ref()
    }
}
