//! Circle shape.

use super::{ElementId, ShapeStyle, ShapeTrait};
use crate::geometry::circle_from_box;
use kurbo::{Circle as KurboCircle, Point, Rect, Shape as KurboShape};
use uuid::Uuid;

/// A circle inscribed around a drag box.
///
/// The box diagonal is the diameter, so the circle always extends past the
/// corners of the box that produced it.
#[derive(Debug)]
pub struct Circle {
    pub(crate) id: ElementId,
    /// Corner where the drag began.
    pub position: Point,
    /// Signed box width.
    pub width: f64,
    /// Signed box height.
    pub height: f64,
    /// Style properties.
    pub style: Option<ShapeStyle>,
}

impl Circle {
    /// Create a new circle from its drag box.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            style: Some(ShapeStyle::default()),
        }
    }

    /// Attach a style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Get as a kurbo Circle.
    pub fn as_kurbo(&self) -> KurboCircle {
        circle_from_box(self.position, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.as_kurbo().center
    }

    pub fn radius(&self) -> f64 {
        self.as_kurbo().radius
    }
}

impl Clone for Circle {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: self.position,
            width: self.width,
            height: self.height,
            style: self.style.clone(),
        }
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ElementId {
        self.id
    }

    fn origin(&self) -> Point {
        self.position
    }

    fn bounds(&self) -> Rect {
        self.as_kurbo().bounding_box()
    }

    fn hit_test(&self, point: Point, _tolerance: f64) -> bool {
        let circle = self.as_kurbo();
        (point - circle.center).hypot() <= circle.radius
    }

    fn style(&self) -> Option<&ShapeStyle> {
        self.style.as_ref()
    }
}
