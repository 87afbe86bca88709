//! Rectangle shape.

use super::{ElementId, ShapeStyle, ShapeTrait};
use crate::geometry::{normalized_rect, rect_contains_inclusive};
use kurbo::{Point, Rect};
use uuid::Uuid;

/// An axis-aligned rectangle spanned by a drag.
#[derive(Debug)]
pub struct Rectangle {
    pub(crate) id: ElementId,
    /// Corner where the drag began.
    pub position: Point,
    /// Signed width (negative when dragged leftwards).
    pub width: f64,
    /// Signed height (negative when dragged upwards).
    pub height: f64,
    /// Style properties.
    pub style: Option<ShapeStyle>,
}

impl Rectangle {
    /// Create a new rectangle.
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
}

impl Clone for Rectangle {
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

impl ShapeTrait for Rectangle {
    fn id(&self) -> ElementId {
        self.id
    }

    fn origin(&self) -> Point {
        self.position
    }

    fn bounds(&self) -> Rect {
        normalized_rect(self.position, self.width, self.height)
    }

    fn hit_test(&self, point: Point, _tolerance: f64) -> bool {
        rect_contains_inclusive(self.bounds(), point)
    }

    fn style(&self) -> Option<&ShapeStyle> {
        self.style.as_ref()
    }
}
