//! Text shape.

use super::{ElementId, ShapeStyle, ShapeTrait};
use crate::geometry::{normalized_rect, rect_contains_inclusive};
use kurbo::{Point, Rect};
use uuid::Uuid;

/// A single run of text anchored at its top-left corner.
///
/// `width` and `height` are measured once when the text is committed.
#[derive(Debug)]
pub struct Text {
    pub(crate) id: ElementId,
    /// Top-left anchor.
    pub position: Point,
    /// Text content.
    pub content: String,
    /// Measured width.
    pub width: f64,
    /// Measured height (the font size).
    pub height: f64,
    /// Style properties.
    pub style: Option<ShapeStyle>,
}

impl Text {
    /// Create a new text element with measured extents.
    pub fn new(position: Point, content: String, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
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

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl Clone for Text {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: self.position,
            content: self.content.clone(),
            width: self.width,
            height: self.height,
            style: self.style.clone(),
        }
    }
}

impl ShapeTrait for Text {
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
