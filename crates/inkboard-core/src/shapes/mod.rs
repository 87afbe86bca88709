//! Element definitions for the whiteboard.

mod arrow;
mod circle;
mod freehand;
mod line;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use circle::Circle;
pub use freehand::Freehand;
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::Text;

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Serializable color representation (RGBA8), written as `#rrggbb[aa]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or `transparent`.
    pub fn from_hex(color: &str) -> Option<Self> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }
        let hex = color.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_string()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Fill pattern style for closed shapes (inspired by roughjs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillPattern {
    /// Solid fill color.
    #[default]
    Solid,
    /// Parallel diagonal lines.
    Hachure,
    /// Cross-hatched lines.
    CrossHatch,
}

/// Style properties attached to an element.
///
/// Elements carry their own copy; changing the tool style later never
/// affects elements that were already drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Fill color (None = transparent).
    pub fill_color: Option<SerializableColor>,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill pattern style.
    pub fill_pattern: FillPattern,
    /// Seed for the hand-drawn jitter; equal seeds render identically.
    pub seed: u32,
    /// Jitter amount (0 = clean lines).
    pub roughness: f64,
}

impl ShapeStyle {
    /// Style used for elements that arrive without one.
    pub fn fallback() -> Self {
        Self {
            stroke_color: SerializableColor::white(),
            fill_color: None,
            stroke_width: 2.0,
            fill_pattern: FillPattern::Solid,
            seed: 1,
            roughness: 1.0,
        }
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }

    /// Font size used for text drawn with this style.
    pub fn font_size(&self) -> f64 {
        12.0 + self.stroke_width * 4.0
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Shared handle to an immutable element.
///
/// The document and the history hold clones of the same handle, so an
/// element restored by undo/redo is the very allocation that was removed.
pub type ElementRef = Arc<Element>;

/// Common trait for all element variants.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ElementId;

    /// The point the element was started from.
    fn origin(&self) -> Point;

    /// Get the (normalized) bounding box.
    fn bounds(&self) -> Rect;

    /// Check if a point hits this element.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the style, if one was attached.
    fn style(&self) -> Option<&ShapeStyle>;
}

/// A drawable element.
#[derive(Debug, Clone)]
pub enum Element {
    Line(Line),
    Rectangle(Rectangle),
    Circle(Circle),
    Arrow(Arrow),
    Text(Text),
    Freehand(Freehand),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Line(s) => s.id(),
            Element::Rectangle(s) => s.id(),
            Element::Circle(s) => s.id(),
            Element::Arrow(s) => s.id(),
            Element::Text(s) => s.id(),
            Element::Freehand(s) => s.id(),
        }
    }

    pub fn origin(&self) -> Point {
        match self {
            Element::Line(s) => s.origin(),
            Element::Rectangle(s) => s.origin(),
            Element::Circle(s) => s.origin(),
            Element::Arrow(s) => s.origin(),
            Element::Text(s) => s.origin(),
            Element::Freehand(s) => s.origin(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Element::Line(s) => s.bounds(),
            Element::Rectangle(s) => s.bounds(),
            Element::Circle(s) => s.bounds(),
            Element::Arrow(s) => s.bounds(),
            Element::Text(s) => s.bounds(),
            Element::Freehand(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Element::Line(s) => s.hit_test(point, tolerance),
            Element::Rectangle(s) => s.hit_test(point, tolerance),
            Element::Circle(s) => s.hit_test(point, tolerance),
            Element::Arrow(s) => s.hit_test(point, tolerance),
            Element::Text(s) => s.hit_test(point, tolerance),
            Element::Freehand(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn style(&self) -> Option<&ShapeStyle> {
        match self {
            Element::Line(s) => s.style(),
            Element::Rectangle(s) => s.style(),
            Element::Circle(s) => s.style(),
            Element::Arrow(s) => s.style(),
            Element::Text(s) => s.style(),
            Element::Freehand(s) => s.style(),
        }
    }

    /// Short variant name, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Line(_) => "line",
            Element::Rectangle(_) => "rectangle",
            Element::Circle(_) => "circle",
            Element::Arrow(_) => "arrow",
            Element::Text(_) => "text",
            Element::Freehand(_) => "freehand",
        }
    }

    /// Freeze this element into a shared handle.
    pub fn into_ref(self) -> ElementRef {
        Arc::new(self)
    }
}

impl From<Line> for Element {
    fn from(s: Line) -> Self {
        Element::Line(s)
    }
}

impl From<Rectangle> for Element {
    fn from(s: Rectangle) -> Self {
        Element::Rectangle(s)
    }
}

impl From<Circle> for Element {
    fn from(s: Circle) -> Self {
        Element::Circle(s)
    }
}

impl From<Arrow> for Element {
    fn from(s: Arrow) -> Self {
        Element::Arrow(s)
    }
}

impl From<Text> for Element {
    fn from(s: Text) -> Self {
        Element::Text(s)
    }
}

impl From<Freehand> for Element {
    fn from(s: Freehand) -> Self {
        Element::Freehand(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_round_trip() {
        let c = SerializableColor::from_hex("#1e90ff").unwrap();
        assert_eq!(c, SerializableColor::new(0x1e, 0x90, 0xff, 255));
        assert_eq!(c.to_string(), "#1e90ff");
        assert_eq!(SerializableColor::from_hex("#fff"), Some(SerializableColor::white()));
        assert_eq!(
            SerializableColor::from_hex("transparent"),
            Some(SerializableColor::transparent())
        );
        assert_eq!(SerializableColor::transparent().to_string(), "#00000000");
        assert!(SerializableColor::from_hex("red").is_none());
        assert!(SerializableColor::from_hex("#12345").is_none());
        assert!(SerializableColor::from_hex("#aéaaa").is_none());
        assert!(SerializableColor::from_hex("#ééé").is_none());
    }

    #[test]
    fn test_non_ascii_color_is_a_json_error() {
        let json = r##"{"stroke_color":"#aéaaa"}"##;
        assert!(serde_json::from_str::<ShapeStyle>(json).is_err());
    }

    #[test]
    fn test_style_json_uses_hex_colors() {
        let json = r##"{"stroke_color":"#ff0000","stroke_width":3.0,"fill_pattern":"hachure"}"##;
        let style: ShapeStyle = serde_json::from_str(json).unwrap();
        assert_eq!(style.stroke_color, SerializableColor::new(255, 0, 0, 255));
        assert_eq!(style.stroke_width, 3.0);
        assert_eq!(style.fill_pattern, FillPattern::Hachure);
        assert_eq!(style.seed, 1);
        assert!(style.fill_color.is_none());
    }

    #[test]
    fn test_font_size_follows_stroke_width() {
        let style = ShapeStyle {
            stroke_width: 1.0,
            ..ShapeStyle::fallback()
        };
        assert_eq!(style.font_size(), 16.0);
    }

    #[test]
    fn test_elements_have_distinct_ids() {
        let a: Element = Line::new(Point::ZERO, Point::new(1.0, 1.0)).into();
        let b: Element = Line::new(Point::ZERO, Point::new(1.0, 1.0)).into();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.kind_name(), "line");
    }

    #[test]
    fn test_clone_is_a_new_element() {
        let original = Line::new(Point::ZERO, Point::new(100.0, 0.0));
        let mut edited = original.clone();
        edited.end = Point::new(0.0, 300.0);
        assert_ne!(original.id(), edited.id());
        assert_eq!(original.end, Point::new(100.0, 0.0));

        let element: Element = Freehand::from_points(vec![Point::ZERO]).into();
        assert_ne!(element.clone().id(), element.id());
    }
}
