//! Point-in-element tests used by the eraser.

use crate::shapes::{Element, ElementRef};
use kurbo::Point;

/// Half-size of the square around each freehand sample.
pub const FREEHAND_TOLERANCE: f64 = 10.0;

/// Maximum (exclusive) distance from a line or arrow shaft.
pub const SEGMENT_TOLERANCE: f64 = 10.0;

/// Hit tester with configurable tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTester {
    pub freehand_tolerance: f64,
    pub segment_tolerance: f64,
}

impl Default for HitTester {
    fn default() -> Self {
        Self {
            freehand_tolerance: FREEHAND_TOLERANCE,
            segment_tolerance: SEGMENT_TOLERANCE,
        }
    }
}

impl HitTester {
    pub fn with_tolerances(freehand_tolerance: f64, segment_tolerance: f64) -> Self {
        Self {
            freehand_tolerance,
            segment_tolerance,
        }
    }

    /// Whether `point` falls on `element`.
    pub fn is_within_element(&self, point: Point, element: &Element) -> bool {
        let tolerance = match element {
            Element::Freehand(_) => self.freehand_tolerance,
            Element::Line(_) | Element::Arrow(_) => self.segment_tolerance,
            Element::Rectangle(_) | Element::Circle(_) | Element::Text(_) => 0.0,
        };
        element.hit_test(point, tolerance)
    }

    /// Index of the topmost element under `point`.
    ///
    /// Elements are scanned from last (drawn on top) to first.
    pub fn topmost_hit(&self, elements: &[ElementRef], point: Point) -> Option<usize> {
        elements
            .iter()
            .rposition(|element| self.is_within_element(point, element))
    }
}

/// [`HitTester::is_within_element`] with the default tolerances.
pub fn is_within_element(point: Point, element: &Element) -> bool {
    HitTester::default().is_within_element(point, element)
}

/// [`HitTester::topmost_hit`] with the default tolerances.
pub fn topmost_hit(elements: &[ElementRef], point: Point) -> Option<usize> {
    HitTester::default().topmost_hit(elements, point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Arrow, Circle, Freehand, Line, Rectangle, Text};

    #[test]
    fn test_each_variant() {
        let line: Element = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).into();
        assert!(is_within_element(Point::new(50.0, 5.0), &line));
        assert!(!is_within_element(Point::new(50.0, 20.0), &line));

        let rect: Element = Rectangle::new(Point::new(100.0, 100.0), -50.0, -50.0).into();
        assert!(is_within_element(Point::new(80.0, 80.0), &rect));

        let circle: Element = Circle::new(Point::ZERO, 40.0, 40.0).into();
        assert!(is_within_element(Point::new(20.0, 20.0), &circle));
        assert!(!is_within_element(Point::new(60.0, 60.0), &circle));

        let arrow: Element = Arrow::new(Point::new(0.0, 0.0), Point::new(0.0, 100.0)).into();
        assert!(is_within_element(Point::new(9.5, 50.0), &arrow));

        let text: Element = Text::new(Point::ZERO, "hi".into(), 20.0, 16.0).into();
        assert!(is_within_element(Point::new(20.0, 16.0), &text));

        let freehand: Element = Freehand::from_points(vec![Point::new(5.0, 5.0)]).into();
        assert!(is_within_element(Point::new(14.0, -4.0), &freehand));
        assert!(!is_within_element(Point::new(15.0, 5.0), &freehand));
    }

    #[test]
    fn test_topmost_wins() {
        let bottom = Rectangle::new(Point::ZERO, 100.0, 100.0).into();
        let top = Rectangle::new(Point::new(25.0, 25.0), 50.0, 50.0).into();
        let elements: Vec<ElementRef> = vec![Element::into_ref(bottom), Element::into_ref(top)];

        assert_eq!(topmost_hit(&elements, Point::new(50.0, 50.0)), Some(1));
        assert_eq!(topmost_hit(&elements, Point::new(10.0, 10.0)), Some(0));
        assert_eq!(topmost_hit(&elements, Point::new(200.0, 10.0)), None);
    }

    #[test]
    fn test_custom_tolerance() {
        let line: Element = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).into();
        let tester = HitTester::with_tolerances(10.0, 25.0);
        assert!(tester.is_within_element(Point::new(50.0, 20.0), &line));
    }
}
