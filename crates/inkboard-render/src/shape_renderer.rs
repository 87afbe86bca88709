//! Turns elements into draw calls.
//!
//! Generated geometry is cached per element id; rebuilding it is pure and
//! deterministic (seeded jitter), so a cache miss only costs time.

use crate::renderer::Surface;
use inkboard_core::BoardConfig;
use inkboard_core::geometry::{
    ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH, FillGeometry, FreehandOptions, SketchGenerator,
    SketchShape, outline_to_path, stroke_outline,
};
use inkboard_core::shapes::{Element, ElementId, ElementRef, ShapeStyle, ShapeTrait, Text};
use kurbo::BezPath;
use std::collections::{HashMap, HashSet};

/// Geometry generated for one element.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    /// A single sketch primitive.
    Sketch(SketchShape),
    /// Several primitives drawn in order (arrow shaft and blades).
    Composite(Vec<SketchShape>),
    /// A closed freehand outline, filled with the stroke color.
    Outline(BezPath),
}

/// Generated geometry keyed by element id.
#[derive(Debug, Clone, Default)]
pub struct RenderCache {
    entries: HashMap<ElementId, Generated>,
}

impl RenderCache {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Generated> {
        self.entries.get(&id)
    }

    /// Drop entries for elements not in `elements`.
    pub fn retain_live(&mut self, elements: &[ElementRef]) {
        let live: HashSet<ElementId> = elements.iter().map(|e| e.id()).collect();
        let before = self.entries.len();
        self.entries.retain(|id, _| live.contains(id));
        let pruned = before - self.entries.len();
        if pruned > 0 {
            log::debug!("render cache pruned {pruned} entries");
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Draws elements onto a [`Surface`].
#[derive(Debug, Clone)]
pub struct ShapeRenderer {
    cache: RenderCache,
    generator: SketchGenerator,
    freehand: FreehandOptions,
    arrow_head_length: f64,
    arrow_head_angle: f64,
}

impl Default for ShapeRenderer {
    fn default() -> Self {
        Self {
            cache: RenderCache::default(),
            generator: SketchGenerator::new(),
            freehand: FreehandOptions::default(),
            arrow_head_length: ARROW_HEAD_LENGTH,
            arrow_head_angle: ARROW_HEAD_ANGLE,
        }
    }
}

impl ShapeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            freehand: config.freehand,
            arrow_head_length: config.arrow_head_length,
            arrow_head_angle: config.arrow_head_angle,
            ..Self::default()
        }
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Draw one element, generating and caching its geometry on first use.
    pub fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S, element: &Element) {
        let style = resolve_style(element);
        if let Element::Text(text) = element {
            draw_text(surface, text, &style);
            return;
        }
        let id = element.id();
        if !self.cache.contains(id) {
            let Some(generated) = self.generate(element, &style) else {
                return;
            };
            log::debug!("generated geometry for {} {id}", element.kind_name());
            self.cache.entries.insert(id, generated);
        }
        if let Some(generated) = self.cache.get(id) {
            paint(surface, generated, &style);
        }
    }

    /// Draw an element without reading or filling the cache.
    ///
    /// Used for in-progress previews, whose geometry changes on every move.
    pub fn draw_uncached<S: Surface + ?Sized>(&self, surface: &mut S, element: &Element) {
        let style = resolve_style(element);
        if let Element::Text(text) = element {
            draw_text(surface, text, &style);
            return;
        }
        if let Some(generated) = self.generate(element, &style) {
            paint(surface, &generated, &style);
        }
    }

    /// Clear the surface and draw every element in order.
    pub fn redraw<S: Surface + ?Sized>(&mut self, surface: &mut S, elements: &[ElementRef]) {
        surface.clear_all();
        for element in elements {
            self.draw(surface, element);
        }
        self.cache.retain_live(elements);
    }

    /// Build the geometry for an element. Text and empty strokes have none.
    pub fn generate(&self, element: &Element, style: &ShapeStyle) -> Option<Generated> {
        let generated = match element {
            Element::Freehand(stroke) => {
                if stroke.is_empty() {
                    return None;
                }
                let options = self.freehand.with_size(style.stroke_width * 2.0);
                let outline = stroke_outline(&stroke.points, &options);
                Generated::Outline(outline_to_path(&outline))
            }
            Element::Rectangle(rect) => Generated::Sketch(self.generator.rectangle(
                rect.position,
                rect.width,
                rect.height,
                style,
            )),
            Element::Line(line) => {
                Generated::Sketch(self.generator.line(line.start, line.end, style))
            }
            Element::Circle(circle) => {
                let diameter = circle.width.hypot(circle.height);
                Generated::Sketch(self.generator.circle(circle.center(), diameter, style))
            }
            Element::Arrow(arrow) => Generated::Composite(
                arrow
                    .segments(self.arrow_head_length, self.arrow_head_angle)
                    .iter()
                    .map(|&(a, b)| self.generator.line(a, b, style))
                    .collect(),
            ),
            Element::Text(_) => return None,
        };
        Some(generated)
    }
}

fn resolve_style(element: &Element) -> ShapeStyle {
    match element.style() {
        Some(style) => style.clone(),
        None => {
            log::debug!("{} {} has no style, using fallback", element.kind_name(), element.id());
            ShapeStyle::fallback()
        }
    }
}

fn draw_text<S: Surface + ?Sized>(surface: &mut S, text: &Text, style: &ShapeStyle) {
    if text.is_empty() {
        return;
    }
    surface.draw_text(&text.content, text.origin(), style.font_size(), style.stroke());
}

fn paint<S: Surface + ?Sized>(surface: &mut S, generated: &Generated, style: &ShapeStyle) {
    match generated {
        Generated::Outline(path) => surface.fill_path(path, style.stroke()),
        Generated::Sketch(shape) => paint_sketch(surface, shape, style),
        Generated::Composite(shapes) => {
            for shape in shapes {
                paint_sketch(surface, shape, style);
            }
        }
    }
}

fn paint_sketch<S: Surface + ?Sized>(surface: &mut S, shape: &SketchShape, style: &ShapeStyle) {
    if let (Some(fill), Some(color)) = (&shape.fill, style.fill()) {
        match fill {
            FillGeometry::Solid(path) => surface.fill_path(path, color),
            FillGeometry::Lines(path) => surface.stroke_path(path, style.stroke_width / 2.0, color),
        }
    }
    for path in &shape.strokes {
        surface.stroke_path(path, style.stroke_width, style.stroke());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use inkboard_core::shapes::{Arrow, Circle, Freehand, Line, Rectangle, SerializableColor};
    use kurbo::{PathEl, Point, Shape};

    fn surface() -> RecordingSurface {
        RecordingSurface::new(800, 600)
    }

    #[test]
    fn test_empty_freehand_draws_nothing() {
        let mut renderer = ShapeRenderer::new();
        let mut surface = surface();
        let stroke: Element = Freehand::new().into();
        renderer.draw(&mut surface, &stroke);
        assert!(surface.commands().is_empty());
        assert!(renderer.cache().is_empty());
    }

    #[test]
    fn test_freehand_fills_outline_with_stroke_color() {
        let mut renderer = ShapeRenderer::new();
        let mut surface = surface();
        let red = SerializableColor::new(255, 0, 0, 255);
        let style = ShapeStyle {
            stroke_color: red,
            ..ShapeStyle::fallback()
        };
        let stroke: Element = Freehand::from_points(vec![
            Point::new(10.0, 10.0),
            Point::new(30.0, 15.0),
            Point::new(60.0, 40.0),
        ])
        .with_style(style)
        .into();
        renderer.draw(&mut surface, &stroke);

        let [DrawCommand::Fill { path, color }] = surface.commands() else {
            panic!("expected one fill, got {:?}", surface.commands());
        };
        assert_eq!(*color, red);
        let els = path.elements();
        assert!(matches!(els.first(), Some(PathEl::MoveTo(_))));
        assert_eq!(els.last(), Some(&PathEl::ClosePath));
    }

    #[test]
    fn test_missing_style_uses_fallback() {
        let mut renderer = ShapeRenderer::new();
        let mut surface = surface();
        let mut line = Line::new(Point::ZERO, Point::new(50.0, 0.0));
        line.style = None;
        renderer.draw(&mut surface, &Element::from(line));

        assert!(!surface.commands().is_empty());
        for cmd in surface.commands() {
            let DrawCommand::Stroke { width, color, .. } = cmd else {
                panic!("unexpected {cmd:?}");
            };
            assert_eq!(*width, 2.0);
            assert_eq!(*color, SerializableColor::white());
        }
    }

    #[test]
    fn test_geometry_is_cached_once() {
        let mut renderer = ShapeRenderer::new();
        let mut surface = surface();
        let rect = Element::from(Rectangle::new(Point::new(10.0, 10.0), 50.0, 40.0)).into_ref();

        renderer.draw(&mut surface, &rect);
        let cached = renderer.cache().get(rect.id()).cloned();
        let first = surface.take_commands();
        renderer.draw(&mut surface, &rect);

        assert_eq!(renderer.cache().len(), 1);
        assert_eq!(renderer.cache().get(rect.id()).cloned(), cached);
        assert_eq!(surface.commands(), first.as_slice());
    }

    #[test]
    fn test_uncached_preview_leaves_cache_alone() {
        let renderer = ShapeRenderer::new();
        let mut surface = surface();
        let circle: Element = Circle::new(Point::ZERO, 30.0, 40.0).into();
        renderer.draw_uncached(&mut surface, &circle);
        assert!(!surface.commands().is_empty());
        assert!(renderer.cache().is_empty());
    }

    #[test]
    fn test_arrow_is_three_segments() {
        let renderer = ShapeRenderer::new();
        let style = ShapeStyle {
            roughness: 0.0,
            ..ShapeStyle::fallback()
        };
        let arrow: Element = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0))
            .with_style(style.clone())
            .into();
        let Some(Generated::Composite(parts)) = renderer.generate(&arrow, &style) else {
            panic!("expected composite");
        };
        assert_eq!(parts.len(), 3);

        let tip = Point::new(100.0, 0.0);
        for (part, expected_deg) in parts[1..].iter().zip([150.0_f64, -150.0]) {
            let els = parts_endpoints(part);
            assert_eq!(els.0, tip);
            let v = els.1 - tip;
            assert!((v.hypot() - 20.0).abs() < 1e-9);
            assert!((v.y.atan2(v.x).to_degrees() - expected_deg).abs() < 1e-9);
        }
    }

    fn parts_endpoints(shape: &SketchShape) -> (Point, Point) {
        let els = shape.strokes[0].elements();
        let PathEl::MoveTo(start) = els[0] else {
            panic!("path must start with move_to");
        };
        let end = match els[els.len() - 1] {
            PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => p,
            other => panic!("unexpected {other:?}"),
        };
        (start, end)
    }

    #[test]
    fn test_text_uses_style_font_size() {
        let mut renderer = ShapeRenderer::new();
        let mut surface = surface();
        let style = ShapeStyle {
            stroke_width: 1.0,
            ..ShapeStyle::fallback()
        };
        let text: Element = Text::new(Point::new(5.0, 6.0), "hi".into(), 10.0, 16.0)
            .with_style(style)
            .into();
        renderer.draw(&mut surface, &text);
        assert_eq!(
            surface.commands(),
            &[DrawCommand::Text {
                text: "hi".into(),
                origin: Point::new(5.0, 6.0),
                font_size: 16.0,
                color: SerializableColor::white(),
            }]
        );

        let empty: Element = Text::new(Point::ZERO, String::new(), 0.0, 16.0).into();
        surface.take_commands();
        renderer.draw(&mut surface, &empty);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_redraw_clears_and_prunes() {
        let mut renderer = ShapeRenderer::new();
        let mut surface = surface();
        let a = Element::from(Line::new(Point::ZERO, Point::new(10.0, 0.0))).into_ref();
        let b = Element::from(Line::new(Point::ZERO, Point::new(0.0, 10.0))).into_ref();

        renderer.redraw(&mut surface, &[a.clone(), b.clone()]);
        assert_eq!(renderer.cache().len(), 2);
        assert!(matches!(surface.commands().first(), Some(DrawCommand::Clear(_))));

        renderer.redraw(&mut surface, &[b.clone()]);
        assert!(!renderer.cache().contains(a.id()));
        assert!(renderer.cache().contains(b.id()));
    }

    #[test]
    fn test_edited_clone_gets_its_own_geometry() {
        let mut renderer = ShapeRenderer::new();
        let mut surface = surface();
        let original = Line::new(Point::ZERO, Point::new(100.0, 0.0));
        let mut edited = original.clone();
        edited.end = Point::new(0.0, 300.0);
        let original = Element::from(original).into_ref();
        let edited = Element::from(edited).into_ref();

        renderer.redraw(&mut surface, &[original.clone(), edited.clone()]);
        assert_eq!(renderer.cache().len(), 2);

        let Some(Generated::Sketch(shape)) = renderer.cache().get(edited.id()) else {
            panic!("expected sketch for edited line");
        };
        let height = shape.strokes[0].bounding_box().height();
        assert!(height > 250.0, "edited line height {height}");
    }

    #[test]
    fn test_fill_painted_before_outline() {
        let mut renderer = ShapeRenderer::new();
        let mut surface = surface();
        let style = ShapeStyle {
            fill_color: Some(SerializableColor::new(0, 0, 255, 255)),
            ..ShapeStyle::fallback()
        };
        let rect: Element = Rectangle::new(Point::ZERO, 40.0, 40.0).with_style(style).into();
        renderer.draw(&mut surface, &rect);
        assert!(matches!(surface.commands()[0], DrawCommand::Fill { .. }));
        assert!(matches!(surface.commands()[1], DrawCommand::Stroke { .. }));
    }
}
