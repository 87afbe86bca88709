//! Deterministic hand-drawn geometry.
//!
//! Mimics the rough.js look: every outline is drawn in two slightly different
//! passes, endpoints over/undershoot, and straight segments bow a little.
//! All randomness comes from a seeded xorshift generator, so the same seed
//! and roughness always produce identical geometry.

use super::smooth_closed_path;
use crate::shapes::{FillPattern, ShapeStyle};
use kurbo::{BezPath, PathEl, Point, Rect, Shape as KurboShape, Vec2};
use std::f64::consts::TAU;

/// Hachure line angle in degrees (rough.js default).
const HACHURE_ANGLE: f64 = -41.0;

/// Flattening tolerance for clean (roughness 0) curves.
const CURVE_TOLERANCE: f64 = 0.1;

/// Simple seeded random number generator (xorshift32).
#[derive(Debug, Clone)]
struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Random float in range [-1, 1]
    fn next_f64(&mut self) -> f64 {
        (self.next_u32() as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    /// Random offset scaled by amount
    fn offset(&mut self, amount: f64) -> f64 {
        self.next_f64() * amount
    }

    fn jitter(&mut self, p: Point, amount: f64) -> Point {
        Point::new(p.x + self.offset(amount), p.y + self.offset(amount))
    }
}

/// How a closed shape's interior is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum FillGeometry {
    /// Fill this region with the fill color.
    Solid(BezPath),
    /// Stroke these hatch lines with the fill color.
    Lines(BezPath),
}

/// Generated geometry for one primitive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SketchShape {
    /// Interior, painted before the outline.
    pub fill: Option<FillGeometry>,
    /// Outline passes, each stroked with the stroke color.
    pub strokes: Vec<BezPath>,
}

/// Generates sketch-style geometry from primitive parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SketchGenerator;

impl SketchGenerator {
    pub fn new() -> Self {
        Self
    }

    /// A straight line from `a` to `b`.
    pub fn line(&self, a: Point, b: Point, style: &ShapeStyle) -> SketchShape {
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        SketchShape {
            fill: None,
            strokes: self.passes(&path, style),
        }
    }

    /// A rectangle spanned by `origin` and `origin + (width, height)`.
    pub fn rectangle(
        &self,
        origin: Point,
        width: f64,
        height: f64,
        style: &ShapeStyle,
    ) -> SketchShape {
        let corners = [
            origin,
            Point::new(origin.x + width, origin.y),
            Point::new(origin.x + width, origin.y + height),
            Point::new(origin.x, origin.y + height),
        ];
        let mut path = BezPath::new();
        path.move_to(corners[0]);
        for &c in &corners[1..] {
            path.line_to(c);
        }
        path.close_path();

        SketchShape {
            fill: self.fill(&path, &corners, style),
            strokes: self.passes(&path, style),
        }
    }

    /// A circle of the given diameter around `center`.
    pub fn circle(&self, center: Point, diameter: f64, style: &ShapeStyle) -> SketchShape {
        let radius = diameter.abs() / 2.0;
        let polygon = circle_polygon(center, radius, segment_count(radius));

        let strokes = if style.roughness <= 0.0 {
            vec![kurbo::Circle::new(center, radius).to_path(CURVE_TOLERANCE)]
        } else {
            (0..2)
                .map(|pass| {
                    let mut rng = SimpleRng::new(pass_seed(style.seed, pass));
                    rough_circle(center, radius, style.roughness, &mut rng)
                })
                .collect()
        };

        let outline = if style.roughness <= 0.0 {
            kurbo::Circle::new(center, radius).to_path(CURVE_TOLERANCE)
        } else {
            let mut rng = SimpleRng::new(pass_seed(style.seed, 2));
            rough_circle(center, radius, style.roughness * 0.3, &mut rng)
        };

        SketchShape {
            fill: self.fill(&outline, &polygon, style),
            strokes,
        }
    }

    /// Outline passes for a path: one clean pass, or two rough ones.
    fn passes(&self, path: &BezPath, style: &ShapeStyle) -> Vec<BezPath> {
        if style.roughness <= 0.0 {
            return vec![path.clone()];
        }
        (0..2)
            .map(|pass| roughen(path, style.roughness, pass_seed(style.seed, pass)))
            .collect()
    }

    fn fill(
        &self,
        outline: &BezPath,
        polygon: &[Point],
        style: &ShapeStyle,
    ) -> Option<FillGeometry> {
        style.fill_color?;
        let gap = (style.stroke_width * 4.0).max(4.0);
        match style.fill_pattern {
            FillPattern::Solid => {
                let region = if style.roughness > 0.0 {
                    roughen(outline, style.roughness * 0.3, pass_seed(style.seed, 0))
                } else {
                    outline.clone()
                };
                Some(FillGeometry::Solid(region))
            }
            FillPattern::Hachure => Some(FillGeometry::Lines(self.hatch(
                polygon,
                &[HACHURE_ANGLE],
                gap,
                style,
            ))),
            FillPattern::CrossHatch => Some(FillGeometry::Lines(self.hatch(
                polygon,
                &[HACHURE_ANGLE, HACHURE_ANGLE + 90.0],
                gap,
                style,
            ))),
        }
    }

    fn hatch(&self, polygon: &[Point], angles: &[f64], gap: f64, style: &ShapeStyle) -> BezPath {
        let mut path = BezPath::new();
        for &angle in angles {
            for (a, b) in hachure_lines(polygon, angle, gap) {
                path.move_to(a);
                path.line_to(b);
            }
        }
        if style.roughness > 0.0 {
            roughen(&path, style.roughness * 0.5, pass_seed(style.seed, 3))
        } else {
            path
        }
    }
}

/// Seed for one drawing pass; a large prime keeps passes uncorrelated.
fn pass_seed(seed: u32, pass: u32) -> u32 {
    seed.wrapping_add(pass.wrapping_mul(99991))
}

/// Apply the hand-drawn effect to a polyline path.
///
/// - Endpoints are randomly offset (lines overshoot/undershoot at corners)
/// - Lines bow perpendicular to their direction
/// - Offsets shrink for short segments so tiny shapes stay legible
fn roughen(path: &BezPath, roughness: f64, seed: u32) -> BezPath {
    if roughness <= 0.0 {
        return path.clone();
    }

    let max_offset = roughness * 2.0;
    let bowing = roughness;
    let mut rng = SimpleRng::new(seed);

    let mut result = BezPath::new();
    let mut last_point = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                result.move_to(rng.jitter(p, max_offset * 0.5));
                last_point = p;
            }
            PathEl::LineTo(p) => {
                let d = p - last_point;
                let len = d.hypot();
                let offset = max_offset.min(len / 10.0);

                let bow = rng.offset(bowing * roughness * len / 200.0);
                let perp = if len > 0.001 {
                    Vec2::new(-d.y / len, d.x / len)
                } else {
                    Vec2::ZERO
                };
                let mid = last_point.midpoint(p) + perp * bow;

                result.quad_to(mid, rng.jitter(p, offset));
                last_point = p;
            }
            PathEl::QuadTo(p1, p2) => {
                result.quad_to(rng.jitter(p1, max_offset * 0.7), rng.jitter(p2, max_offset));
                last_point = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                result.curve_to(
                    rng.jitter(p1, max_offset * 0.5),
                    rng.jitter(p2, max_offset * 0.5),
                    rng.jitter(p3, max_offset),
                );
                last_point = p3;
            }
            PathEl::ClosePath => {
                result.close_path();
            }
        }
    }

    result
}

/// Jittered closed curve around a circle, with a slight overlap at the seam.
fn rough_circle(center: Point, radius: f64, roughness: f64, rng: &mut SimpleRng) -> BezPath {
    let count = segment_count(radius);
    let start = rng.offset(std::f64::consts::PI);
    let wobble = roughness * (1.0 + radius * 0.02).min(4.0);
    let points: Vec<Point> = (0..count)
        .map(|i| {
            let angle = start + TAU * i as f64 / count as f64;
            let r = radius + rng.offset(wobble);
            Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
        })
        .collect();
    smooth_closed_path(&points)
}

fn segment_count(radius: f64) -> usize {
    ((TAU * radius / 12.0).ceil() as usize).clamp(12, 96)
}

fn circle_polygon(center: Point, radius: f64, count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f64 / count as f64;
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// Parallel lines at `angle_deg`, `gap` apart, clipped to a polygon.
///
/// The polygon is rotated so the hatch direction is horizontal, scanned with
/// horizontal lines, and the resulting spans are rotated back.
pub fn hachure_lines(polygon: &[Point], angle_deg: f64, gap: f64) -> Vec<(Point, Point)> {
    if polygon.len() < 3 || gap <= 0.0 {
        return Vec::new();
    }

    let angle = angle_deg.to_radians();
    let pivot = polygon_bounds(polygon).center();
    let rotated: Vec<Point> = polygon.iter().map(|&p| rotate(p, pivot, -angle)).collect();
    let bounds = polygon_bounds(&rotated);

    let mut lines = Vec::new();
    let mut y = bounds.y0 + gap / 2.0;
    while y < bounds.y1 {
        let mut xs: Vec<f64> = Vec::new();
        for (i, &a) in rotated.iter().enumerate() {
            let b = rotated[(i + 1) % rotated.len()];
            // Half-open rule so shared vertices count once.
            if (a.y <= y && b.y > y) || (b.y <= y && a.y > y) {
                let t = (y - a.y) / (b.y - a.y);
                xs.push(a.x + t * (b.x - a.x));
            }
        }
        xs.sort_by(|a, b| a.total_cmp(b));
        for pair in xs.chunks_exact(2) {
            let start = rotate(Point::new(pair[0], y), pivot, angle);
            let end = rotate(Point::new(pair[1], y), pivot, angle);
            lines.push((start, end));
        }
        y += gap;
    }
    lines
}

fn polygon_bounds(points: &[Point]) -> Rect {
    points
        .iter()
        .fold(Rect::from_points(points[0], points[0]), |r, &p| r.union_pt(p))
}

fn rotate(p: Point, center: Point, angle: f64) -> Point {
    let (s, c) = angle.sin_cos();
    let d = p - center;
    Point::new(center.x + d.x * c - d.y * s, center.y + d.x * s + d.y * c)
}
