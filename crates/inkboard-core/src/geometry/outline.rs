//! Freehand stroke outline synthesis.
//!
//! Turns raw pointer samples into a closed polygon approximating a brush
//! stroke whose width varies with simulated pressure. Fast segments thin the
//! stroke, slow segments thicken it, and sharp reversals get rounded caps.

use super::smooth_closed_path;
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Pressure assumed for samples that carry none.
const DEFAULT_PRESSURE: f64 = 0.5;

/// How quickly simulated pressure follows speed changes.
const RATE_OF_PRESSURE_CHANGE: f64 = 0.275;

/// Slightly more than π so that rotated cap points close without a seam.
const FIXED_PI: f64 = std::f64::consts::PI + 0.0001;

/// Cap tessellation (steps per half turn).
const CAP_STEPS: usize = 13;
const END_CAP_STEPS: usize = 29;

/// Tunable parameters for outline synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreehandOptions {
    /// Base diameter of the stroke.
    pub size: f64,
    /// How much simulated pressure narrows the stroke (0 = constant width).
    pub thinning: f64,
    /// Minimum spacing between outline vertices, as a fraction of `size`.
    pub smoothing: f64,
    /// How loosely the centerline follows the raw input (0 = tightly).
    pub streamline: f64,
}

impl Default for FreehandOptions {
    fn default() -> Self {
        Self {
            size: 4.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
        }
    }
}

impl FreehandOptions {
    /// Copy of these options with a different base size.
    pub fn with_size(self, size: f64) -> Self {
        Self { size, ..self }
    }
}

/// A streamlined centerline sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    pub point: Point,
    pub pressure: f64,
    /// Unit vector pointing from this sample back to the previous one.
    pub vector: Vec2,
    /// Distance to the previous sample.
    pub distance: f64,
    /// Length of the centerline up to this sample.
    pub running_length: f64,
}

/// Build the closed outline polygon for a freehand stroke.
///
/// Returns an empty polygon for empty input or a non-positive size.
pub fn stroke_outline(input: &[Point], options: &FreehandOptions) -> Vec<Point> {
    let points = stroke_points(input, options);
    outline_points(&points, options)
}

/// Streamline raw samples into centerline points with direction and length.
pub fn stroke_points(input: &[Point], options: &FreehandOptions) -> Vec<StrokePoint> {
    let Some(&first) = input.first() else {
        return Vec::new();
    };

    let t = 0.15 + (1.0 - options.streamline) * 0.85;

    let mut samples: Vec<Point> = input.to_vec();
    match samples.len() {
        // Two samples give too little to smooth; interpolate a few in between.
        2 => {
            let last = samples[1];
            samples.truncate(1);
            samples.extend((1..5).map(|i| first.lerp(last, i as f64 / 4.0)));
        }
        1 => samples.push(first + Vec2::new(1.0, 1.0)),
        _ => {}
    }

    let mut out = vec![StrokePoint {
        point: first,
        pressure: DEFAULT_PRESSURE,
        vector: Vec2::new(1.0, 1.0),
        distance: 0.0,
        running_length: 0.0,
    }];

    let max = samples.len() - 1;
    let mut running_length = 0.0;
    let mut reached_minimum_length = false;

    for (i, &raw) in samples.iter().enumerate().skip(1) {
        let prev = out[out.len() - 1].point;
        let point = prev.lerp(raw, t);
        if point == prev {
            continue;
        }

        let distance = (point - prev).hypot();
        running_length += distance;

        // Skip the wobbly start until the stroke is at least one size long.
        if i < max && !reached_minimum_length {
            if running_length < options.size {
                continue;
            }
            reached_minimum_length = true;
        }

        out.push(StrokePoint {
            point,
            pressure: DEFAULT_PRESSURE,
            vector: unit(prev - point),
            distance,
            running_length,
        });
    }

    out[0].vector = out.get(1).map(|p| p.vector).unwrap_or(Vec2::ZERO);
    out
}

/// Closed fillable path through an outline polygon.
pub fn outline_to_path(outline: &[Point]) -> BezPath {
    smooth_closed_path(outline)
}

/// Offset the centerline to both sides and join the sides with round caps.
pub fn outline_points(points: &[StrokePoint], options: &FreehandOptions) -> Vec<Point> {
    let size = options.size;
    if points.is_empty() || size <= 0.0 {
        return Vec::new();
    }

    let last = points.len() - 1;
    let total_length = points[last].running_length;
    let min_distance = (size * options.smoothing).powi(2);

    let mut left: Vec<Point> = Vec::new();
    let mut right: Vec<Point> = Vec::new();

    // Seed the simulated pressure from the first few samples so the stroke
    // does not start with a blob.
    let mut prev_pressure = points.iter().take(10).fold(points[0].pressure, |acc, p| {
        let pressure = simulated_pressure(acc, p.distance, size);
        (acc + pressure) / 2.0
    });

    let mut radius = stroke_radius(size, options.thinning, points[last].pressure);
    let mut first_radius: Option<f64> = None;
    let mut prev_vector = points[0].vector;
    let mut pl = points[0].point;
    let mut pr = pl;
    let mut prev_was_sharp = false;

    for (i, sp) in points.iter().enumerate() {
        let StrokePoint {
            point,
            vector,
            distance,
            running_length,
            mut pressure,
        } = *sp;

        // The last few units of a stroke are mostly noise.
        if i < last && total_length - running_length < 3.0 {
            continue;
        }

        if options.thinning != 0.0 {
            pressure = simulated_pressure(prev_pressure, distance, size);
            radius = stroke_radius(size, options.thinning, pressure);
        } else {
            radius = size / 2.0;
        }
        first_radius.get_or_insert(radius);
        radius = radius.max(0.01);

        let next_vector = if i < last { points[i + 1].vector } else { vector };
        let next_dpr = if i < last { vector.dot(next_vector) } else { 1.0 };
        let prev_dpr = vector.dot(prev_vector);

        let sharp = prev_dpr < 0.0 && !prev_was_sharp;
        let next_sharp = next_dpr < 0.0;

        if sharp || next_sharp {
            // Direction reverses: wrap a half circle around the point.
            let offset = perpendicular(prev_vector) * radius;
            for step in 0..=CAP_STEPS {
                let t = step as f64 / CAP_STEPS as f64;
                pl = rotate_around(point - offset, point, FIXED_PI * t);
                left.push(pl);
                pr = rotate_around(point + offset, point, -FIXED_PI * t);
                right.push(pr);
            }
            if next_sharp {
                prev_was_sharp = true;
            }
            continue;
        }

        prev_was_sharp = false;

        if i == last {
            let offset = perpendicular(vector) * radius;
            left.push(point - offset);
            right.push(point + offset);
            continue;
        }

        let offset = perpendicular(next_vector.lerp(vector, next_dpr)) * radius;

        let tl = point - offset;
        if i <= 1 || (pl - tl).hypot2() > min_distance {
            left.push(tl);
            pl = tl;
        }

        let tr = point + offset;
        if i <= 1 || (pr - tr).hypot2() > min_distance {
            right.push(tr);
            pr = tr;
        }

        prev_pressure = pressure;
        prev_vector = vector;
    }

    let first_point = points[0].point;
    let last_point = if points.len() > 1 {
        points[last].point
    } else {
        first_point + Vec2::new(1.0, 1.0)
    };

    // A single sample renders as a dot.
    if points.len() == 1 {
        let r = first_radius.unwrap_or(radius);
        let start = first_point + unit(perpendicular(first_point - last_point)) * -r;
        return (1..=CAP_STEPS)
            .map(|step| {
                let t = step as f64 / CAP_STEPS as f64;
                rotate_around(start, first_point, FIXED_PI * 2.0 * t)
            })
            .collect();
    }

    let start_cap: Vec<Point> = match right.first() {
        Some(&anchor) => (1..=CAP_STEPS)
            .map(|step| {
                let t = step as f64 / CAP_STEPS as f64;
                rotate_around(anchor, first_point, FIXED_PI * t)
            })
            .collect(),
        None => Vec::new(),
    };

    let direction = perpendicular(-points[last].vector);
    let end_start = last_point + direction * radius;
    let end_cap = (1..END_CAP_STEPS).map(|step| {
        let t = step as f64 / END_CAP_STEPS as f64;
        rotate_around(end_start, last_point, FIXED_PI * 3.0 * t)
    });

    let mut outline = left;
    outline.extend(end_cap);
    outline.extend(right.into_iter().rev());
    outline.extend(start_cap);
    outline
}

/// Radius of the stroke at a given pressure.
fn stroke_radius(size: f64, thinning: f64, pressure: f64) -> f64 {
    size * (0.5 - thinning * (0.5 - pressure))
}

/// Pressure derived from segment length: long (fast) segments lower it.
fn simulated_pressure(prev: f64, distance: f64, size: f64) -> f64 {
    let speed = (distance / size).min(1.0);
    let rate = (1.0 - speed).min(1.0);
    (prev + (rate - prev) * (speed * RATE_OF_PRESSURE_CHANGE)).min(1.0)
}

fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

fn unit(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len < f64::EPSILON { Vec2::ZERO } else { v / len }
}

fn rotate_around(p: Point, center: Point, angle: f64) -> Point {
    let (s, c) = angle.sin_cos();
    let d = p - center;
    Point::new(center.x + d.x * c - d.y * s, center.y + d.x * s + d.y * c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal_stroke(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64 * 5.0, 100.0)).collect()
    }

    #[test]
    fn test_empty_input_has_no_outline() {
        assert!(stroke_points(&[], &FreehandOptions::default()).is_empty());
        assert!(stroke_outline(&[], &FreehandOptions::default()).is_empty());
    }

    #[test]
    fn test_zero_size_has_no_outline() {
        let opts = FreehandOptions::default().with_size(0.0);
        assert!(stroke_outline(&horizontal_stroke(10), &opts).is_empty());
    }

    #[test]
    fn test_single_point_is_a_dot() {
        let outline = stroke_outline(&[Point::new(50.0, 50.0)], &FreehandOptions::default());
        assert!(!outline.is_empty());
        for p in &outline {
            assert!((p.x - 50.0).abs() < 10.0 && (p.y - 50.0).abs() < 10.0);
        }
    }

    #[test]
    fn test_two_points_are_interpolated() {
        let pts = stroke_points(
            &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            &FreehandOptions::default(),
        );
        assert!(pts.len() > 2);
        for w in pts.windows(2) {
            assert!(w[1].running_length > w[0].running_length);
        }
    }

    #[test]
    fn test_stroke_vectors_point_backward() {
        let pts = stroke_points(&horizontal_stroke(20), &FreehandOptions::default());
        for p in &pts[1..] {
            assert!((p.vector.x + 1.0).abs() < 1e-9);
            assert!(p.vector.y.abs() < 1e-9);
        }
        assert_eq!(pts[0].vector, pts[1].vector);
    }

    #[test]
    fn test_outline_surrounds_centerline() {
        let input = horizontal_stroke(30);
        let opts = FreehandOptions::default().with_size(8.0);
        let outline = stroke_outline(&input, &opts);
        assert!(outline.len() > 10);

        let above = outline.iter().filter(|p| p.y < 100.0 - 0.5).count();
        let below = outline.iter().filter(|p| p.y > 100.0 + 0.5).count();
        assert!(above > 0 && below > 0);

        // Full pressure widens the radius to at most 0.75 * size.
        for p in &outline {
            assert!((p.y - 100.0).abs() <= opts.size * 0.75 + 1e-6);
        }
    }

    #[test]
    fn test_thinning_zero_gives_constant_radius() {
        let opts = FreehandOptions {
            thinning: 0.0,
            ..FreehandOptions::default().with_size(10.0)
        };
        let outline = stroke_outline(&horizontal_stroke(30), &opts);
        let max_offset = outline
            .iter()
            .map(|p| (p.y - 100.0).abs())
            .fold(0.0_f64, f64::max);
        assert!((max_offset - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_outline_is_deterministic() {
        let input = horizontal_stroke(15);
        let opts = FreehandOptions::default();
        assert_eq!(stroke_outline(&input, &opts), stroke_outline(&input, &opts));
    }

    #[test]
    fn test_outline_to_path_is_closed() {
        let options = FreehandOptions::default().with_size(4.0);
        let outline = stroke_outline(&horizontal_stroke(6), &options);
        let path = outline_to_path(&outline);
        let els = path.elements();
        assert_eq!(els.len(), outline.len() + 2);
        assert_eq!(els.last(), Some(&kurbo::PathEl::ClosePath));
    }
}
