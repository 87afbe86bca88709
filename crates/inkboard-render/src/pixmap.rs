//! CPU raster surface backed by an RGBA image.
//!
//! Paths are flattened to line segments and scan-converted with the
//! non-zero winding rule. Each pixel row is sampled at four sub-scanlines;
//! horizontal coverage is exact.

use crate::renderer::{RenderResult, RendererError, Surface, encode_rgba_png};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use kurbo::{BezPath, Cap, Join, PathEl, Point, Rect, Size, Stroke, StrokeOpts};
use peniko::Color;

/// Vertical samples per pixel row.
const SUBSAMPLES: usize = 4;

/// Flattening tolerance in pixels.
const FLATTEN_TOLERANCE: f64 = 0.25;

/// Glyph advance used when no font is loaded.
const FALLBACK_ADVANCE: f64 = 0.6;

/// A non-horizontal line segment with `y0 < y1`.
#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    winding: i32,
}

impl Edge {
    fn new(a: Point, b: Point) -> Option<Self> {
        if a.y == b.y {
            return None;
        }
        let (top, bottom, winding) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
        Some(Self {
            x0: top.x,
            y0: top.y,
            x1: bottom.x,
            y1: bottom.y,
            winding,
        })
    }

    fn x_at(&self, y: f64) -> f64 {
        self.x0 + (y - self.y0) * (self.x1 - self.x0) / (self.y1 - self.y0)
    }
}

/// Flatten a path into edges, implicitly closing every subpath.
fn flatten_edges(path: &BezPath) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut start = Point::ZERO;
    let mut last = Point::ZERO;
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            edges.extend(Edge::new(last, start));
            start = p;
            last = p;
        }
        PathEl::LineTo(p) => {
            edges.extend(Edge::new(last, p));
            last = p;
        }
        PathEl::ClosePath => {
            edges.extend(Edge::new(last, start));
            last = start;
        }
        // flatten only emits the three variants above
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    edges.extend(Edge::new(last, start));
    edges
}

/// Add `weight` times the covered fraction of each pixel in `[a, b)`.
fn add_span(cover: &mut [f32], a: f64, b: f64, weight: f32) {
    let width = cover.len() as f64;
    let (a, b) = (a.clamp(0.0, width), b.clamp(0.0, width));
    if b <= a {
        return;
    }
    let first = a.floor() as usize;
    let last = (b.ceil() as usize).min(cover.len());
    for (px, c) in cover.iter_mut().enumerate().take(last).skip(first) {
        let px = px as f64;
        let overlap = b.min(px + 1.0) - a.max(px);
        if overlap > 0.0 {
            *c += overlap as f32 * weight;
        }
    }
}

/// Software-rasterized drawing surface.
#[derive(Clone)]
pub struct PixmapSurface {
    image: RgbaImage,
    font: Option<FontArc>,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("font", &self.font.is_some())
            .finish()
    }
}

impl PixmapSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        Ok(Self {
            image: blank(width, height)?,
            font: None,
        })
    }

    /// Load a TrueType/OpenType font for text drawing.
    pub fn load_font(&mut self, bytes: Vec<u8>) -> RenderResult<()> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| RendererError::Font(e.to_string()))?;
        self.font = Some(font);
        Ok(())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Straight-alpha RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Source-over blend of `color` at `coverage` into one pixel.
    fn blend(&mut self, x: u32, y: u32, color: [f32; 4], coverage: f32) {
        let sa = color[3] * coverage.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        let da = dst.0[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let mut out = [0u8; 4];
        for i in 0..3 {
            let c = (color[i] * sa + dst.0[i] as f32 * da * (1.0 - sa)) / out_a;
            out[i] = c.round().clamp(0.0, 255.0) as u8;
        }
        out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        *dst = Rgba(out);
    }

    fn fill_edges(&mut self, edges: &[Edge], color: Color) {
        if edges.is_empty() {
            return;
        }
        let rgba = color_components(color);
        let (width, height) = self.image.dimensions();
        let min_y = edges.iter().map(|e| e.y0).fold(f64::INFINITY, f64::min);
        let max_y = edges.iter().map(|e| e.y1).fold(f64::NEG_INFINITY, f64::max);
        let row_start = min_y.floor().max(0.0) as u32;
        let row_end = (max_y.ceil().max(0.0) as u32).min(height);

        let weight = 1.0 / SUBSAMPLES as f32;
        let mut cover = vec![0.0f32; width as usize];
        let mut crossings: Vec<(f64, i32)> = Vec::new();

        for y in row_start..row_end {
            cover.fill(0.0);
            for s in 0..SUBSAMPLES {
                let sy = y as f64 + (s as f64 + 0.5) / SUBSAMPLES as f64;
                crossings.clear();
                crossings.extend(
                    edges
                        .iter()
                        .filter(|e| e.y0 <= sy && sy < e.y1)
                        .map(|e| (e.x_at(sy), e.winding)),
                );
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

                let mut winding = 0;
                let mut span_start = 0.0;
                for &(x, dir) in &crossings {
                    let was_inside = winding != 0;
                    winding += dir;
                    match (was_inside, winding != 0) {
                        (false, true) => span_start = x,
                        (true, false) => add_span(&mut cover, span_start, x, weight),
                        _ => {}
                    }
                }
            }
            for (x, &c) in cover.iter().enumerate() {
                if c > 0.0 {
                    self.blend(x as u32, y, rgba, c);
                }
            }
        }
    }
}

fn blank(width: u32, height: u32) -> RenderResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(RendererError::InvalidSize { width, height });
    }
    Ok(RgbaImage::new(width, height))
}

/// RGB in 0..=255 and alpha in 0..=1.
fn color_components(color: Color) -> [f32; 4] {
    let c = color.to_rgba8();
    [c.r as f32, c.g as f32, c.b as f32, c.a as f32 / 255.0]
}

impl Surface for PixmapSurface {
    fn size(&self) -> Size {
        Size::new(self.image.width() as f64, self.image.height() as f64)
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.image = blank(width, height)?;
        Ok(())
    }

    fn clear(&mut self, rect: Rect) {
        let (width, height) = self.image.dimensions();
        let x0 = rect.x0.floor().clamp(0.0, width as f64) as u32;
        let x1 = rect.x1.ceil().clamp(0.0, width as f64) as u32;
        let y0 = rect.y0.floor().clamp(0.0, height as f64) as u32;
        let y1 = rect.y1.ceil().clamp(0.0, height as f64) as u32;
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        let edges = flatten_edges(path);
        self.fill_edges(&edges, color);
    }

    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Color) {
        if width <= 0.0 {
            return;
        }
        let style = Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round);
        let outline = kurbo::stroke(path.iter(), &style, &StrokeOpts::default(), FLATTEN_TOLERANCE);
        self.fill_path(&outline, color);
    }

    fn draw_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        let Some(font) = self.font.clone() else {
            log::warn!("no font loaded, skipping text {text:?}");
            return;
        };
        let rgba = color_components(color);
        let (width, height) = self.image.dimensions();
        let scale = PxScale::from(font_size as f32);
        let scaled = font.as_scaled(scale);
        let baseline = origin.y as f32 + scaled.ascent();
        let mut pen_x = origin.x as f32;
        let mut prev = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                pen_x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(pen_x, baseline));
            pen_x += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i64 + gx as i64;
                let y = bounds.min.y as i64 + gy as i64;
                if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                    self.blend(x as u32, y as u32, rgba, coverage);
                }
            });
        }
    }

    fn measure_text(&self, text: &str, font_size: f64) -> Size {
        let Some(font) = &self.font else {
            return Size::new(text.chars().count() as f64 * font_size * FALLBACK_ADVANCE, font_size);
        };
        let scaled = font.as_scaled(PxScale::from(font_size as f32));
        let mut advance = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                advance += scaled.kern(prev, id);
            }
            advance += scaled.h_advance(id);
            prev = Some(id);
        }
        Size::new(advance as f64, font_size)
    }

    fn encode_png(&self, background: Color) -> RenderResult<Vec<u8>> {
        let bg = color_components(background);
        let mut data = Vec::with_capacity(self.image.as_raw().len());
        for px in self.image.pixels() {
            let sa = px.0[3] as f32 / 255.0;
            let out_a = sa + bg[3] * (1.0 - sa);
            if out_a <= 0.0 {
                data.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            for i in 0..3 {
                let c = (px.0[i] as f32 * sa + bg[i] * bg[3] * (1.0 - sa)) / out_a;
                data.push(c.round().clamp(0.0, 255.0) as u8);
            }
            data.push((out_a * 255.0).round().clamp(0.0, 255.0) as u8);
        }
        let (width, height) = self.image.dimensions();
        log::info!("encoding {width}x{height} png");
        encode_rgba_png(&data, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    fn red() -> Color {
        Color::from_rgba8(255, 0, 0, 255)
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            PixmapSurface::new(0, 10),
            Err(RendererError::InvalidSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_fill_rect() {
        let mut surface = PixmapSurface::new(40, 40).unwrap();
        surface.fill_path(&Rect::new(10.0, 10.0, 20.0, 20.0).to_path(0.1), red());

        assert_eq!(surface.pixel(15, 15), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(10, 10), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(19, 19), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(20, 15), [0, 0, 0, 0]);
        assert_eq!(surface.pixel(5, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn test_partial_pixel_coverage() {
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        surface.fill_path(&Rect::new(2.0, 2.0, 4.5, 6.0).to_path(0.1), red());
        let alpha = surface.pixel(4, 3)[3];
        assert!((120..=135).contains(&alpha), "alpha {alpha}");
    }

    #[test]
    fn test_nonzero_overlap_stays_filled() {
        let mut path = Rect::new(0.0, 0.0, 20.0, 20.0).to_path(0.1);
        path.extend(Rect::new(10.0, 10.0, 30.0, 30.0).to_path(0.1).iter());
        let mut surface = PixmapSurface::new(40, 40).unwrap();
        surface.fill_path(&path, red());
        assert_eq!(surface.pixel(15, 15)[3], 255);
        assert_eq!(surface.pixel(25, 5)[3], 0);
    }

    #[test]
    fn test_stroke_line() {
        let mut surface = PixmapSurface::new(60, 30).unwrap();
        let mut line = BezPath::new();
        line.move_to((10.0, 10.5));
        line.line_to((50.0, 10.5));
        surface.stroke_path(&line, 4.0, red());

        assert_eq!(surface.pixel(30, 10)[3], 255);
        assert_eq!(surface.pixel(30, 20)[3], 0);
        // Round cap extends past the end point.
        assert!(surface.pixel(51, 10)[3] > 0);
    }

    #[test]
    fn test_clear_region() {
        let mut surface = PixmapSurface::new(20, 20).unwrap();
        surface.fill_path(&Rect::new(0.0, 0.0, 20.0, 20.0).to_path(0.1), red());
        surface.clear(Rect::new(0.0, 0.0, 10.0, 20.0));
        assert_eq!(surface.pixel(5, 5), [0, 0, 0, 0]);
        assert_eq!(surface.pixel(15, 5)[3], 255);
        surface.clear_all();
        assert_eq!(surface.pixel(15, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn test_png_background_behind_content() {
        let mut surface = PixmapSurface::new(16, 8).unwrap();
        surface.fill_path(&Rect::new(0.0, 0.0, 8.0, 8.0).to_path(0.1), red());
        let bytes = surface
            .encode_png(Color::from_rgba8(0x12, 0x12, 0x12, 255))
            .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert_eq!(decoded.get_pixel(2, 2).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(12, 2).0, [0x12, 0x12, 0x12, 255]);
        // The surface itself is untouched.
        assert_eq!(surface.pixel(12, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_text_without_font() {
        let mut surface = PixmapSurface::new(20, 20).unwrap();
        surface.draw_text("abc", Point::ZERO, 16.0, red());
        assert!(surface.image().pixels().all(|p| p.0[3] == 0));
        let size = surface.measure_text("abc", 10.0);
        assert!((size.width - 18.0).abs() < 1e-9);
        assert_eq!(size.height, 10.0);
        assert!(surface.load_font(vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_resize() {
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        surface.resize(30, 20).unwrap();
        assert_eq!(surface.size(), Size::new(30.0, 20.0));
        assert!(surface.resize(0, 5).is_err());
    }
}
